//! Error types for the API gateway and tool execution.
//!
//! None of these ever reach the MCP transport: the tool dispatcher turns every
//! [`ToolError`] into an error-flagged text result.

use thiserror::Error;

/// Failure of a single call to the Santuri API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP status. `message` is the server's `error` field when
    /// it sent one, otherwise a generic status line.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid response from API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of a tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Malformed caller arguments. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Remote(#[from] ApiError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_displays_message() {
        let err = ApiError::Status {
            status: 429,
            message: "Daily search limit reached".to_string(),
        };
        assert_eq!(err.to_string(), "Daily search limit reached");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_remote_error_is_transparent() {
        let err: ToolError = ApiError::Timeout { secs: 30 }.into();
        assert_eq!(err.to_string(), "request timed out after 30s");
    }

    #[test]
    fn test_unknown_tool_names_the_tool() {
        let err = ToolError::UnknownTool("delete_everything".to_string());
        assert!(err.to_string().contains("delete_everything"));
    }
}
