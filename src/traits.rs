//! Tool trait, execution context, result envelope and registry.
//!
//! Every operation the server exposes is a [`Tool`]. Both the MCP bridge
//! ([`crate::mcp`]) and the JSON HTTP API ([`crate::server`]) go through
//! [`ToolRegistry::dispatch`], which is the single place where tool failures
//! become error-flagged [`ToolResult`]s.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ToolRegistry                │
//! │  ┌──────────────────┐ ┌───────────────┐  │
//! │  │search_           │ │ list_sources  │  │
//! │  │documentation     │ │               │  │
//! │  └──────────────────┘ └───────────────┘  │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!        ToolContext → DocsApi → Santuri API
//! ```

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::client::DocsApi;
use crate::config::ApiConfig;
use crate::error::ToolError;
use crate::search::SearchDocumentationTool;
use crate::sources::ListSourcesTool;

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// An operation callable by MCP clients.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as seen by clients (e.g. `"search_documentation"`).
    fn name(&self) -> &str;

    /// One-line description for client discovery.
    fn description(&self) -> &str;

    /// JSON Schema for the argument object.
    fn parameters_schema(&self) -> Value;

    /// Verb phrase used in the `Error {action}: ...` prefix of failed results.
    fn error_action(&self) -> &str {
        "running tool"
    }

    /// Execute with a JSON argument object and return the rendered text.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError>;
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Everything a tool needs to run: the resolved config and the API gateway.
///
/// Created once at startup and shared by all invocations.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<ApiConfig>,
    api: Arc<dyn DocsApi>,
}

impl ToolContext {
    pub fn new(config: Arc<ApiConfig>, api: Arc<dyn DocsApi>) -> Self {
        Self { config, api }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn api(&self) -> &dyn DocsApi {
        self.api.as_ref()
    }

    /// Stack the current call is scoped to. Only the configured stack is
    /// honoured; tools do not accept a per-call override.
    pub fn stack_id(&self) -> Option<&str> {
        self.config.stack_id.as_deref()
    }

    pub fn scope_description(&self) -> String {
        self.config.scope_description()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ToolResult
// ═══════════════════════════════════════════════════════════════════════

/// A single text content block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

/// Uniform result of every tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<TextBlock>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextBlock::new(text)],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextBlock::new(text)],
            is_error: true,
        }
    }

    /// Text of the first content block, or `""` when there is none.
    pub fn text(&self) -> &str {
        self.content.first().map(|b| b.text.as_str()).unwrap_or("")
    }
}

impl From<ToolResult> for rmcp::model::CallToolResult {
    fn from(result: ToolResult) -> Self {
        let content = result
            .content
            .into_iter()
            .map(|b| rmcp::model::Content::text(b.text))
            .collect();
        if result.is_error {
            rmcp::model::CallToolResult::error(content)
        } else {
            rmcp::model::CallToolResult::success(content)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Ordered set of tools with name-based dispatch.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding `search_documentation` and `list_sources`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SearchDocumentationTool));
        registry.register(Box::new(ListSourcesTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Run the named tool. Never fails: unknown names and tool errors come
    /// back as error-flagged results.
    pub async fn dispatch(&self, name: &str, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(tool) = self.find(name) else {
            tracing::warn!(tool = name, "unknown tool requested");
            return ToolResult::error(format!(
                "Error calling tool: {}",
                ToolError::UnknownTool(name.to_string())
            ));
        };

        match tool.execute(params, ctx).await {
            Ok(text) => ToolResult::success(text),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool failed");
                ToolResult::error(format!("Error {}: {}", tool.error_action(), e))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
