//! Wire types for the Santuri MCP API.
//!
//! Field names follow the API's camelCase JSON. Every field the renderers use
//! is required, so a reply with the wrong shape fails to decode instead of
//! rendering blanks.

use serde::{Deserialize, Serialize};

/// Label used to group sources that carry no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One matched documentation snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub source_id: String,
    pub source_name: String,
    pub source_slug: String,
    pub category: String,
    pub title: String,
    pub snippet: String,
    /// Relevance in `0.0..=1.0`.
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub used: u64,
    pub limit: u64,
}

/// Body of `POST /api/mcp/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub usage: Usage,
}

/// Request body for `POST /api/mcp/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    pub limit: u32,
}

/// A documentation corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub llms_txt_url: String,
}

impl Source {
    /// Category used for grouping. The record itself is left untouched.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Body of `GET /api/mcp/sources`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourcesResponse {
    pub sources: Vec<Source>,
}
