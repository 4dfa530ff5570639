//! `search_documentation` tool.
//!
//! Validates the arguments, forwards the query to the Santuri search endpoint
//! scoped to the configured stack, and renders the ranked snippets as
//! Markdown. Ranking is entirely remote; results are shown in the order the
//! API returns them.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::models::{SearchRequest, SearchResponse, SearchResult};
use crate::traits::{Tool, ToolContext};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 50;

/// Raw arguments as sent by the client.
#[derive(Debug, Deserialize)]
struct RawSearchArgs {
    query: Option<String>,
    limit: Option<f64>,
}

/// Validated search arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchArgs {
    pub query: String,
    pub limit: u32,
}

impl SearchArgs {
    /// Parse and validate a JSON argument object.
    ///
    /// `query` must be a non-blank string. `limit` must be a whole number in
    /// `1..=50` and defaults to 10.
    pub fn from_value(params: Value) -> Result<Self, ToolError> {
        let params = if params.is_null() { json!({}) } else { params };
        let raw: RawSearchArgs = serde_json::from_value(params)
            .map_err(|e| ToolError::validation(format!("invalid arguments: {}", e)))?;

        let query = raw.query.unwrap_or_default();
        if query.trim().is_empty() {
            return Err(ToolError::validation("query must not be empty"));
        }

        let limit = match raw.limit {
            None => DEFAULT_LIMIT,
            Some(n) => validate_limit(n)?,
        };

        Ok(Self { query, limit })
    }
}

fn validate_limit(n: f64) -> Result<u32, ToolError> {
    if n.fract() != 0.0 || n < f64::from(MIN_LIMIT) || n > f64::from(MAX_LIMIT) {
        return Err(ToolError::validation(format!(
            "limit must be a whole number between {} and {} (got {})",
            MIN_LIMIT, MAX_LIMIT, n
        )));
    }
    Ok(n as u32)
}

/// Run a validated search against the context's API and render the reply.
pub async fn search_documentation(ctx: &ToolContext, args: &SearchArgs) -> Result<String, ToolError> {
    let request = SearchRequest {
        query: args.query.clone(),
        stack_id: ctx.stack_id().map(str::to_string),
        limit: args.limit,
    };

    let response = ctx.api().search(&request).await?;
    tracing::debug!(
        query = %args.query,
        results = response.results.len(),
        "search completed"
    );

    Ok(render_search_response(
        &args.query,
        &ctx.scope_description(),
        &response,
    ))
}

/// Render a search reply. Pure function of its inputs.
pub fn render_search_response(query: &str, scope: &str, response: &SearchResponse) -> String {
    let usage = &response.usage;

    if response.results.is_empty() {
        return format!(
            "No results found for query: \"{}\"\n\n**Searched:** {}\n**Usage:** {}/{} searches used this month",
            query, scope, usage.used, usage.limit
        );
    }

    let blocks: Vec<String> = response
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| render_result(i + 1, r))
        .collect();

    format!(
        "# Search Results for \"{}\"\n\nFound {} result(s) in {}\n**Usage:** {}/{} searches this month\n\n{}",
        query,
        response.results.len(),
        scope,
        usage.used,
        usage.limit,
        blocks.join("\n\n")
    )
}

fn render_result(rank: usize, result: &SearchResult) -> String {
    format!(
        "## Result {}: {}\n\n**Source ID:** {}\n**Category:** {}\n**Title:** {}\n**Relevance Score:** {}%\n\n{}\n\n---",
        rank,
        result.source_name,
        result.source_id,
        result.category,
        result.title,
        score_percent(result.score),
        result.snippet
    )
}

/// `0.95` → `95`. Rounds to the nearest whole percent.
pub fn score_percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Built-in `search_documentation` tool.
pub struct SearchDocumentationTool;

#[async_trait]
impl Tool for SearchDocumentationTool {
    fn name(&self) -> &str {
        "search_documentation"
    }

    fn description(&self) -> &str {
        "Search documentation using RAG-style retrieval. Returns only relevant snippets \
         (not full docs) to save tokens. Automatically searches within the configured \
         documentation stack. Just provide your query - no need to specify technology names."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query - use natural language or keywords to find relevant documentation sections"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of results (1-50, default: 10)",
                    "minimum": MIN_LIMIT,
                    "maximum": MAX_LIMIT,
                    "default": DEFAULT_LIMIT
                }
            },
            "required": ["query"]
        })
    }

    fn error_action(&self) -> &str {
        "searching documentation"
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let args = SearchArgs::from_value(params)?;
        search_documentation(ctx, &args).await
    }
}
