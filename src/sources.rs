//! `list_sources` tool.
//!
//! Lists the documentation sources in the configured stack, optionally
//! filtered by category, grouped by category in the order categories first
//! appear in the API reply.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::models::Source;
use crate::traits::{Tool, ToolContext};

#[derive(Debug, Deserialize)]
struct RawListSourcesArgs {
    category: Option<String>,
}

/// Validated `list_sources` arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSourcesArgs {
    /// Exact, case-sensitive category filter. Empty strings are dropped.
    pub category: Option<String>,
}

impl ListSourcesArgs {
    pub fn from_value(params: Value) -> Result<Self, ToolError> {
        let params = if params.is_null() { json!({}) } else { params };
        let raw: RawListSourcesArgs = serde_json::from_value(params)
            .map_err(|e| ToolError::validation(format!("invalid arguments: {}", e)))?;
        Ok(Self {
            category: raw.category.filter(|c| !c.is_empty()),
        })
    }
}

/// Fetch, filter and render the source catalog.
pub async fn list_sources(ctx: &ToolContext, args: &ListSourcesArgs) -> Result<String, ToolError> {
    let mut sources = ctx.api().list_sources(ctx.stack_id()).await?;

    if let Some(category) = &args.category {
        sources.retain(|s| s.category.as_deref() == Some(category.as_str()));
    }

    Ok(render_sources(
        ctx.stack_id(),
        args.category.as_deref(),
        &sources,
    ))
}

/// Group sources by category label, keeping first-seen group order and
/// input order within each group.
pub fn group_by_category(sources: &[Source]) -> Vec<(&str, Vec<&Source>)> {
    let mut groups: Vec<(&str, Vec<&Source>)> = Vec::new();
    for source in sources {
        let label = source.category_label();
        match groups.iter_mut().find(|(cat, _)| *cat == label) {
            Some((_, members)) => members.push(source),
            None => groups.push((label, vec![source])),
        }
    }
    groups
}

/// Render the catalog (or the empty-catalog message). Pure function.
pub fn render_sources(stack_id: Option<&str>, category: Option<&str>, sources: &[Source]) -> String {
    if sources.is_empty() {
        let mut message = String::from("No documentation sources available");
        if let Some(id) = stack_id {
            message.push_str(&format!(" in stack {}", id));
        }
        if let Some(cat) = category {
            message.push_str(&format!(" with category \"{}\"", cat));
        }
        return message;
    }

    let mut out = String::from("# Documentation Sources\n\n");
    out.push_str(&format!(
        "**Stack:** {}\n",
        crate::config::scope_description(stack_id)
    ));
    out.push_str(&format!("**Sources:** {}", sources.len()));
    if let Some(cat) = category {
        out.push_str(&format!(" (filtered by category \"{}\")", cat));
    }
    out.push_str("\n\n");

    for (label, members) in group_by_category(sources) {
        out.push_str(&format!("## {}\n\n", label));
        for source in members {
            out.push_str(&format!("### {}\n", source.name));
            out.push_str(&format!("- **ID:** `{}`\n", source.id));
            out.push_str(&format!("- **Slug:** `{}`\n", source.slug));
            out.push_str(&format!("- **URL:** {}\n", source.llms_txt_url));
            if let Some(desc) = source.description.as_deref().filter(|d| !d.is_empty()) {
                out.push_str(&format!("- **Description:** {}\n", desc));
            }
            out.push('\n');
        }
    }

    out.push_str("---\n\n");
    out.push_str(
        "**Tip:** Use `search_documentation` to search across all these sources with a single query.",
    );
    out
}

/// Render a single source, used by the `source` CLI command.
pub fn render_source(source: &Source) -> String {
    let mut out = format!("# {}\n\n", source.name);
    out.push_str(&format!("- **ID:** `{}`\n", source.id));
    out.push_str(&format!("- **Slug:** `{}`\n", source.slug));
    out.push_str(&format!("- **Category:** {}\n", source.category_label()));
    out.push_str(&format!("- **URL:** {}\n", source.llms_txt_url));
    if let Some(desc) = &source.description {
        out.push_str(&format!("- **Description:** {}\n", desc));
    }
    out
}

/// Built-in `list_sources` tool.
pub struct ListSourcesTool;

#[async_trait]
impl Tool for ListSourcesTool {
    fn name(&self) -> &str {
        "list_sources"
    }

    fn description(&self) -> &str {
        "List documentation sources available in the configured stack. \
         Shows source IDs that can be used with search_documentation."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Optional: Filter by category (e.g., \"AI/ML\", \"Platform\", \"Database\")"
                }
            },
            "required": []
        })
    }

    fn error_action(&self) -> &str {
        "listing sources"
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let args = ListSourcesArgs::from_value(params)?;
        list_sources(ctx, &args).await
    }
}
