//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`ToolRegistry`] to the Model Context Protocol via `rmcp` and
//! serves it over stdio, which is how MCP clients such as Cursor and Claude
//! Desktop launch the server:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "santuri": {
//!       "command": "santuri-mcp",
//!       "args": ["serve", "mcp"],
//!       "env": { "SANTURI_API_KEY": "...", "SANTURI_STACK_ID": "..." }
//!     }
//!   }
//! }
//! ```
//!
//! * **Tools** are exposed via `list_tools` / `call_tool`.
//! * **Resources** are not served; listings are empty and reads point the
//!   client at `search_documentation`.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};

use crate::traits::{ToolContext, ToolRegistry};

/// Bridges the tool registry to the MCP JSON-RPC protocol.
///
/// Cloning is cheap; everything is behind `Arc`.
#[derive(Clone)]
pub struct McpBridge {
    ctx: Arc<ToolContext>,
    tools: Arc<ToolRegistry>,
}

impl McpBridge {
    pub fn new(ctx: Arc<ToolContext>, tools: Arc<ToolRegistry>) -> Self {
        Self { ctx, tools }
    }

    /// Convert a registry tool into an rmcp `Tool` descriptor.
    fn to_mcp_tool(tool: &dyn crate::traits::Tool) -> Tool {
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> =
            match tool.parameters_schema() {
                serde_json::Value::Object(map) => Arc::new(map),
                _ => Arc::new(serde_json::Map::new()),
            };

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(true)),
            execution: None,
            icons: None,
            meta: None,
        }
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "santuri".to_string(),
                title: Some("Santuri".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Santuri documentation search. Use search_documentation to retrieve relevant \
                 snippets from the configured documentation stack, and list_sources to see \
                 which sources it covers."
                    .to_string(),
            ),
        }
    }

    // ── Tools ────────────────────────────────────────────────────────────

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools.find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let params = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let result = self.tools.dispatch(&request.name, params, &self.ctx).await;
        Ok(result.into())
    }

    // ── Resources ────────────────────────────────────────────────────────

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(Vec::new())))
    }

    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        std::future::ready(Ok(ListResourceTemplatesResult::with_all_items(Vec::new())))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        Err(McpError::resource_not_found(
            resource_not_found_message(&request.uri),
            None,
        ))
    }
}

fn resource_not_found_message(uri: &str) -> String {
    format!(
        "Resource not found: {}. Use search_documentation to find content.",
        uri
    )
}

/// Serve the bridge over stdin/stdout until the client disconnects.
pub async fn serve_stdio(ctx: Arc<ToolContext>, tools: Arc<ToolRegistry>) -> anyhow::Result<()> {
    let bridge = McpBridge::new(ctx, tools);
    let service = bridge.serve(rmcp::transport::stdio()).await?;
    tracing::info!("Santuri MCP server started");
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DocsApi;
    use crate::config::ApiConfig;
    use crate::error::ApiError;
    use crate::models::{SearchRequest, SearchResponse, Source};
    use async_trait::async_trait;

    struct NoApi;

    #[async_trait]
    impl DocsApi for NoApi {
        async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse, ApiError> {
            unreachable!()
        }
        async fn list_sources(&self, _stack_id: Option<&str>) -> Result<Vec<Source>, ApiError> {
            unreachable!()
        }
    }

    fn bridge() -> McpBridge {
        let ctx = ToolContext::new(Arc::new(ApiConfig::default()), Arc::new(NoApi));
        McpBridge::new(Arc::new(ctx), Arc::new(ToolRegistry::with_builtins()))
    }

    #[test]
    fn test_server_info() {
        let info = bridge().get_info();
        assert_eq!(info.server_info.name, "santuri");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn test_tool_descriptors() {
        let b = bridge();
        let search = b.get_tool("search_documentation").unwrap();
        assert_eq!(search.name, "search_documentation");
        assert_eq!(
            search.input_schema.get("required"),
            Some(&serde_json::json!(["query"]))
        );
        assert!(b.get_tool("list_sources").is_some());
        assert!(b.get_tool("unknown").is_none());
    }

    #[test]
    fn test_resource_not_found_message() {
        let msg = resource_not_found_message("santuri://docs/anthropic");
        assert!(msg.contains("santuri://docs/anthropic"));
        assert!(msg.contains("search_documentation"));
    }
}
