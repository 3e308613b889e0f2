//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    AddUrlParams, AutocompleteParams, RemoveUrlParams, SearchParams, autocomplete::autocomplete_impl,
    search::search_impl, urls,
};

use pagetrie_client::Catalog;
use pagetrie_core::AppConfig;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for pagetrie.
#[derive(Clone)]
pub struct PagetrieServer {
    catalog: Arc<Catalog>,
    config: AppConfig,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl PagetrieServer {
    /// Create a new server handler over a shared catalog.
    pub fn new(catalog: Arc<Catalog>, config: AppConfig) -> Self {
        Self { catalog, config, tool_router: Self::tool_router() }
    }

    #[tool(description = "List every indexed URL with its title and description.")]
    async fn list_urls(&self) -> Result<CallToolResult, McpError> {
        urls::list_impl(&self.catalog).await
    }

    /// Fetch and index a page, or update the metadata of one already indexed.
    ///
    /// Fetch and storage failures come back as `{"ok": false}`; an invalid URL is an error.
    #[tool(
        description = "Fetch and index a page by URL, or update the title/description of an indexed page. Returns {ok}."
    )]
    async fn add_url(&self, params: Parameters<AddUrlParams>) -> Result<CallToolResult, McpError> {
        urls::add_impl(&self.catalog, params.0).await
    }

    #[tool(description = "Remove a URL from the index. Removing an absent URL succeeds.")]
    async fn remove_url(&self, params: Parameters<RemoveUrlParams>) -> Result<CallToolResult, McpError> {
        urls::remove_impl(&self.catalog, params.0).await
    }

    /// Case-sensitive substring search with snippets.
    #[tool(
        description = "Search indexed page text for a literal, case-sensitive substring. Returns snippets with the match position, paged by start (1-based) and max."
    )]
    async fn search(&self, params: Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.catalog, params.0, self.config.page_size).await
    }

    #[tool(description = "Complete a prefix to the most frequent indexed word. Returns {result: {word, weight} | null}.")]
    async fn autocomplete(&self, params: Parameters<AutocompleteParams>) -> Result<CallToolResult, McpError> {
        autocomplete_impl(&self.catalog, params.0).await
    }
}

impl ServerHandler for PagetrieServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "pagetrie".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
