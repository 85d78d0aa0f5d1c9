//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{CacheInvalidateParams, invalidate_impl, stats_impl};
use crate::tools::search::{TitleSearchParams, cancel_impl, search_impl};

use reel_client::SearchOrchestrator;
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
use std::sync::Arc;

/// The main MCP server handler for reel.
#[derive(Clone)]
pub struct TitleSearchServer {
    orchestrator: Arc<SearchOrchestrator>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl TitleSearchServer {
    /// Create a new server handler around a shared orchestrator.
    pub fn new(orchestrator: Arc<SearchOrchestrator>) -> Self {
        Self { orchestrator, tool_router: Self::tool_router() }
    }

    /// Search rated and unrated titles.
    ///
    /// Each call supersedes any search still in flight. Results for repeated
    /// queries come from the in-memory cache.
    #[tool(
        description = "Search titles by name. Returns rated titles first, then unrated ones. A newer call supersedes an older one still in flight."
    )]
    async fn title_search(&self, params: Parameters<TitleSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Abandon the search in flight, if any, and clear the current query.")]
    async fn search_cancel(&self) -> Result<CallToolResult, McpError> {
        cancel_impl(&self.orchestrator).await
    }

    /// Drop cached searches that contain a title.
    #[tool(
        description = "Invalidate cached searches containing a title, by internal id or metadata id. Call after a title is rated or removed."
    )]
    async fn cache_invalidate(&self, params: Parameters<CacheInvalidateParams>) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Result cache statistics: entries, cost, hit rate and evictions.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.orchestrator).await
    }
}

impl ServerHandler for TitleSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "reel".into(),
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
