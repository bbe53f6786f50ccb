//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    CacheFetchParams, CacheMessageParams, cache::keys_impl, fetch::fetch_impl,
    lifecycle::{activate_impl, install_impl},
    message::message_impl,
};

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
use swcache_client::CacheRouter;

/// The main MCP server handler for swcache.
#[derive(Clone)]
pub struct SwCacheServer {
    tool_router: ToolRouter<Self>,
    router: Arc<CacheRouter>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SwCacheServer {
    /// Create a new server handler over a cache router.
    pub fn new(router: Arc<CacheRouter>) -> Self {
        Self { tool_router: Self::tool_router(), router }
    }

    /// Route a request through the offline cache.
    ///
    /// Static assets are served cache-first, navigations and HTML requests
    /// stale-while-revalidate, and API calls plus everything else
    /// network-first. Upload and export routes go straight to the network.
    #[tool(
        description = "Fetch a URL through the offline cache. Returns the response with its route, strategy, and whether it came from the network, the cache, or the offline fallback."
    )]
    async fn cache_fetch(&self, params: Parameters<CacheFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.router, params.0).await
    }

    #[tool(description = "Pre-populate the static cache store from the configured asset manifest.")]
    async fn cache_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.router).await
    }

    #[tool(description = "Delete cache stores left over from previous cache versions.")]
    async fn cache_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.router).await
    }

    /// Deliver a message; "CLEAR_CACHE" deletes every store.
    #[tool(description = "Send a message to the cache. The payload CLEAR_CACHE deletes every cache store.")]
    async fn cache_message(&self, params: Parameters<CacheMessageParams>) -> Result<CallToolResult, McpError> {
        message_impl(&self.router, params.0).await
    }

    #[tool(description = "List cache stores with their entry counts.")]
    async fn cache_keys(&self) -> Result<CallToolResult, McpError> {
        keys_impl(&self.router).await
    }
}

impl ServerHandler for SwCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "swcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Offline-first request cache. Use cache_fetch for every request; call cache_install and cache_activate after a cache version change."
                    .into(),
            ),
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
