//! cache_message tool implementation.
//!
//! Delivers a message to the router. Only the clear-cache sentinel has an
//! effect; anything else is acknowledged and ignored.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::CacheRouter;

use super::json_result;

/// Input parameters for the cache_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheMessageParams {
    /// Message payload, e.g. "CLEAR_CACHE".
    pub payload: String,
}

/// Implementation of the cache_message tool.
pub async fn message_impl(router: &CacheRouter, params: CacheMessageParams) -> Result<CallToolResult, McpError> {
    let outcome = router.handle_message(&params.payload).await?;
    json_result(&outcome)
}
