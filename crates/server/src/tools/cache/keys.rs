//! cache_keys tool implementation.
//!
//! Lists the stores in creation order with their entry counts.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::CacheRouter;

use crate::tools::json_result;

/// One store in the listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreSummary {
    pub name: String,
    pub entries: usize,
    /// One of the two store names of the running generation.
    pub current: bool,
}

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    pub stores: Vec<StoreSummary>,
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl(router: &CacheRouter) -> Result<CallToolResult, McpError> {
    let storage = router.storage();
    let mut stores = Vec::new();
    for name in storage.keys().await? {
        let entries = storage.entry_count(&name).await?;
        let current = router.stores().is_current(&name);
        stores.push(StoreSummary { name, entries, current });
    }

    json_result(&CacheKeysOutput { stores })
}
