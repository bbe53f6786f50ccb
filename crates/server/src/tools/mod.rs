//! MCP tool implementations.
//!
//! Each tool stands in for one platform event: an intercepted fetch, the
//! install and activate lifecycle steps, or a message.

pub mod cache;
pub mod fetch;
pub mod lifecycle;
pub mod message;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use swcache_core::Error;

pub use fetch::CacheFetchParams;
pub use message::CacheMessageParams;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
