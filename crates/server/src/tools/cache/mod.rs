//! Cache inspection MCP tools.
//!
//! This module provides read-only views of the cache stores.

pub mod keys;

pub use keys::keys_impl;
