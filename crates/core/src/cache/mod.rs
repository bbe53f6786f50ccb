//! Named cache stores.
//!
//! A cache store maps request identity (method + URL) to a response. Several
//! named stores coexist; the router uses one for static assets and one for
//! everything else. The store facility is injected as a [`CacheStorage`] so
//! the routing logic runs unchanged against SQLite or an in-memory map.
//!
//! - At most one entry per request key per store; writes overwrite
//! - Stores are created on first write (or explicit open)
//! - Stores are enumerated in creation order
//! - Only `GET` requests can be written

pub mod connection;
pub mod hash;
pub mod memory;
pub mod migrations;
pub mod stores;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryStorage;

use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;

/// Store provider capability set.
#[async_trait::async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a store by name, creating it if missing.
    async fn open(&self, name: &str) -> Result<(), Error>;

    /// Names of all stores, in creation order.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a store and all its entries. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    /// Look up a request in one store.
    async fn match_in(&self, name: &str, request: &RequestDescriptor) -> Result<Option<ResponseDescriptor>, Error>;

    /// Look up a request across all stores, earliest-created store first.
    async fn match_any(&self, request: &RequestDescriptor) -> Result<Option<ResponseDescriptor>, Error>;

    /// Store a response for a request, creating the store if needed.
    async fn put(&self, name: &str, request: &RequestDescriptor, response: &ResponseDescriptor) -> Result<(), Error>;

    /// Store several responses at once: either all are written or none.
    async fn add_all(&self, name: &str, entries: &[(RequestDescriptor, ResponseDescriptor)]) -> Result<(), Error>;

    /// Number of entries in a store, 0 if the store does not exist.
    async fn entry_count(&self, name: &str) -> Result<usize, Error>;
}
