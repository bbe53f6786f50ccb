//! Core types and shared functionality for swcache.
//!
//! This crate provides:
//! - Request and response descriptors
//! - Route classification
//! - Named cache stores (SQLite and in-memory)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod routing;

pub use cache::{CacheDb, CacheStorage, MemoryStorage};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use request::{Destination, RequestDescriptor, RequestMode};
pub use response::ResponseDescriptor;
pub use routing::{Route, RouteTable, Strategy};
