//! Client code for swcache.
//!
//! This crate provides the network fetch primitive, the three caching
//! strategies, and the cache router that the server exposes.

pub mod fetch;
pub mod router;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use fetch::{FetchClient, FetchConfig, Fetcher};
pub use router::{ActivateReport, CacheRouter, InstallReport, Interception, MessageOutcome};
pub use strategy::{ResponseSource, RevalidateOutcome, Revalidation, Served, StoreNames, StrategyContext};
