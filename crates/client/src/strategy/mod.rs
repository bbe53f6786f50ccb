//! Caching strategies.
//!
//! Each strategy takes a [`StrategyContext`] and a request and returns a
//! [`Served`] response. Network failures are recovered inside the strategy;
//! the only synthetic result is the 503 "Offline" response. Store reads that
//! fail propagate. Store writes that fail are logged and do not change what
//! the caller receives.

mod cache_first;
mod network_first;
mod stale_while_revalidate;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{AppConfig, CacheStorage, Error, RequestDescriptor, ResponseDescriptor, Strategy};

use crate::fetch::Fetcher;

pub use cache_first::cache_first;
pub use network_first::network_first;
pub use stale_while_revalidate::{RevalidateOutcome, Revalidation, stale_while_revalidate};

/// Names of the two stores the strategies write to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreNames {
    /// Long-lived assets; written by cache-first.
    pub static_store: String,
    /// Runtime responses; written by network-first and stale-while-revalidate.
    pub general_store: String,
}

impl StoreNames {
    pub fn from_config(config: &AppConfig) -> Self {
        Self { static_store: config.static_cache_name.clone(), general_store: config.general_cache_name.clone() }
    }

    /// Whether a store belongs to the current generation.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.static_store || name == self.general_store
    }
}

/// Dependencies shared by all strategies.
#[derive(Clone)]
pub struct StrategyContext {
    pub storage: Arc<dyn CacheStorage>,
    pub fetcher: Arc<dyn Fetcher>,
    pub stores: StoreNames,
}

impl StrategyContext {
    /// Write a copy of a response; failures are logged and swallowed.
    async fn store_copy(&self, store: &str, request: &RequestDescriptor, response: &ResponseDescriptor) -> bool {
        match self.storage.put(store, request, response).await {
            Ok(()) => {
                tracing::debug!("stored {} {} in {}", request.method, request.url, store);
                true
            }
            Err(e) => {
                tracing::warn!(store, url = %request.url, error = %e, "failed to store response copy");
                false
            }
        }
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Network,
    Cache,
    /// Synthetic 503 "Offline".
    Offline,
}

/// Result of running a strategy.
#[derive(Debug)]
pub struct Served {
    pub response: ResponseDescriptor,
    pub source: ResponseSource,
    /// Background refresh started by stale-while-revalidate, if still pending.
    pub revalidation: Option<Revalidation>,
}

impl Served {
    fn network(response: ResponseDescriptor) -> Self {
        Self { response, source: ResponseSource::Network, revalidation: None }
    }

    fn cached(response: ResponseDescriptor) -> Self {
        Self { response, source: ResponseSource::Cache, revalidation: None }
    }

    fn offline() -> Self {
        Self { response: ResponseDescriptor::offline(), source: ResponseSource::Offline, revalidation: None }
    }
}

/// Run the given strategy.
pub async fn execute(strategy: Strategy, ctx: &StrategyContext, request: &RequestDescriptor) -> Result<Served, Error> {
    match strategy {
        Strategy::CacheFirst => cache_first(ctx, request).await,
        Strategy::NetworkFirst => network_first(ctx, request).await,
        Strategy::StaleWhileRevalidate => stale_while_revalidate(ctx, request).await,
    }
}
