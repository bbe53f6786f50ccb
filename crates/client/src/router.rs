//! Cache router.
//!
//! Classifies each intercepted request once, runs the selected strategy, and
//! carries the three lifecycle operations: install (pre-populate the static
//! store), activate (delete stores from previous generations) and the
//! clear-cache message (delete every store).

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{AppConfig, CacheStorage, Error, RequestDescriptor, ResponseDescriptor, Route, RouteTable, Strategy};
use url::Url;

use crate::fetch::{Fetcher, resolve, same_origin};
use crate::strategy::{self, Served, StoreNames, StrategyContext};

/// What the router decided to do with a request.
#[derive(Debug)]
pub enum Interception {
    /// Not intercepted; the request goes to the network untouched.
    Passthrough,
    /// Answered by a strategy.
    Respond { route: Route, strategy: Strategy, served: Served },
}

/// Result of pre-populating the static store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstallReport {
    /// Store that was populated.
    pub store: String,
    /// URLs fetched and written.
    pub cached: Vec<String>,
    /// Cross-origin manifest entries left to be cached on demand.
    pub skipped: Vec<String>,
    /// Ready to take over without waiting for existing clients.
    pub skip_waiting: bool,
}

/// Result of switching to the current store generation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActivateReport {
    /// Stores from older generations that were deleted.
    pub deleted: Vec<String>,
    /// Open clients are controlled immediately, without a reload.
    pub clients_claimed: bool,
}

/// Result of handling a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MessageOutcome {
    /// Whether the payload was the clear-cache sentinel.
    pub handled: bool,
    /// Stores deleted as a result.
    pub deleted: Vec<String>,
}

/// Request router over an injected store provider and fetcher.
pub struct CacheRouter {
    routes: RouteTable,
    manifest: Vec<String>,
    scope: Url,
    clear_cache_message: String,
    ctx: StrategyContext,
}

impl CacheRouter {
    /// Build a router from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if `scope_url` does not parse.
    pub fn new(config: &AppConfig, storage: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Result<Self, Error> {
        let scope = config.scope().map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            routes: RouteTable::from_config(config),
            manifest: config.static_assets.clone(),
            scope,
            clear_cache_message: config.clear_cache_message.clone(),
            ctx: StrategyContext { storage, fetcher, stores: StoreNames::from_config(config) },
        })
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    pub fn stores(&self) -> &StoreNames {
        &self.ctx.stores
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.ctx.storage
    }

    pub fn classify(&self, request: &RequestDescriptor) -> Route {
        self.routes.classify(request)
    }

    /// Handle an intercepted request.
    pub async fn handle_fetch(&self, request: &RequestDescriptor) -> Result<Interception, Error> {
        let route = self.classify(request);
        let Some(strategy) = route.strategy() else {
            tracing::debug!("bypassing cache for {} {}", request.method, request.url);
            return Ok(Interception::Passthrough);
        };

        tracing::debug!(?route, ?strategy, "routing {} {}", request.method, request.url);
        let served = strategy::execute(strategy, &self.ctx, request).await?;
        Ok(Interception::Respond { route, strategy, served })
    }

    /// Fetch a request with no cache interaction.
    pub async fn passthrough(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor, Error> {
        self.ctx.fetcher.fetch(request).await
    }

    /// Pre-populate the static store from the manifest.
    ///
    /// Cross-origin entries are skipped. Every remaining entry must fetch
    /// with a success status, otherwise nothing is written.
    pub async fn install(&self) -> Result<InstallReport, Error> {
        let mut requests = Vec::new();
        let mut skipped = Vec::new();

        for entry in &self.manifest {
            let url = resolve(&self.scope, entry).map_err(|e| Error::InvalidUrl(format!("{entry}: {e}")))?;
            if same_origin(&url, &self.scope) {
                requests.push(RequestDescriptor::get(url));
            } else {
                skipped.push(url.to_string());
            }
        }

        let mut entries = Vec::with_capacity(requests.len());
        for request in requests {
            let response = self
                .ctx
                .fetcher
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed(format!("{}: {}", request.url, e)))?;
            if !response.is_success() {
                return Err(Error::InstallFailed(format!("{} returned {}", request.url, response.status)));
            }
            entries.push((request, response));
        }

        let store = self.ctx.stores.static_store.clone();
        self.ctx.storage.add_all(&store, &entries).await?;

        let cached: Vec<String> = entries.iter().map(|(req, _)| req.url.to_string()).collect();
        tracing::info!(store = %store, cached = cached.len(), skipped = skipped.len(), "static assets installed");

        Ok(InstallReport { store, cached, skipped, skip_waiting: true })
    }

    /// Delete every store that is not one of the two current names.
    pub async fn activate(&self) -> Result<ActivateReport, Error> {
        let mut deleted = Vec::new();
        for name in self.ctx.storage.keys().await? {
            if self.ctx.stores.is_current(&name) {
                continue;
            }
            if self.ctx.storage.delete(&name).await? {
                deleted.push(name);
            }
        }

        tracing::info!(deleted = ?deleted, "activated current cache generation");
        Ok(ActivateReport { deleted, clients_claimed: true })
    }

    /// Handle a message; the clear-cache sentinel deletes every store.
    pub async fn handle_message(&self, payload: &str) -> Result<MessageOutcome, Error> {
        if payload != self.clear_cache_message {
            tracing::debug!("ignoring message {:?}", payload);
            return Ok(MessageOutcome { handled: false, deleted: Vec::new() });
        }

        let mut deleted = Vec::new();
        for name in self.ctx.storage.keys().await? {
            if self.ctx.storage.delete(&name).await? {
                deleted.push(name);
            }
        }

        tracing::info!(deleted = deleted.len(), "cleared all cache stores");
        Ok(MessageOutcome { handled: true, deleted })
    }
}
