//! Route classification.
//!
//! Maps an intercepted request to a route class and its caching strategy.
//! Rules are evaluated in fixed priority order and the first match wins:
//!
//! 1. no-cache route substring in the path: bypass
//! 2. API route substring in the path: network-first
//! 3. style/script/image destination, or a static marker in the path: cache-first
//! 4. navigation, or an `accept` header asking for HTML: stale-while-revalidate
//! 5. anything else: network-first

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::request::{RequestDescriptor, RequestMode};

/// Caching strategy applied to an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    CacheFirst,
    NetworkFirst,
    StaleWhileRevalidate,
}

/// Policy class of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Not intercepted; passes through untouched.
    Bypass,
    Api,
    StaticAsset,
    Navigation,
    Default,
}

impl Route {
    /// Strategy for the route, `None` for bypass.
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            Route::Bypass => None,
            Route::Api | Route::Default => Some(Strategy::NetworkFirst),
            Route::StaticAsset => Some(Strategy::CacheFirst),
            Route::Navigation => Some(Strategy::StaleWhileRevalidate),
        }
    }
}

/// Route substrings used by [`RouteTable::classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    pub no_cache: Vec<String>,
    pub api: Vec<String>,
    pub static_markers: Vec<String>,
}

impl RouteTable {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            no_cache: config.no_cache_routes.clone(),
            api: config.api_routes.clone(),
            static_markers: config.static_markers.clone(),
        }
    }

    /// Classify a request. Pure and total.
    pub fn classify(&self, request: &RequestDescriptor) -> Route {
        let path = request.path();
        let contains_any = |routes: &[String]| routes.iter().any(|r| path.contains(r.as_str()));

        if contains_any(&self.no_cache) {
            Route::Bypass
        } else if contains_any(&self.api) {
            Route::Api
        } else if request.destination.is_static_asset() || contains_any(&self.static_markers) {
            Route::StaticAsset
        } else if request.mode == RequestMode::Navigate || request.accepts_html() {
            Route::Navigation
        } else {
            Route::Default
        }
    }
}
