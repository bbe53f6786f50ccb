//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SWCACHE_*)
//! 2. TOML config file (if SWCACHE_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The defaults describe the deployed application; bumping a store name is
//! how a new deployment invalidates the previous generation of stores.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SWCACHE_*)
/// 2. TOML config file (if SWCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database backing the cache stores.
    ///
    /// Set via SWCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL that relative manifest entries and request URLs resolve against.
    ///
    /// Set via SWCACHE_SCOPE_URL environment variable.
    #[serde(default = "default_scope_url")]
    pub scope_url: String,

    /// Name of the long-lived static asset store.
    #[serde(default = "default_static_cache_name")]
    pub static_cache_name: String,

    /// Name of the general (runtime) store.
    #[serde(default = "default_general_cache_name")]
    pub general_cache_name: String,

    /// URLs pre-fetched into the static store at install time.
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,

    /// Path substrings that bypass interception entirely.
    #[serde(default = "default_no_cache_routes")]
    pub no_cache_routes: Vec<String>,

    /// Path substrings routed to network-first.
    #[serde(default = "default_api_routes")]
    pub api_routes: Vec<String>,

    /// Path substrings that mark a static asset (cache-first).
    #[serde(default = "default_static_markers")]
    pub static_markers: Vec<String>,

    /// Message payload that deletes every store.
    #[serde(default = "default_clear_cache_message")]
    pub clear_cache_message: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SWCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SWCACHE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SWCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./swcache.sqlite")
}

fn default_scope_url() -> String {
    "http://localhost:5000/static/js/".into()
}

fn default_static_cache_name() -> String {
    "capre-static-v2".into()
}

fn default_general_cache_name() -> String {
    "capre-cache-v2".into()
}

fn default_static_assets() -> Vec<String> {
    [
        "../css/style.css",
        "../img/logo_small.png",
        "../img/logo_vaca.png",
        "../img/vaca_hero.jpg",
        "../manifest.json",
        "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css",
        "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css",
        "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_no_cache_routes() -> Vec<String> {
    vec!["/upload".into(), "/principal/exportar".into()]
}

fn default_api_routes() -> Vec<String> {
    vec!["/principal/api/".into(), "/principal/ordenos/auto-guardar".into()]
}

fn default_static_markers() -> Vec<String> {
    vec!["/static/".into()]
}

fn default_clear_cache_message() -> String {
    "CLEAR_CACHE".into()
}

fn default_user_agent() -> String {
    "swcache/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            scope_url: default_scope_url(),
            static_cache_name: default_static_cache_name(),
            general_cache_name: default_general_cache_name(),
            static_assets: default_static_assets(),
            no_cache_routes: default_no_cache_routes(),
            api_routes: default_api_routes(),
            static_markers: default_static_markers(),
            clear_cache_message: default_clear_cache_message(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed scope URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `scope_url` is not an absolute URL.
    pub fn scope(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.scope_url)
            .map_err(|e| ConfigError::Invalid { field: "scope_url".into(), reason: e.to_string() })
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SWCACHE_`
    /// 2. TOML file from `SWCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SWCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SWCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
