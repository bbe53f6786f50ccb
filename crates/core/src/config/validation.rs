//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - a store name is empty, or both store names are equal
    /// - `scope_url` is not an absolute http(s) URL
    /// - any route or marker entry is empty
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `clear_cache_message` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.static_cache_name.is_empty() {
            return Err(invalid("static_cache_name", "must not be empty"));
        }
        if self.general_cache_name.is_empty() {
            return Err(invalid("general_cache_name", "must not be empty"));
        }
        if self.static_cache_name == self.general_cache_name {
            return Err(invalid("general_cache_name", "must differ from static_cache_name"));
        }

        let scope = self.scope()?;
        if !matches!(scope.scheme(), "http" | "https") {
            return Err(invalid("scope_url", "scheme must be http or https"));
        }

        for (field, list) in [
            ("no_cache_routes", &self.no_cache_routes),
            ("api_routes", &self.api_routes),
            ("static_markers", &self.static_markers),
            ("static_assets", &self.static_assets),
        ] {
            if list.iter().any(|s| s.trim().is_empty()) {
                return Err(invalid(field, "entries must not be empty"));
            }
        }

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.clear_cache_message.is_empty() {
            return Err(invalid("clear_cache_message", "must not be empty"));
        }

        if self.static_assets.is_empty() {
            tracing::warn!("static_assets is empty; install will not pre-populate the static store");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: Result<(), ConfigError>) -> Option<String> {
        match result {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_same_store_names() {
        let config = AppConfig { general_cache_name: "capre-static-v2".into(), ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("general_cache_name"));
    }

    #[test]
    fn test_validate_empty_store_name() {
        let config = AppConfig { static_cache_name: String::new(), ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("static_cache_name"));
    }

    #[test]
    fn test_validate_scope_scheme() {
        let config = AppConfig { scope_url: "ftp://example.com/".into(), ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("scope_url"));
    }

    #[test]
    fn test_validate_empty_route_entry() {
        let config = AppConfig { api_routes: vec!["/api/".into(), "  ".into()], ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("api_routes"));
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("max_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("timeout_ms"));
    }

    #[test]
    fn test_validate_empty_clear_message() {
        let config = AppConfig { clear_cache_message: String::new(), ..Default::default() };
        assert_eq!(field_of(config.validate()).as_deref(), Some("clear_cache_message"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { max_bytes: 1, timeout_ms: 100, static_assets: Vec::new(), ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
