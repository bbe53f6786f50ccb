//! cache_install and cache_activate tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use swcache_client::CacheRouter;

use super::json_result;

/// Pre-populate the static store from the asset manifest.
pub async fn install_impl(router: &CacheRouter) -> Result<CallToolResult, McpError> {
    let report = router.install().await?;
    json_result(&report)
}

/// Delete stores left over from older cache generations.
pub async fn activate_impl(router: &CacheRouter) -> Result<CallToolResult, McpError> {
    let report = router.activate().await?;
    json_result(&report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swcache_client::{ActivateReport, InstallReport};
    use swcache_core::{CacheStorage, MemoryStorage, ResponseDescriptor};

    use super::*;
    use crate::tools::test_support::{TableFetcher, output_text, router};

    #[tokio::test]
    async fn test_install_populates_static_store() {
        let storage = MemoryStorage::new();
        let mut fetcher = TableFetcher::default();
        fetcher
            .responses
            .insert("http://localhost:5000/static/css/style.css".into(), ResponseDescriptor::new(200, "body{}"));
        let router = router(&storage, Arc::new(fetcher));

        let result = install_impl(&router).await.unwrap();
        let report: InstallReport = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(report.store, "capre-static-v2");
        assert_eq!(report.cached, vec!["http://localhost:5000/static/css/style.css".to_string()]);
        assert!(report.skip_waiting);
        assert_eq!(storage.entry_count("capre-static-v2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_install_failure_maps_to_error_code() {
        let storage = MemoryStorage::new();
        let router = router(&storage, Arc::new(TableFetcher::default()));

        let err = install_impl(&router).await.unwrap_err();
        assert_eq!(err.code.0, -32014);
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activate_deletes_old_generation() {
        let storage = MemoryStorage::new();
        storage.open("capre-cache-v1").await.unwrap();
        storage.open("capre-static-v2").await.unwrap();
        let router = router(&storage, Arc::new(TableFetcher::default()));

        let result = activate_impl(&router).await.unwrap();
        let report: ActivateReport = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(report.deleted, vec!["capre-cache-v1".to_string()]);
        assert!(report.clients_claimed);
        assert_eq!(storage.keys().await.unwrap(), vec!["capre-static-v2".to_string()]);
    }
}
