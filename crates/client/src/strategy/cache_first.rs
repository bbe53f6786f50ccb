//! Cache-first: serve any cached copy without touching the network.
//!
//! Once an asset is cached it is served until its store is deleted; there
//! is no staleness check.

use swcache_core::{Error, RequestDescriptor};

use super::{Served, StrategyContext};

pub async fn cache_first(ctx: &StrategyContext, request: &RequestDescriptor) -> Result<Served, Error> {
    if let Some(cached) = ctx.storage.match_any(request).await? {
        tracing::debug!("cache-first hit for {}", request.url);
        return Ok(Served::cached(cached));
    }

    match ctx.fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_success() {
                ctx.store_copy(&ctx.stores.static_store, request, &response).await;
            }
            Ok(Served::network(response))
        }
        Err(e) => {
            tracing::debug!("cache-first fetch failed for {}: {}", request.url, e);
            Ok(Served::offline())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swcache_core::{CacheStorage, Destination, MemoryStorage, ResponseDescriptor};

    use super::*;
    use crate::strategy::ResponseSource;
    use crate::testing::{ScriptedFetcher, context, get, ok};

    const APP_JS: &str = "http://localhost:5000/static/js/app.js";

    #[tokio::test]
    async fn test_hit_skips_network() {
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::default().respond(APP_JS, ok("fresh")));
        let ctx = context(&storage, &fetcher);
        storage.put("static-v1", &get(APP_JS), &ok("cached")).await.unwrap();

        let served = cache_first(&ctx, &get(APP_JS)).await.unwrap();

        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.response.body_text(), "cached");
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_hit_in_general_store_counts() {
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::offline());
        let ctx = context(&storage, &fetcher);
        storage.put("general-v1", &get(APP_JS), &ok("from general")).await.unwrap();

        let served = cache_first(&ctx, &get(APP_JS)).await.unwrap();
        assert_eq!(served.response.body_text(), "from general");
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_script_miss_is_cached_in_static_store() {
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::default().respond(APP_JS, ok("console.log(1)")));
        let ctx = context(&storage, &fetcher);
        let request = get(APP_JS).with_destination(Destination::Script);

        let served = cache_first(&ctx, &request).await.unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.response.status, 200);

        let stored = storage.match_in("static-v1", &request).await.unwrap().unwrap();
        assert_eq!(stored.body_text(), "console.log(1)");
        assert_eq!(storage.entry_count("general-v1").await.unwrap(), 0);

        let again = cache_first(&ctx, &request).await.unwrap();
        assert_eq!(again.source, ResponseSource::Cache);
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_not_cached() {
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::default().respond(APP_JS, ResponseDescriptor::new(404, "missing")));
        let ctx = context(&storage, &fetcher);

        let served = cache_first(&ctx, &get(APP_JS)).await.unwrap();
        assert_eq!(served.response.status, 404);
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_is_offline() {
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::offline());
        let ctx = context(&storage, &fetcher);

        let served = cache_first(&ctx, &get(APP_JS)).await.unwrap();
        assert_eq!(served.source, ResponseSource::Offline);
        assert_eq!(served.response.status, 503);
        assert_eq!(served.response.body_text(), "Offline");
    }
}
