//! Network-first: prefer live data, degrade to the last known good copy.

use swcache_core::{Error, RequestDescriptor};

use super::{Served, StrategyContext};

pub async fn network_first(ctx: &StrategyContext, request: &RequestDescriptor) -> Result<Served, Error> {
    match ctx.fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_success() {
                ctx.store_copy(&ctx.stores.general_store, request, &response).await;
            }
            Ok(Served::network(response))
        }
        Err(e) => {
            tracing::debug!("network-first fetch failed for {}: {}", request.url, e);
            match ctx.storage.match_any(request).await? {
                Some(cached) => Ok(Served::cached(cached)),
                None => Ok(Served::offline()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swcache_core::{CacheStorage, MemoryStorage, ResponseDescriptor};

    use super::*;
    use crate::strategy::ResponseSource;
    use crate::testing::{ScriptedFetcher, context, get, ok};

    const API: &str = "http://localhost:5000/principal/api/animal/7";

    #[tokio::test]
    async fn test_success_is_stored_in_general_store() {
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::default().respond(API, ok("{\"id\":7}")));
        let ctx = context(&storage, &fetcher);

        let served = network_first(&ctx, &get(API)).await.unwrap();
        assert_eq!(served.source, ResponseSource::Network);

        let stored = storage.match_in("general-v1", &get(API)).await.unwrap().unwrap();
        assert_eq!(stored.body_text(), "{\"id\":7}");
    }

    #[tokio::test]
    async fn test_prefers_network_over_cache() {
        let storage = MemoryStorage::new();
        storage.put("general-v1", &get(API), &ok("old")).await.unwrap();
        let fetcher = Arc::new(ScriptedFetcher::default().respond(API, ok("new")));
        let ctx = context(&storage, &fetcher);

        let served = network_first(&ctx, &get(API)).await.unwrap();
        assert_eq!(served.response.body_text(), "new");
        let stored = storage.match_in("general-v1", &get(API)).await.unwrap().unwrap();
        assert_eq!(stored.body_text(), "new");
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_cache() {
        let storage = MemoryStorage::new();
        storage.put("general-v1", &get(API), &ok("last known good")).await.unwrap();
        let fetcher = Arc::new(ScriptedFetcher::offline());
        let ctx = context(&storage, &fetcher);

        let served = network_first(&ctx, &get(API)).await.unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.response.body_text(), "last known good");
    }

    #[tokio::test]
    async fn test_failure_without_cache_is_offline() {
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::offline());
        let ctx = context(&storage, &fetcher);

        let served = network_first(&ctx, &get(API)).await.unwrap();
        assert_eq!(served.source, ResponseSource::Offline);
        assert_eq!(served.response.status, 503);
        assert_eq!(served.response.body_text(), "Offline");
    }

    #[tokio::test]
    async fn test_server_error_returned_uncached() {
        let storage = MemoryStorage::new();
        storage.put("general-v1", &get(API), &ok("cached")).await.unwrap();
        let fetcher = Arc::new(ScriptedFetcher::default().respond(API, ResponseDescriptor::new(500, "boom")));
        let ctx = context(&storage, &fetcher);

        let served = network_first(&ctx, &get(API)).await.unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.response.status, 500);
        let stored = storage.match_in("general-v1", &get(API)).await.unwrap().unwrap();
        assert_eq!(stored.body_text(), "cached");
    }

    #[tokio::test]
    async fn test_post_response_returned_when_store_rejects() {
        let url = "http://localhost:5000/principal/ordenos/auto-guardar";
        let storage = MemoryStorage::new();
        let fetcher = Arc::new(ScriptedFetcher::default().respond(url, ok("{\"ok\":true}")));
        let ctx = context(&storage, &fetcher);
        let request = get(url).with_method("POST").with_body("litros=12");

        let served = network_first(&ctx, &request).await.unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.response.body_text(), "{\"ok\":true}");
        assert!(storage.keys().await.unwrap().is_empty());
    }
}
