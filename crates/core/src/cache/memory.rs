//! In-memory cache stores.
//!
//! Uses a Vec of named maps behind a tokio RwLock; Vec order is creation
//! order. Intended for tests and throwaway runs.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::CacheStorage;
use super::hash::request_key;
use crate::Error;
use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;

type Store = HashMap<String, ResponseDescriptor>;

/// In-memory [`CacheStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    stores: Arc<RwLock<Vec<(String, Store)>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn store_mut<'a>(stores: &'a mut Vec<(String, Store)>, name: &str) -> &'a mut Store {
    let idx = match stores.iter().position(|(n, _)| n == name) {
        Some(idx) => idx,
        None => {
            stores.push((name.to_string(), Store::new()));
            stores.len() - 1
        }
    };
    &mut stores[idx].1
}

#[async_trait::async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<(), Error> {
        let mut stores = self.stores.write().await;
        store_mut(&mut stores, name);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        let stores = self.stores.read().await;
        Ok(stores.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        let mut stores = self.stores.write().await;
        let before = stores.len();
        stores.retain(|(n, _)| n != name);
        Ok(stores.len() != before)
    }

    async fn match_in(&self, name: &str, request: &RequestDescriptor) -> Result<Option<ResponseDescriptor>, Error> {
        let key = request_key(request);
        let stores = self.stores.read().await;
        Ok(stores
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, store)| store.get(&key).cloned()))
    }

    async fn match_any(&self, request: &RequestDescriptor) -> Result<Option<ResponseDescriptor>, Error> {
        let key = request_key(request);
        let stores = self.stores.read().await;
        Ok(stores.iter().find_map(|(_, store)| store.get(&key).cloned()))
    }

    async fn put(&self, name: &str, request: &RequestDescriptor, response: &ResponseDescriptor) -> Result<(), Error> {
        request.ensure_cacheable()?;
        let key = request_key(request);
        let mut stores = self.stores.write().await;
        store_mut(&mut stores, name).insert(key, response.clone());
        Ok(())
    }

    async fn add_all(&self, name: &str, entries: &[(RequestDescriptor, ResponseDescriptor)]) -> Result<(), Error> {
        for (request, _) in entries {
            request.ensure_cacheable()?;
        }
        let mut stores = self.stores.write().await;
        let store = store_mut(&mut stores, name);
        for (request, response) in entries {
            store.insert(request_key(request), response.clone());
        }
        Ok(())
    }

    async fn entry_count(&self, name: &str) -> Result<usize, Error> {
        let stores = self.stores.read().await;
        Ok(stores.iter().find(|(n, _)| n == name).map_or(0, |(_, store)| store.len()))
    }
}
