//! Test doubles for the fetch primitive.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use swcache_core::{Error, MemoryStorage, RequestDescriptor, ResponseDescriptor};
use tokio::sync::Notify;

use crate::fetch::Fetcher;
use crate::strategy::{StoreNames, StrategyContext};

/// Fetcher that answers from a fixed URL table and records every call.
///
/// URLs without an entry fail with `NETWORK_ERROR`. With a gate set, every
/// fetch waits for the gate to be released before answering.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, ResponseDescriptor>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedFetcher {
    /// A fetcher for which every request fails.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, response: ResponseDescriptor) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor, Error> {
        self.calls.lock().unwrap().push(request.url.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .get(request.url.as_str())
            .cloned()
            .ok_or_else(|| Error::NetworkError(format!("no route to {}", request.url)))
    }
}

pub fn store_names() -> StoreNames {
    StoreNames { static_store: "static-v1".to_string(), general_store: "general-v1".to_string() }
}

pub fn context(storage: &MemoryStorage, fetcher: &Arc<ScriptedFetcher>) -> StrategyContext {
    StrategyContext { storage: Arc::new(storage.clone()), fetcher: fetcher.clone(), stores: store_names() }
}

pub fn get(url: &str) -> RequestDescriptor {
    RequestDescriptor::get(url::Url::parse(url).unwrap())
}

pub fn ok(body: &'static str) -> ResponseDescriptor {
    ResponseDescriptor::new(200, body)
}
