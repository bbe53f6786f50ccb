//! cache_fetch tool implementation.
//!
//! Routes one request through the cache router, the way an intercepted
//! fetch event would be. Bypassed routes are fetched directly.

use std::collections::BTreeMap;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::fetch::resolve;
use swcache_client::{CacheRouter, Interception, ResponseSource};
use swcache_core::{Destination, Error, RequestDescriptor, RequestMode, ResponseDescriptor, Route, Strategy};

use super::json_result;

/// Input parameters for the cache_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheFetchParams {
    /// Absolute URL, or a path resolved against the configured scope.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Resource type being requested: "", "document", "style", "script", "image", ...
    #[serde(default)]
    pub destination: Destination,

    /// Request mode: "navigate", "same-origin", "no-cors" or "cors" (default).
    #[serde(default)]
    pub mode: RequestMode,

    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Request body, sent as-is.
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".into()
}

/// Where the response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FetchSource {
    Network,
    Cache,
    Offline,
    /// Not intercepted; fetched directly.
    Passthrough,
}

impl From<ResponseSource> for FetchSource {
    fn from(source: ResponseSource) -> Self {
        match source {
            ResponseSource::Network => FetchSource::Network,
            ResponseSource::Cache => FetchSource::Cache,
            ResponseSource::Offline => FetchSource::Offline,
        }
    }
}

/// Output structure for the cache_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheFetchOutput {
    /// The resolved request URL.
    pub url: String,
    /// Route class the request fell into.
    pub route: Route,
    /// Strategy applied, absent for passthrough.
    pub strategy: Option<Strategy>,
    pub source: FetchSource,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    /// Response body as UTF-8 (lossy).
    pub body: String,
}

impl CacheFetchParams {
    fn to_request(&self, router: &CacheRouter) -> Result<RequestDescriptor, Error> {
        if self.method.trim().is_empty() {
            return Err(Error::InvalidInput("method cannot be empty".into()));
        }

        let url = resolve(router.scope(), &self.url).map_err(|e| Error::InvalidUrl(format!("{}: {}", self.url, e)))?;

        let mut request = RequestDescriptor::get(url)
            .with_method(self.method.trim())
            .with_destination(self.destination)
            .with_mode(self.mode);
        for (name, value) in &self.headers {
            request = request.with_header(name.as_str(), value.as_str());
        }
        if let Some(body) = &self.body {
            request = request.with_body(body.clone());
        }
        Ok(request)
    }
}

fn output(
    request: &RequestDescriptor, route: Route, strategy: Option<Strategy>, source: FetchSource,
    response: ResponseDescriptor,
) -> CacheFetchOutput {
    let body = response.body_text();
    CacheFetchOutput {
        url: request.url.to_string(),
        route,
        strategy,
        source,
        status: response.status,
        status_text: response.status_text,
        headers: response.headers,
        body,
    }
}

/// Implementation of the cache_fetch tool.
pub async fn fetch_impl(router: &CacheRouter, params: CacheFetchParams) -> Result<CallToolResult, McpError> {
    let request = params.to_request(router)?;

    let result = match router.handle_fetch(&request).await? {
        Interception::Passthrough => {
            let response = router.passthrough(&request).await?;
            output(&request, Route::Bypass, None, FetchSource::Passthrough, response)
        }
        Interception::Respond { route, strategy, served } => {
            // the revalidation handle is dropped here; the refresh keeps running detached
            output(&request, route, Some(strategy), served.source.into(), served.response)
        }
    };

    json_result(&result)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swcache_core::{CacheStorage, MemoryStorage};

    use super::*;
    use crate::tools::test_support::{TableFetcher, output_text, router};

    fn params(url: &str) -> CacheFetchParams {
        CacheFetchParams {
            url: url.into(),
            method: default_method(),
            destination: Destination::Empty,
            mode: RequestMode::Cors,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_passthrough() {
        let storage = MemoryStorage::new();
        let mut fetcher = TableFetcher::default();
        fetcher
            .responses
            .insert("http://localhost:5000/principal/exportar".into(), ResponseDescriptor::new(200, "dbf"));
        let router = router(&storage, Arc::new(fetcher));

        let result = fetch_impl(&router, params("/principal/exportar")).await.unwrap();
        let output: CacheFetchOutput = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output.route, Route::Bypass);
        assert_eq!(output.source, FetchSource::Passthrough);
        assert!(output.strategy.is_none());
        assert_eq!(output.body, "dbf");
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_passthrough_network_error() {
        let storage = MemoryStorage::new();
        let router = router(&storage, Arc::new(TableFetcher::default()));

        let result = fetch_impl(&router, params("/upload")).await;
        assert_eq!(result.unwrap_err().code.0, -32008);
    }

    #[tokio::test]
    async fn test_fetch_offline_response() {
        let storage = MemoryStorage::new();
        let router = router(&storage, Arc::new(TableFetcher::default()));

        let mut p = params("/principal");
        p.mode = RequestMode::Navigate;
        let result = fetch_impl(&router, p).await.unwrap();
        let output: CacheFetchOutput = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output.route, Route::Navigation);
        assert_eq!(output.strategy, Some(Strategy::StaleWhileRevalidate));
        assert_eq!(output.source, FetchSource::Offline);
        assert_eq!(output.status, 503);
        assert_eq!(output.body, "Offline");
    }

    #[tokio::test]
    async fn test_fetch_script_cached() {
        let storage = MemoryStorage::new();
        let mut fetcher = TableFetcher::default();
        fetcher
            .responses
            .insert("http://localhost:5000/static/js/app.js".into(), ResponseDescriptor::new(200, "app()"));
        let router = router(&storage, Arc::new(fetcher));

        let mut p = params("app.js");
        p.destination = Destination::Script;
        let result = fetch_impl(&router, p).await.unwrap();
        let output: CacheFetchOutput = serde_json::from_str(&output_text(&result)).unwrap();

        assert_eq!(output.url, "http://localhost:5000/static/js/app.js");
        assert_eq!(output.strategy, Some(Strategy::CacheFirst));
        assert_eq!(output.source, FetchSource::Network);
        assert_eq!(storage.entry_count("capre-static-v2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_empty_method() {
        let storage = MemoryStorage::new();
        let router = router(&storage, Arc::new(TableFetcher::default()));

        let mut p = params("/principal");
        p.method = " ".into();
        assert!(fetch_impl(&router, p).await.is_err());
    }

    #[test]
    fn test_params_defaults() {
        let p: CacheFetchParams = serde_json::from_str(r#"{"url": "/principal"}"#).unwrap();
        assert_eq!(p.method, "GET");
        assert_eq!(p.destination, Destination::Empty);
        assert_eq!(p.mode, RequestMode::Cors);
        assert!(p.headers.is_empty());
    }
}
