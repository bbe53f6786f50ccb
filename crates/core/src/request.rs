//! Request descriptors as seen by the router.

use bytes::Bytes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

/// Kind of resource the request is for, as reported by the requester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// No destination (plain `fetch()` calls, XHR).
    #[default]
    #[serde(rename = "")]
    Empty,
    Document,
    Style,
    Script,
    Image,
    Font,
    Manifest,
    Worker,
    Audio,
    Video,
    #[serde(other)]
    Other,
}

impl Destination {
    /// Stylesheets, scripts and images are long-lived assets.
    pub fn is_static_asset(self) -> bool {
        matches!(self, Destination::Style | Destination::Script | Destination::Image)
    }
}

/// Request mode, as reported by the requester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level page navigation.
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

/// An intercepted outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: Url,
    pub destination: Destination,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RequestDescriptor {
    /// A plain `GET` with no destination, in `cors` mode.
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            destination: Destination::Empty,
            mode: RequestMode::Cors,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into().to_ascii_uppercase();
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// URL path without query string.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the requester will accept an HTML document.
    pub fn accepts_html(&self) -> bool {
        self.header("accept").is_some_and(|v| v.contains("text/html"))
    }

    /// URL used for the cache identity, without fragment.
    pub fn cache_url(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.to_string()
    }

    /// Cache stores only hold `GET` responses.
    pub fn ensure_cacheable(&self) -> Result<(), Error> {
        if self.method == "GET" {
            Ok(())
        } else {
            Err(Error::UnsupportedMethod(format!("{} {}", self.method, self.url)))
        }
    }
}
