//! Request identity for cache entries.

use sha2::{Digest, Sha256};

use crate::request::RequestDescriptor;

/// Compute the cache key for a method and URL.
pub fn compute_cache_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cache key of a request: method plus URL without fragment.
pub fn request_key(request: &RequestDescriptor) -> String {
    compute_cache_key(&request.method, &request.cache_url())
}
