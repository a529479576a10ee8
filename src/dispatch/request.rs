//! Inbound request facade.
//!
//! # Responsibilities
//! - Rebuild the absolute URL of the request that hit the not-found path
//! - Keep the full original header set for propagation to resolvers

use axum::http::{header, request::Parts, HeaderMap};
use url::form_urlencoded;

/// What the dispatcher needs to know about one not-found request.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    original_url: String,
    headers: HeaderMap,
}

impl DispatchRequest {
    /// Build from the pieces the hosting server exposes.
    pub fn new(scheme: &str, host: &str, path: &str, headers: HeaderMap) -> Self {
        Self {
            original_url: format!("{}://{}{}", scheme, host, path),
            headers,
        }
    }

    /// Build from an inbound request head.
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority (HTTP/2). The query string is not part of the original URL.
    pub fn from_parts(scheme: &str, parts: &Parts) -> Self {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or_default();

        Self::new(scheme, host, parts.uri.path(), parts.headers.clone())
    }

    /// Absolute URL of the original request.
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// The original URL encoded as a single query-parameter value.
    pub fn encoded_original_url(&self) -> String {
        form_urlencoded::byte_serialize(self.original_url.as_bytes()).collect()
    }

    /// Original request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
