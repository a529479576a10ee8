//! Response sink for the axum host.
//!
//! # Responsibilities
//! - Turn a redirect decision into `302 Found` + `Location`
//! - Render the fallback page from the document root with status 404
//! - Default to a bare `404 Not Found` when nothing was produced
//!
//! # Design Decisions
//! - Forwarded pages are always fetched in full (GET/HEAD, no conditionals)
//! - A missing or failing page is reported, never panics

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::dispatch::ResponseSink;
use crate::error::FallbackForwardFailure;

/// Headers that would let the forwarded page answer with a partial or
/// not-modified response.
const CONDITIONAL_HEADERS: [HeaderName; 6] = [
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_MODIFIED_SINCE,
    header::IF_UNMODIFIED_SINCE,
    header::IF_RANGE,
    header::RANGE,
];

/// Collects the response for one not-found request.
#[derive(Debug)]
pub struct AxumResponseSink {
    site: Option<ServeDir>,
    method: Method,
    headers: HeaderMap,
    response: Option<Response>,
}

impl AxumResponseSink {
    /// Sink for the request described by `parts`, serving fallback pages
    /// from `site` when present.
    pub fn new(site: Option<ServeDir>, parts: &Parts) -> Self {
        Self {
            site,
            method: parts.method.clone(),
            headers: parts.headers.clone(),
            response: None,
        }
    }

    /// The collected response, or a bare 404.
    pub fn into_response(self) -> Response {
        self.response
            .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
    }

    fn forward_request(&self, page: &str) -> Result<Request<Body>, FallbackForwardFailure> {
        let uri: Uri = page
            .parse()
            .map_err(|_| FallbackForwardFailure::InvalidPage(page.to_string()))?;
        let method = if self.method == Method::HEAD {
            Method::HEAD
        } else {
            Method::GET
        };

        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .map_err(|_| FallbackForwardFailure::InvalidPage(page.to_string()))?;

        for (name, value) in &self.headers {
            if !CONDITIONAL_HEADERS.contains(name) {
                request.headers_mut().append(name.clone(), value.clone());
            }
        }
        Ok(request)
    }
}

#[async_trait]
impl ResponseSink for AxumResponseSink {
    async fn send_redirect(&mut self, location: &str) {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                self.response = Some((StatusCode::FOUND, [(header::LOCATION, value)]).into_response());
            }
            Err(_) => {
                tracing::warn!(location = %location, "Resolver location is not a valid header value");
            }
        }
    }

    async fn forward(&mut self, page: &str) -> Result<(), FallbackForwardFailure> {
        let site = self
            .site
            .clone()
            .ok_or_else(|| FallbackForwardFailure::NoDocumentRoot(page.to_string()))?;
        let request = self.forward_request(page)?;

        let response = match site.oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        if !response.status().is_success() {
            return Err(FallbackForwardFailure::Status {
                page: page.to_string(),
                status: response.status().as_u16(),
            });
        }

        let (mut parts, body) = response.into_parts();
        parts.status = StatusCode::NOT_FOUND;
        self.response = Some(Response::from_parts(parts, Body::new(body)));
        Ok(())
    }
}
