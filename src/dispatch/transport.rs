//! Outbound lookup transport.
//!
//! # Responsibilities
//! - Execute one resolver lookup (GET, no redirect following)
//! - Report status and headers, or a transport failure
//!
//! # Design Decisions
//! - The dispatcher owns the timeout; transports just execute
//! - One shared client so connections are pooled across dispatches

use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use reqwest::redirect::Policy;

use crate::error::ResolverUnavailable;

/// A lookup ready to be sent to one resolver.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    /// `<endpoint>?r=<encoded original url>`
    pub url: String,
    /// Headers to send, already sanitized.
    pub headers: HeaderMap,
}

/// The parts of a resolver answer the dispatcher looks at.
#[derive(Debug, Clone)]
pub struct LookupResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Capability to send a lookup to a resolver.
#[async_trait]
pub trait LookupTransport: Send + Sync + 'static {
    /// Send a GET for `request`. Must not follow redirects.
    async fn lookup(&self, request: LookupRequest) -> Result<LookupResponse, ResolverUnavailable>;
}

/// Lookup transport backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose client never follows redirects.
    ///
    /// With `use_system_proxy` unset, `HTTP(S)_PROXY` is ignored.
    pub fn new(use_system_proxy: bool) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().redirect(Policy::none());
        if !use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl LookupTransport for ReqwestTransport {
    async fn lookup(&self, request: LookupRequest) -> Result<LookupResponse, ResolverUnavailable> {
        let response = self
            .client
            .get(&request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| ResolverUnavailable::Transport(e.to_string()))?;

        Ok(LookupResponse {
            status: response.status(),
            headers: response.headers().clone(),
        })
    }
}
