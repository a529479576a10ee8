//! Fallback dispatcher.
//!
//! # Responsibilities
//! - Ask resolvers, one at a time in random order, for a redirect
//! - Sanitize propagated headers and attach the access key
//! - Bound every lookup by the configured timeout
//! - Turn the decision into a redirect, a fallback page, or nothing
//!
//! # Design Decisions
//! - Resolver failures are logged and skipped, never returned
//! - Sequential attempts, no fan-out
//! - The terminal path never fails outward

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;

use crate::config::{DispatcherConfig, MIN_LOOKUP_TIMEOUT_MS};
use crate::dispatch::outcome::DispatchOutcome;
use crate::dispatch::request::DispatchRequest;
use crate::dispatch::sink::ResponseSink;
use crate::dispatch::transport::{LookupRequest, LookupResponse, LookupTransport};
use crate::error::{ConfigurationError, ResolverUnavailable};
use crate::observability::metrics;
use crate::resolver::{HostPolicy, ResolverPool};

/// Credential header understood by the resolvers.
pub const ACCESS_KEY_HEADER: HeaderName = HeaderName::from_static("x-gbi-key");

/// Original headers that must not reach a resolver. `Host` would target the
/// wrong origin; the framing headers describe a body the lookup does not have.
const SKIPPED_HEADERS: [HeaderName; 3] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
];

/// Resolves not-found requests against the resolver pool.
pub struct FallbackDispatcher {
    pool: Arc<ResolverPool>,
    transport: Arc<dyn LookupTransport>,
    timeout: Duration,
    access_key: HeaderValue,
    default_fallback_page: Option<String>,
}

impl std::fmt::Debug for FallbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackDispatcher")
            .field("pool", &self.pool)
            .field("timeout", &self.timeout)
            .field("default_fallback_page", &self.default_fallback_page)
            .finish_non_exhaustive()
    }
}

impl FallbackDispatcher {
    /// Build a dispatcher from configuration.
    ///
    /// Fails when the access key is blank or unusable, or when no valid
    /// resolver endpoint remains. A low timeout is raised, not rejected.
    pub fn from_config(
        config: &DispatcherConfig,
        transport: Arc<dyn LookupTransport>,
    ) -> Result<Self, ConfigurationError> {
        if config.access_key.trim().is_empty() {
            return Err(ConfigurationError::Missing("dispatcher.access_key"));
        }
        let access_key = HeaderValue::from_str(&config.access_key)
            .map_err(|_| ConfigurationError::InvalidAccessKey)?;

        if config.resolver_endpoints.trim().is_empty() {
            return Err(ConfigurationError::Missing("dispatcher.resolver_endpoints"));
        }
        let policy = if config.allow_local_urls {
            HostPolicy::AllowLocal
        } else {
            HostPolicy::PublicOnly
        };
        let pool = ResolverPool::build_with_policy(&config.resolver_endpoints, &config.separator, policy)?;

        let default_fallback_page = config
            .default_fallback_page
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        if default_fallback_page.is_none() {
            tracing::warn!("No default fallback page set");
        }

        let timeout = effective_lookup_timeout(config.lookup_timeout_ms);

        tracing::info!(
            resolvers = pool.len(),
            timeout_ms = timeout.as_millis() as u64,
            fallback_page = ?default_fallback_page,
            "Fallback dispatcher configured"
        );

        Ok(Self {
            pool: Arc::new(pool),
            transport,
            timeout,
            access_key,
            default_fallback_page,
        })
    }

    /// Ask each resolver in a fresh random order until one redirects.
    pub async fn dispatch(&self, request: &DispatchRequest) -> DispatchOutcome {
        let encoded = request.encoded_original_url();
        let headers = self.lookup_headers(request.headers());

        let mut outcome = DispatchOutcome::NotFound;
        for endpoint in self.pool.pick_order() {
            let lookup = LookupRequest {
                url: endpoint.lookup_url(&encoded),
                headers: headers.clone(),
            };

            let start = Instant::now();
            match self.attempt(lookup).await {
                Ok(Some(location)) => {
                    metrics::record_lookup("redirect", start);
                    tracing::info!(
                        resolver = %endpoint,
                        original_url = %request.original_url(),
                        location = %location,
                        "Redirected"
                    );
                    outcome = DispatchOutcome::Redirected(location);
                    break;
                }
                Ok(None) => metrics::record_lookup("miss", start),
                Err(e) => {
                    metrics::record_lookup("error", start);
                    tracing::error!(
                        resolver = %endpoint,
                        error = %e,
                        "Error while requesting redirect"
                    );
                }
            }
        }

        if outcome == DispatchOutcome::NotFound {
            tracing::debug!(original_url = %request.original_url(), "No resolver knows a redirect");
        }
        metrics::record_dispatch(&outcome);
        outcome
    }

    /// Carry out the decision through the host's response primitives.
    pub async fn apply_outcome(&self, outcome: DispatchOutcome, sink: &mut dyn ResponseSink) {
        match outcome {
            DispatchOutcome::Redirected(location) => sink.send_redirect(&location).await,
            DispatchOutcome::NotFound => {
                let Some(page) = self.default_fallback_page.as_deref() else {
                    return;
                };
                if let Err(e) = sink.forward(page).await {
                    tracing::debug!(page = %page, error = %e, "Fallback page could not be forwarded");
                }
            }
        }
    }

    /// Effective per-resolver lookup timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn pool(&self) -> &ResolverPool {
        &self.pool
    }

    pub fn default_fallback_page(&self) -> Option<&str> {
        self.default_fallback_page.as_deref()
    }

    async fn attempt(&self, lookup: LookupRequest) -> Result<Option<String>, ResolverUnavailable> {
        let response = time::timeout(self.timeout, self.transport.lookup(lookup))
            .await
            .map_err(|_| ResolverUnavailable::Timeout(self.timeout))??;

        tracing::debug!(status = %response.status, "Resolver answered");
        redirect_location(&response)
    }

    fn lookup_headers(&self, original: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(original.len() + 1);
        for (name, value) in original {
            if SKIPPED_HEADERS.contains(name) {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
        headers.insert(ACCESS_KEY_HEADER, self.access_key.clone());
        headers
    }
}

/// Raise a missing or too small timeout to [`MIN_LOOKUP_TIMEOUT_MS`].
pub fn effective_lookup_timeout(configured_ms: Option<u64>) -> Duration {
    let ms = match configured_ms {
        Some(ms) if ms >= MIN_LOOKUP_TIMEOUT_MS => ms,
        Some(ms) => {
            tracing::warn!(
                configured_ms = ms,
                minimum_ms = MIN_LOOKUP_TIMEOUT_MS,
                "Configured lookup timeout below minimum, using minimum"
            );
            MIN_LOOKUP_TIMEOUT_MS
        }
        None => {
            tracing::warn!(minimum_ms = MIN_LOOKUP_TIMEOUT_MS, "No lookup timeout configured, using minimum");
            MIN_LOOKUP_TIMEOUT_MS
        }
    };
    Duration::from_millis(ms)
}

/// `Some(location)` for a 3xx carrying one, `None` for any non-3xx.
fn redirect_location(response: &LookupResponse) -> Result<Option<String>, ResolverUnavailable> {
    if !response.status.is_redirection() {
        return Ok(None);
    }
    response
        .headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .filter(|l| !l.is_empty())
        .map(|l| Some(l.to_string()))
        .ok_or(ResolverUnavailable::MissingLocation(response.status.as_u16()))
}
