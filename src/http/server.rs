//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the static site and the not-found dispatcher
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully
//! - Hand unmatched requests to the fallback dispatcher

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::{any, get, MethodRouter},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HandlerConfig;
use crate::dispatch::{DispatchRequest, FallbackDispatcher, LookupTransport, ReqwestTransport};
use crate::error::ConfigurationError;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::http::response::AxumResponseSink;

/// Startup failures of the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("failed to build lookup client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Time left for serving the fallback page after every resolver was tried.
const FALLBACK_ALLOWANCE: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    pub dispatcher: Arc<FallbackDispatcher>,
    pub site: Option<ServeDir>,
    pub scheme: Arc<str>,
}

/// HTTP server hosting the not-found dispatcher.
pub struct HttpServer {
    router: Router,
    config: HandlerConfig,
}

impl HttpServer {
    /// Create a server that looks up redirects over HTTP.
    pub fn new(config: HandlerConfig) -> Result<Self, ServerError> {
        let transport = Arc::new(ReqwestTransport::new(config.dispatcher.use_system_proxy)?);
        Self::with_transport(config, transport)
    }

    /// Create a server using the given lookup transport.
    pub fn with_transport(
        config: HandlerConfig,
        transport: Arc<dyn LookupTransport>,
    ) -> Result<Self, ServerError> {
        let dispatcher = Arc::new(FallbackDispatcher::from_config(&config.dispatcher, transport)?);

        let site = config.site.document_root.as_ref().map(ServeDir::new);
        if site.is_none() && dispatcher.default_fallback_page().is_some() {
            tracing::warn!("Default fallback page configured without site.document_root; it will never be served");
        }

        let request_timeout = effective_request_timeout(config.listener.request_timeout_secs, &dispatcher);
        let state = AppState {
            dispatcher,
            site,
            scheme: Arc::from(config.listener.scheme.as_str()),
        };

        let router = Self::build_router(request_timeout, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_timeout: Duration, state: AppState) -> Router {
        let dispatch: MethodRouter = any(not_found_handler).with_state(state.clone());

        let router = Router::new().route("/healthz", get(health_handler));
        let router = match state.site {
            Some(site) => router.fallback_service(
                site.call_fallback_on_method_not_allowed(true)
                    .fallback(dispatch),
            ),
            None => router.fallback_service(dispatch),
        };

        router
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }
}

/// Request timeout long enough for a dispatch that tries every resolver.
///
/// A configured value below `resolvers x lookup timeout` plus the fallback
/// allowance is raised, otherwise a hanging pool would end in a timeout
/// response instead of the fallback page.
pub fn effective_request_timeout(configured_secs: u64, dispatcher: &FallbackDispatcher) -> Duration {
    let configured = Duration::from_secs(configured_secs);
    let resolvers = u32::try_from(dispatcher.pool().len()).unwrap_or(u32::MAX);
    let required = dispatcher
        .timeout()
        .saturating_mul(resolvers)
        .saturating_add(FALLBACK_ALLOWANCE);

    if configured >= required {
        return configured;
    }
    tracing::warn!(
        configured_secs,
        required_ms = required.as_millis() as u64,
        resolvers,
        "Request timeout shorter than a full dispatch, raising it"
    );
    required
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Ask the resolvers about a request nothing else could serve.
async fn not_found_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, _body) = request.into_parts();
    let request_id = parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let dispatch_request = DispatchRequest::from_parts(&state.scheme, &parts);
    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        original_url = %dispatch_request.original_url(),
        "Dispatching unmatched request"
    );

    let outcome = state.dispatcher.dispatch(&dispatch_request).await;
    tracing::info!(request_id = %request_id, outcome = %outcome, "Not-found request resolved");

    let mut sink = AxumResponseSink::new(state.site.clone(), &parts);
    state.dispatcher.apply_outcome(outcome, &mut sink).await;
    sink.into_response()
}
