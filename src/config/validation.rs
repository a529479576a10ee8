//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required settings present (access key, resolver endpoints)
//! - Addresses parse, schemes and paths are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: HandlerConfig → Result<(), Vec<ValidationError>>
//! - Endpoint URLs are checked when the pool is built, not here

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::HandlerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("dispatcher.access_key must be set")]
    MissingAccessKey,

    #[error("dispatcher.resolver_endpoints must be set")]
    MissingResolverEndpoints,

    #[error("dispatcher.separator must not be empty")]
    EmptySeparator,

    #[error("dispatcher.default_fallback_page `{0}` must start with '/'")]
    RelativeFallbackPage(String),

    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.scheme `{0}` must be http or https")]
    InvalidScheme(String),

    #[error("listener.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &HandlerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let dispatcher = &config.dispatcher;
    if dispatcher.access_key.trim().is_empty() {
        errors.push(ValidationError::MissingAccessKey);
    }
    if dispatcher.resolver_endpoints.trim().is_empty() {
        errors.push(ValidationError::MissingResolverEndpoints);
    }
    if dispatcher.separator.is_empty() {
        errors.push(ValidationError::EmptySeparator);
    }
    if let Some(page) = dispatcher.default_fallback_page.as_deref() {
        if !page.trim().is_empty() && !page.starts_with('/') {
            errors.push(ValidationError::RelativeFallbackPage(page.to_string()));
        }
    }

    let listener = &config.listener;
    if listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(listener.bind_address.clone()));
    }
    if !matches!(listener.scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::InvalidScheme(listener.scheme.clone()));
    }
    if listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
