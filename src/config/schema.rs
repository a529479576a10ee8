//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the handler.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Lowest lookup timeout the dispatcher will use, in milliseconds.
pub const MIN_LOOKUP_TIMEOUT_MS: u64 = 1000;

/// Root configuration for the redirect handler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HandlerConfig {
    /// Listener configuration (bind address, public scheme).
    pub listener: ListenerConfig,

    /// Resolver lookup settings.
    pub dispatcher: DispatcherConfig,

    /// Static site served in front of the dispatcher.
    pub site: SiteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme used when rebuilding the original absolute URL.
    /// Set to "https" when a TLS terminator sits in front of the handler.
    pub scheme: String,

    /// Total time allowed for one inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            scheme: "http".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Resolver lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// License key sent to resolvers as `X-gbi-key`.
    pub access_key: String,

    /// Resolver endpoint URLs joined by `separator`.
    pub resolver_endpoints: String,

    /// Separator for `resolver_endpoints`.
    pub separator: String,

    /// Per-resolver lookup timeout in milliseconds. Values below
    /// [`MIN_LOOKUP_TIMEOUT_MS`] are raised to it.
    pub lookup_timeout_ms: Option<u64>,

    /// Page (path under the document root) shown when no resolver redirects.
    pub default_fallback_page: Option<String>,

    /// Accept loopback and local resolver hosts.
    pub allow_local_urls: bool,

    /// Send lookups through the proxy named by `HTTP(S)_PROXY`.
    pub use_system_proxy: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            resolver_endpoints: String::new(),
            separator: ",".to_string(),
            lookup_timeout_ms: None,
            default_fallback_page: None,
            allow_local_urls: true,
            use_system_proxy: true,
        }
    }
}

/// Static site configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory served for existing paths; missing files go to the dispatcher.
    pub document_root: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
