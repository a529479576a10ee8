//! Error taxonomy for the redirect handler.
//!
//! Only [`ConfigurationError`] ever crosses the component boundary. Resolver
//! and forward failures are absorbed by the dispatcher and turned into the
//! not-found path.

use std::time::Duration;
use thiserror::Error;

/// Fatal, startup-time configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("access key is not a valid header value")]
    InvalidAccessKey,

    #[error("no valid resolver endpoint in `{0}`")]
    EmptyResolverPool(String),

    #[error("resolver endpoint separator must not be empty")]
    EmptySeparator,
}

/// A single resolver attempt that produced no usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverUnavailable {
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("status {0} without a usable Location header")]
    MissingLocation(u16),
}

/// Forwarding to the default fallback page did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackForwardFailure {
    #[error("no document root to serve {0} from")]
    NoDocumentRoot(String),

    #[error("invalid fallback page `{0}`")]
    InvalidPage(String),

    #[error("fallback page {page} answered {status}")]
    Status { page: String, status: u16 },
}
