//! GBI redirect handler library.
//!
//! Answers requests nothing else could serve by asking a pool of redirect
//! processors for a redirect, falling back to a default error page.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resolver;

pub use config::HandlerConfig;
pub use dispatch::{DispatchOutcome, FallbackDispatcher};
pub use error::{ConfigurationError, FallbackForwardFailure, ResolverUnavailable};
pub use http::HttpServer;
pub use resolver::ResolverPool;
