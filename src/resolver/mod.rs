//! Resolver pool subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher.resolver_endpoints (raw string)
//!     → split on separator
//!     → endpoint.rs (validate each token)
//!     → pool.rs (dedupe, freeze)
//!
//! Per dispatch:
//!     pool.pick_order() → fresh random permutation
//! ```
//!
//! # Design Decisions
//! - Pool is immutable after startup and shared without locks
//! - Invalid tokens are skipped; only an empty result is an error
//! - One shuffle per dispatch, so each endpoint is tried at most once

pub mod endpoint;
pub mod pool;

pub use endpoint::{HostPolicy, ResolverEndpoint};
pub use pool::ResolverPool;
