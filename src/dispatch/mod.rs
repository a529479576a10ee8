//! Not-found dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Unhandled request (scheme, host, path, headers)
//!     → request.rs (DispatchRequest)
//!     → dispatcher.rs
//!         → resolver pool permutation
//!         → transport.rs (GET <endpoint>?r=<url>, timeout-bounded)
//!         → first 3xx Location wins
//!     → outcome.rs (Redirected | NotFound)
//!     → sink.rs (redirect, or forward to fallback page)
//! ```

pub mod dispatcher;
pub mod outcome;
pub mod request;
pub mod sink;
pub mod transport;

pub use dispatcher::{effective_lookup_timeout, FallbackDispatcher, ACCESS_KEY_HEADER};
pub use outcome::DispatchOutcome;
pub use request::DispatchRequest;
pub use sink::ResponseSink;
pub use transport::{LookupRequest, LookupResponse, LookupTransport, ReqwestTransport};
