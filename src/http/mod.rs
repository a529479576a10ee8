//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → static site (ServeDir) or /healthz
//!     → unmatched: dispatcher
//!     → response.rs (redirect, fallback page, or bare 404)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::AxumResponseSink;
pub use server::{effective_request_timeout, HttpServer, ServerError};
