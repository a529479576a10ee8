//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build dispatcher → Bind listener → Serve
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → stop accepting → finish in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal at startup
//! - Listener binds last (traffic only when ready)

pub mod signals;

pub use signals::shutdown_signal;
