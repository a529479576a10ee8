//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HandlerConfig (validated, immutable)
//!     → passed by value into the dispatcher and server constructors
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DispatcherConfig, HandlerConfig, ListenerConfig, ObservabilityConfig, SiteConfig,
    MIN_LOOKUP_TIMEOUT_MS,
};
