//! Result of one dispatch.

use std::fmt;

/// What the dispatcher decided for a not-found request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A resolver knows a target; redirect the client there.
    Redirected(String),
    /// No resolver produced a redirect.
    NotFound,
}

impl DispatchOutcome {
    /// Metric/log label.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Redirected(_) => "redirected",
            DispatchOutcome::NotFound => "not_found",
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Redirected(location) => write!(f, "redirected to {}", location),
            DispatchOutcome::NotFound => f.write_str("not found"),
        }
    }
}
