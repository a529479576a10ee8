//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_lookups_total` (counter): resolver attempts by result
//! - `redirect_lookup_duration_seconds` (histogram): per-attempt latency
//! - `redirect_dispatch_total` (counter): dispatches by outcome
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::dispatch::DispatchOutcome;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one resolver attempt. `result` is `redirect`, `miss` or `error`.
pub fn record_lookup(result: &'static str, start: Instant) {
    counter!("redirect_lookups_total", "result" => result).increment(1);
    histogram!("redirect_lookup_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the final decision of a dispatch.
pub fn record_dispatch(outcome: &DispatchOutcome) {
    counter!("redirect_dispatch_total", "outcome" => outcome.label()).increment(1);
}
