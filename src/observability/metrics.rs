//! Metrics collection and exposition.
//!
//! # Metrics
//! - `spend_page_views_total` (counter): shell pages served by route, status
//! - `spend_lookup_misses_total` (counter): lookup misses by table
//! - `spend_request_duration_seconds` (histogram): latency of every request
//!   by endpoint (matched API path, or `shell` for page views), status
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus endpoint only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a rendered shell page.
pub fn record_page_view(route: &'static str, status: u16) {
    metrics::counter!(
        "spend_page_views_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the latency of a served request.
pub fn record_request(endpoint: String, status: u16, start: Instant) {
    metrics::histogram!(
        "spend_request_duration_seconds",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a lookup outside one of the static tables.
pub fn record_lookup_miss(table: &'static str) {
    metrics::counter!("spend_lookup_misses_total", "table" => table).increment(1);
}
