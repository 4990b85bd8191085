//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, route, status
//! - `router_request_duration_seconds` (histogram): latency by method, route
//! - `router_routes_registered` (gauge): size of the live route table
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests and
//!   the CLI never need to set one up
//! - Unmatched requests are labelled `route="none"`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Route label for requests that matched nothing.
pub const UNMATCHED: &str = "none";

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one served request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();

    metrics::counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "router_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(elapsed);
}

/// Publish the number of registered routes.
pub fn record_routes(count: usize) {
    metrics::gauge!("router_routes_registered").set(count as f64);
}
