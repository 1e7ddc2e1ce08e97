//! Metrics collection and exposition.
//!
//! # Metrics
//! - `routes_registered` (gauge): bindings installed at startup
//! - `route_access_denied_total` (counter): requests short-circuited by an access predicate, by route
//! - `stylesheet_compiles_total` (counter): stylesheet builds, by mode (`cached`, `live`)
//! - `http_requests_total` (counter): requests reaching a route endpoint, by route and status

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_routes_registered(count: usize) {
    metrics::gauge!("routes_registered").set(count as f64);
}

pub fn record_access_denied(route: &'static str) {
    metrics::counter!("route_access_denied_total", "route" => route).increment(1);
}

pub fn record_stylesheet_compile(live: bool) {
    let mode = if live { "live" } else { "cached" };
    metrics::counter!("stylesheet_compiles_total", "mode" => mode).increment(1);
}

pub fn record_request(route: &'static str, status: u16) {
    metrics::counter!(
        "http_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}
