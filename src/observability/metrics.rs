//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): lookups by route, `none` when unmatched
//! - `router_navigations_total` (counter): navigations by trigger and outcome
//! - `router_fallbacks_total` (counter): fallback invocations by kind
//! - `router_http_requests_total` (counter): dev server requests by endpoint and status
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Prometheus exporter only when `observability.metrics_enabled`

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_resolution(route: Option<&str>) {
    let (route, outcome) = match route {
        Some(route) => (route.to_owned(), "matched"),
        None => ("none".to_owned(), "unmatched"),
    };
    metrics::counter!("router_resolutions_total", "route" => route, "outcome" => outcome)
        .increment(1);
}

pub fn record_navigation(trigger: &'static str, outcome: &'static str) {
    metrics::counter!("router_navigations_total", "trigger" => trigger, "outcome" => outcome)
        .increment(1);
}

pub fn record_fallback(kind: &'static str) {
    metrics::counter!("router_fallbacks_total", "kind" => kind).increment(1);
}

pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!(
        "router_http_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}
