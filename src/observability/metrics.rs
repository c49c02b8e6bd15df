//! Metrics collection and exposition.
//!
//! # Metrics
//! - `storefront_http_requests_total` (counter): requests by method, route, status
//! - `storefront_http_request_duration_seconds` (histogram): latency distribution
//! - `storefront_readiness_attempts_total` (counter): startup migration attempts by outcome
//! - `storefront_order_events_published_total` (counter): order events sent to the bus

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let route = route.to_string();
    let status = status.to_string();

    metrics::counter!(
        "storefront_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.clone()
    )
    .increment(1);

    metrics::histogram!(
        "storefront_http_request_duration_seconds",
        "method" => method,
        "route" => route,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one readiness guard attempt.
pub fn record_readiness_attempt(outcome: &'static str) {
    metrics::counter!("storefront_readiness_attempts_total", "outcome" => outcome).increment(1);
}

/// Record an order event handed to the bus.
pub fn record_order_published() {
    metrics::counter!("storefront_order_events_published_total").increment(1);
}
