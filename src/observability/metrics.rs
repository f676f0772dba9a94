//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, status
//! - `http_request_duration_seconds` (histogram): latency by method
//! - `store_connect_attempts_total` (counter): boot connection attempts by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

/// Install the Prometheus exporter with an HTTP scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )?
        .install()?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one store connection attempt.
pub fn record_connect_attempt(outcome: &'static str) {
    metrics::counter!("store_connect_attempts_total", "outcome" => outcome).increment(1);
}

/// Axum middleware recording every request.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
