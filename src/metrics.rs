//! Prometheus metrics for request and upstream call monitoring.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Inbound requests served counter metric name.
pub const METRIC_REQUESTS_SERVED: &str = "requests_served_total";
/// Upstream request latency metric name.
pub const METRIC_UPSTREAM_REQUEST_LATENCY: &str = "upstream_request_latency_ms";
/// Upstream failures counter metric name.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";

/// Install the global Prometheus recorder and return its render handle.
///
/// Call once at startup; installing twice is an error.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_REQUESTS_SERVED,
        "Total number of inbound requests served, by endpoint"
    );
    describe_histogram!(
        METRIC_UPSTREAM_REQUEST_LATENCY,
        "Upstream request latency in milliseconds, by upstream"
    );
    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Total number of failed upstream calls, by upstream"
    );

    debug!("Metrics initialized");
}

/// Increment the served-requests counter for an endpoint.
pub fn inc_requests_served(endpoint: &'static str) {
    counter!(METRIC_REQUESTS_SERVED, "endpoint" => endpoint).increment(1);
}

/// Record the latency of one upstream call.
pub fn record_upstream_latency(start: Instant, upstream: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_REQUEST_LATENCY, "upstream" => upstream).record(latency_ms);
}

/// Increment the failure counter for an upstream.
pub fn inc_upstream_failure(upstream: &'static str) {
    counter!(METRIC_UPSTREAM_FAILURES, "upstream" => upstream).increment(1);
}
