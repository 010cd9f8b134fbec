//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with SLO-aligned histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all photo studio metrics
pub const METRICS_PREFIX: &str = "photostudio";

/// SLO-aligned histogram buckets for request latency (in seconds)
/// Targets: P50 < 50ms, P99 < 150ms
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms - P50 target
    0.075,  // 75ms
    0.100,  // 100ms
    0.150,  // 150ms - P99 target
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
];

/// Full name of the request latency histogram
pub fn request_duration_metric() -> String {
    format!("{}_request_duration_seconds", METRICS_PREFIX)
}

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        request_duration_metric(),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Payment metrics
    describe_counter!(
        format!("{}_payment_updates_total", METRICS_PREFIX),
        Unit::Count,
        "Payment status updates by outcome"
    );

    describe_counter!(
        format!("{}_contracts_finished_total", METRICS_PREFIX),
        Unit::Count,
        "Session contracts closed after full payment"
    );

    // Session metrics
    describe_counter!(
        format!("{}_sessions_created_total", METRICS_PREFIX),
        Unit::Count,
        "Photo sessions scheduled"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            request_duration_metric(),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Count a payment status update by outcome
/// (updated, unchanged, invalid, not_found, conflict, error)
pub fn record_payment_update(outcome: &'static str) {
    counter!(
        format!("{}_payment_updates_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_contract_finished() {
    counter!(format!("{}_contracts_finished_total", METRICS_PREFIX)).increment(1);
}

pub fn record_session_created(session_type: &str) {
    counter!(
        format!("{}_sessions_created_total", METRICS_PREFIX),
        "session_type" => session_type.to_string()
    )
    .increment(1);
}
