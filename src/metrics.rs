//! Metrics for served responses and request latency.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding process installs a recorder.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

use crate::template::TemplateSource;

// === Metric Name Constants ===

/// PADT responses served counter metric name.
pub const METRIC_PADT_RESPONSES: &str = "padt_responses_total";
/// Template fallbacks counter metric name.
pub const METRIC_TEMPLATE_FALLBACKS: &str = "template_fallbacks_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_PADT_RESPONSES,
        "Total number of PADT responses served, by template source"
    );
    describe_counter!(
        METRIC_TEMPLATE_FALLBACKS,
        "Total number of times the built-in template replaced an unreadable file"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment PADT responses counter.
pub fn inc_padt_responses(source: TemplateSource) {
    counter!(METRIC_PADT_RESPONSES, "source" => source.as_ref().to_string()).increment(1);
}

/// Increment template fallbacks counter.
pub fn inc_template_fallbacks() {
    counter!(METRIC_TEMPLATE_FALLBACKS).increment(1);
}
