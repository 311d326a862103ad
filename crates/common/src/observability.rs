use std::time::Duration;

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mailgate_requests_total",
        "Total email requests handled, by transport and operation",
        &["transport", "op"]
    )
    .expect("register requests_total")
});

pub static REQUEST_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mailgate_request_errors_total",
        "Total email requests that ended in an error reply",
        &["transport", "op"]
    )
    .expect("register request_errors_total")
});

pub static REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "mailgate_request_duration_seconds",
        "Request duration in seconds",
        &["transport"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register request_duration")
});

/// Record one finished request.
pub fn record_request(transport: &str, op: &str, ok: bool, elapsed: Duration) {
    REQUESTS_TOTAL.with_label_values(&[transport, op]).inc();
    if !ok {
        REQUEST_ERRORS_TOTAL.with_label_values(&[transport, op]).inc();
    }
    REQUEST_DURATION
        .with_label_values(&[transport])
        .observe(elapsed.as_secs_f64());
}

/// Render the default registry in the Prometheus text format.
/// Returns the HTTP status code as a plain `u16` so callers pick their own
/// HTTP types.
pub fn encode_metrics() -> (u16, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (500, format!("metrics encode error: {e}"));
    }
    (200, String::from_utf8(buffer).unwrap_or_default())
}
