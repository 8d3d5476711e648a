// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{gather_metrics, API_DURATION, TOKENS_TOTAL, VISION_QUERIES};

/// Helper to record the outcome of one vision query
pub fn record_query(model: &str, media_type: Option<&str>, status: &str) {
    VISION_QUERIES
        .with_label_values(&[model, media_type.unwrap_or("none"), status])
        .inc();
}

/// Helper to record Messages API call latency
pub fn record_api_call(model: &str, duration_secs: f64) {
    API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record token usage
pub fn record_tokens(model: &str, input: u64, output: u64) {
    if input > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "input"])
            .inc_by(input as f64);
    }
    if output > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "output"])
            .inc_by(output as f64);
    }
}
