// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    GEMINI_API_CALLS,
    GEMINI_API_DURATION,
    SUBMISSIONS_TOTAL,
    SUBMISSION_DURATION,
};

/// Helper to record one submission and how it ended
pub fn record_submission(endpoint: &str, outcome: &str, duration_secs: f64) {
    SUBMISSIONS_TOTAL
        .with_label_values(&[endpoint, outcome])
        .inc();

    SUBMISSION_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helper to record Gemini API call metrics
pub fn record_gemini_call(model: &str, status_code: u16, duration_secs: f64) {
    GEMINI_API_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}
