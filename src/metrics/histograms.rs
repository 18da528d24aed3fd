//! Histogram helpers

use super::labels;

/// End-to-end duration of a membership operation
pub fn operation_duration(outcome: &'static str, duration_ms: u64) {
    metrics::histogram!(labels::OPERATION_DURATION_MS, "outcome" => outcome)
        .record(duration_ms as f64);
}
