//! Counter helpers

use super::labels;

/// A session was opened and bound
pub fn session_opened() {
    metrics::counter!(labels::SESSIONS_OPENED).increment(1);
}

/// Session establishment failed at `stage`
pub fn session_failed(stage: &'static str) {
    metrics::counter!(labels::SESSION_FAILURES, "stage" => stage).increment(1);
}

/// A membership operation finished with `outcome`
pub fn operation_completed(outcome: &'static str) {
    metrics::counter!(labels::OPERATIONS, "outcome" => outcome).increment(1);
}

/// A teardown step failed and was swallowed
pub fn teardown_failed(step: &'static str) {
    metrics::counter!(labels::TEARDOWN_FAILURES, "step" => step).increment(1);
}
