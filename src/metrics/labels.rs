//! Metric names and label values

/// Sessions that reached the bound state
pub const SESSIONS_OPENED: &str = "ldap_membership_sessions_opened_total";
/// Session establishment failures, by stage
pub const SESSION_FAILURES: &str = "ldap_membership_session_failures_total";
/// Membership operations, by outcome
pub const OPERATIONS: &str = "ldap_membership_operations_total";
/// Teardown steps that failed, by step
pub const TEARDOWN_FAILURES: &str = "ldap_membership_teardown_failures_total";
/// End-to-end operation duration
pub const OPERATION_DURATION_MS: &str = "ldap_membership_operation_duration_ms";

/// Session stage: transport connect
pub const STAGE_CONNECT: &str = "connect";
/// Session stage: StartTLS
pub const STAGE_TLS: &str = "tls";
/// Session stage: bind
pub const STAGE_BIND: &str = "bind";

/// Teardown step: stop TLS
pub const STEP_STOP_TLS: &str = "stop_tls";
/// Teardown step: disconnect
pub const STEP_DISCONNECT: &str = "disconnect";

/// Outcome: member added
pub const OUTCOME_ADDED: &str = "added";
/// Outcome: already a member, skipped
pub const OUTCOME_SKIPPED: &str = "skipped";
/// Outcome: server reported conflict, tolerated
pub const OUTCOME_TOLERATED: &str = "conflict_tolerated";
/// Outcome: conflict raised to caller
pub const OUTCOME_CONFLICT: &str = "conflict";
/// Outcome: cancelled
pub const OUTCOME_CANCELLED: &str = "cancelled";
/// Outcome: any other error
pub const OUTCOME_ERROR: &str = "error";
