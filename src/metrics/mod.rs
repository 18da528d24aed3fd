//! Metrics for session and membership operations
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host installs a recorder.

pub mod counters;
pub mod histograms;
pub mod labels;
