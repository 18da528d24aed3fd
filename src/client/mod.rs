//! Membership client
//!
//! This module handles:
//! * Connection URL parsing
//! * The membership data model (input, policy, outcome, result)
//! * The existence check and conditional mutation
//! * The caller-facing task that wraps them in a session

mod connection_string;
pub mod membership;
mod task;

pub use connection_string::ConnectionInfo;
pub use membership::{
    ConflictPolicy, MembershipCheck, MembershipInput, OperationResult, Outcome,
    ALREADY_MEMBER_MESSAGE,
};
pub use task::{add_user_to_groups, add_user_to_groups_with, execute};
