//! Group membership: existence check and conditional mutation
//!
//! The check and the mutation are separate steps and are not atomic with
//! respect to the directory. The check only short-circuits the `Skip` policy;
//! whether the user was already a member is finally decided by the
//! directory's own response to the add.

use crate::connection::{Directory, Session};
use crate::protocol::{Entry, ProtocolError, ResultCode, MEMBER_ATTRIBUTE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Informational message for an already-satisfied membership request
pub const ALREADY_MEMBER_MESSAGE: &str =
    "AddUserToGroups LDAP error: User already exists in the group.";

/// What to do when the user is already a member of the group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictPolicy {
    /// Fail with [`Error::Conflict`]
    #[default]
    Throw,
    /// Report the existing membership without failing
    Skip,
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Throw => write!(f, "throw"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for ConflictPolicy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "throw" => Ok(Self::Throw),
            "skip" => Ok(Self::Skip),
            _ => Err(Error::Config(format!(
                "invalid conflict policy '{}': expected throw or skip",
                s
            ))),
        }
    }
}

/// Which user to add to which group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipInput {
    /// DN of the user entry
    pub user_distinguished_name: String,
    /// DN of the group entry
    pub group_distinguished_name: String,
    /// Behavior when the user is already a member
    #[serde(default, alias = "userExistsAction")]
    pub conflict_policy: ConflictPolicy,
}

impl MembershipInput {
    /// Create input
    pub fn new(
        user_distinguished_name: impl Into<String>,
        group_distinguished_name: impl Into<String>,
        conflict_policy: ConflictPolicy,
    ) -> Self {
        Self {
            user_distinguished_name: user_distinguished_name.into(),
            group_distinguished_name: group_distinguished_name.into(),
            conflict_policy,
        }
    }

    /// Check that both DNs are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either DN is blank.
    pub fn validate(&self) -> Result<()> {
        if self.user_distinguished_name.trim().is_empty()
            || self.group_distinguished_name.trim().is_empty()
        {
            return Err(Error::Config(
                "User or group distinguished name missing.".into(),
            ));
        }
        Ok(())
    }
}

/// Result of the existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipCheck {
    /// The user DN is listed in the group's `member` attribute
    Member,
    /// The user DN is not listed (or the group has no `member` attribute)
    NotMember,
}

/// Outcome of a membership request that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The member value was added
    Added,
    /// The existence check found the user and the policy is `Skip`; nothing was sent
    AlreadyMember,
    /// The directory rejected the add as a duplicate and the policy is `Skip`
    ConflictTolerated(ProtocolError),
}

impl Outcome {
    /// Whether the caller-facing result reports success.
    ///
    /// `AlreadyMember` is reported as not successful: nothing changed.
    pub fn success(&self) -> bool {
        !matches!(self, Self::AlreadyMember)
    }

    /// Informational message for the caller
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Added => None,
            Self::AlreadyMember | Self::ConflictTolerated(_) => Some(ALREADY_MEMBER_MESSAGE),
        }
    }

    /// Metric label for this outcome
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => crate::metrics::labels::OUTCOME_ADDED,
            Self::AlreadyMember => crate::metrics::labels::OUTCOME_SKIPPED,
            Self::ConflictTolerated(_) => crate::metrics::labels::OUTCOME_TOLERATED,
        }
    }
}

/// Caller-facing result of a membership request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// Whether the request succeeded
    pub success: bool,
    /// Informational or error message
    pub error_message: Option<String>,
    /// Echo of the input user DN
    pub user_distinguished_name: String,
    /// Echo of the input group DN
    pub group_distinguished_name: String,
}

impl OperationResult {
    /// Build the result for an outcome
    pub fn from_outcome(outcome: &Outcome, input: &MembershipInput) -> Self {
        Self {
            success: outcome.success(),
            error_message: outcome.message().map(str::to_string),
            user_distinguished_name: input.user_distinguished_name.clone(),
            group_distinguished_name: input.group_distinguished_name.clone(),
        }
    }
}

/// Whether `user_dn` appears verbatim among the entry's `member` values.
///
/// Exact, case-sensitive comparison: no DN normalization is applied.
pub fn is_listed(group: &Entry, user_dn: &str) -> bool {
    group
        .get(MEMBER_ATTRIBUTE)
        .map(|members| members.iter().any(|m| m == user_dn))
        .unwrap_or(false)
}

/// Read the group and report whether the user is listed as a member.
///
/// A group without a `member` attribute has no members. A group that cannot
/// be read is an error whatever the conflict policy.
///
/// # Errors
///
/// [`Error::Directory`] if the group cannot be read (e.g. "No Such Object"),
/// [`Error::Cancelled`] if `cancel` fires.
pub async fn check_membership<D: Directory>(
    session: &mut Session<D>,
    user_dn: &str,
    group_dn: &str,
    cancel: &CancellationToken,
) -> Result<MembershipCheck> {
    let group = match session.read(group_dn, &[MEMBER_ATTRIBUTE], cancel).await {
        Ok(group) => group,
        Err(Error::Directory(e)) if e.code == ResultCode::NoSuchAttribute => {
            tracing::debug!("group has no member attribute");
            return Ok(MembershipCheck::NotMember);
        }
        Err(e) => return Err(e),
    };

    let check = if is_listed(&group, user_dn) {
        MembershipCheck::Member
    } else {
        MembershipCheck::NotMember
    };
    tracing::debug!(?check, "membership checked");
    Ok(check)
}

/// Add the user DN to the group's `member` attribute.
///
/// A duplicate reported by the directory is resolved by the policy:
/// `Throw` fails with [`Error::Conflict`], `Skip` yields
/// [`Outcome::ConflictTolerated`].
///
/// # Errors
///
/// [`Error::Conflict`] as above, [`Error::Directory`] for any other
/// protocol failure, [`Error::Cancelled`] if `cancel` fires.
pub async fn add_member<D: Directory>(
    session: &mut Session<D>,
    input: &MembershipInput,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let added = session
        .modify_add(
            &input.group_distinguished_name,
            MEMBER_ATTRIBUTE,
            &input.user_distinguished_name,
            cancel,
        )
        .await;

    match added {
        Ok(()) => {
            tracing::info!("member added");
            Ok(Outcome::Added)
        }
        Err(Error::Directory(e)) if e.is_conflict() => match input.conflict_policy {
            ConflictPolicy::Throw => Err(Error::Conflict(e)),
            ConflictPolicy::Skip => {
                tracing::info!(diagnostic = %e, "directory reports existing member, skipping");
                Ok(Outcome::ConflictTolerated(e))
            }
        },
        Err(e) => Err(e),
    }
}

/// Ensure the user is a member of the group over an open session.
///
/// With `Skip`, an existing membership found by the check returns
/// [`Outcome::AlreadyMember`] without mutating. With `Throw`, the add is sent
/// regardless so the directory's own conflict response is what fails.
///
/// # Errors
///
/// See [`check_membership`] and [`add_member`].
pub async fn add_user_to_group<D: Directory>(
    session: &mut Session<D>,
    input: &MembershipInput,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let check = check_membership(
        session,
        &input.user_distinguished_name,
        &input.group_distinguished_name,
        cancel,
    )
    .await?;

    if check == MembershipCheck::Member && input.conflict_policy == ConflictPolicy::Skip {
        tracing::info!("user already in group, skipping");
        return Ok(Outcome::AlreadyMember);
    }

    add_member(session, input, cancel).await
}
