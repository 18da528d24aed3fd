//! Caller-facing membership task

use super::membership::{self, MembershipInput, OperationResult, Outcome};
use crate::connection::{with_session, ConnectionParameters, Directory, Ldap3Directory};
use crate::metrics::labels;
use crate::{Error, Result};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Add a user to a group over a new `ldap3` session.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> ldap_membership::Result<()> {
/// use ldap_membership::{add_user_to_groups, ConflictPolicy, ConnectionParameters, MembershipInput};
/// use tokio_util::sync::CancellationToken;
///
/// let params = ConnectionParameters::builder("127.0.0.1")
///     .port(10389)
///     .credentials("uid=admin,ou=system", "secret")
///     .build();
/// let input = MembershipInput::new(
///     "CN=Test User,ou=users,dc=wimpi,dc=net",
///     "cn=admin,ou=roles,dc=wimpi,dc=net",
///     ConflictPolicy::Skip,
/// );
///
/// let result = add_user_to_groups(&params, &input, &CancellationToken::new()).await?;
/// println!("success: {}", result.success);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// See [`execute`].
pub async fn add_user_to_groups(
    params: &ConnectionParameters,
    input: &MembershipInput,
    cancel: &CancellationToken,
) -> Result<OperationResult> {
    add_user_to_groups_with(Ldap3Directory::new(params), params, input, cancel).await
}

/// Add a user to a group over a new session on `directory`.
///
/// # Errors
///
/// See [`execute`].
pub async fn add_user_to_groups_with<D: Directory + 'static>(
    directory: D,
    params: &ConnectionParameters,
    input: &MembershipInput,
    cancel: &CancellationToken,
) -> Result<OperationResult> {
    let outcome = execute(directory, params, input, cancel).await?;
    Ok(OperationResult::from_outcome(&outcome, input))
}

/// Open a session, run the membership protocol, and tear the session down.
///
/// # Errors
///
/// - [`Error::Config`] for missing connection parameters or DNs
/// - [`Error::Connection`], [`Error::Tls`], [`Error::Authentication`] while opening the session
/// - [`Error::Directory`] if the group cannot be read or the add fails
/// - [`Error::Conflict`] if the user is already a member and the policy is `Throw`
/// - [`Error::Cancelled`] if `cancel` fires
pub async fn execute<D: Directory + 'static>(
    directory: D,
    params: &ConnectionParameters,
    input: &MembershipInput,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    params.validate()?;
    input.validate()?;

    let span = tracing::info_span!(
        "add_user_to_group",
        user_dn = %input.user_distinguished_name,
        group_dn = %input.group_distinguished_name,
        policy = %input.conflict_policy
    );

    let start = Instant::now();
    let op_input = input.clone();
    let op_cancel = cancel.clone();

    let result = with_session(directory, params, cancel, move |session| {
        Box::pin(async move { membership::add_user_to_group(session, &op_input, &op_cancel).await })
    })
    .instrument(span)
    .await;

    let outcome_label = match &result {
        Ok(outcome) => outcome.label(),
        Err(Error::Conflict(_)) => labels::OUTCOME_CONFLICT,
        Err(Error::Cancelled) => labels::OUTCOME_CANCELLED,
        Err(_) => labels::OUTCOME_ERROR,
    };
    crate::metrics::counters::operation_completed(outcome_label);
    crate::metrics::histograms::operation_duration(
        outcome_label,
        start.elapsed().as_millis() as u64,
    );

    result
}
