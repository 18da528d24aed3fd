//! Error types

use crate::protocol::{ProtocolError, ResultCode};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
///
/// Every variant that originates from the directory keeps the underlying
/// [`ProtocolError`] so callers can match on the result code instead of the message.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid connection parameters
    #[error("AddUserToGroups error: {0}")]
    Config(String),

    /// Transport connection failed
    #[error("AddUserToGroups LDAP connection error: {0}")]
    Connection(ProtocolError),

    /// StartTLS negotiation failed
    #[error("AddUserToGroups LDAP TLS error: {0}")]
    Tls(ProtocolError),

    /// Bind failed
    #[error("AddUserToGroups LDAP bind error: {0}")]
    Authentication(ProtocolError),

    /// Directory operation failed
    #[error("AddUserToGroups LDAP error: {0}")]
    Directory(ProtocolError),

    /// User is already a member of the group and the conflict policy is `Throw`
    #[error("AddUserToGroups LDAP error: User already exists in the group. {0}")]
    Conflict(ProtocolError),

    /// Operation was cancelled by the caller
    #[error("AddUserToGroups error: operation cancelled")]
    Cancelled,

    /// Invalid session state transition
    #[error("invalid session state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },
}

impl Error {
    /// Underlying protocol diagnostic, if this error came from the directory
    pub fn protocol(&self) -> Option<&ProtocolError> {
        match self {
            Error::Connection(e)
            | Error::Tls(e)
            | Error::Authentication(e)
            | Error::Directory(e)
            | Error::Conflict(e) => Some(e),
            _ => None,
        }
    }

    /// Result code of the underlying diagnostic
    pub fn result_code(&self) -> Option<ResultCode> {
        self.protocol().map(|e| e.code)
    }

    /// Whether the user is already a member (policy `Throw`)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Whether the operation was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Whether the failure happened while establishing the session
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Tls(_) | Error::Authentication(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_keeps_diagnostic() {
        let err = Error::Conflict(ProtocolError::new(ResultCode::AttributeOrValueExists, ""));
        assert_eq!(
            err.to_string(),
            "AddUserToGroups LDAP error: User already exists in the group. Attribute Or Value Exists"
        );
        assert!(err.is_conflict());
        assert_eq!(err.result_code(), Some(ResultCode::AttributeOrValueExists));
    }

    #[test]
    fn test_directory_message_prefix() {
        let err = Error::Directory(ProtocolError::new(ResultCode::NoSuchObject, ""));
        assert_eq!(err.to_string(), "AddUserToGroups LDAP error: No Such Object");
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_config_has_no_protocol() {
        let err = Error::Config("Connection parameters missing.".into());
        assert!(err.protocol().is_none());
        assert_eq!(
            err.to_string(),
            "AddUserToGroups error: Connection parameters missing."
        );
    }

    #[test]
    fn test_session_errors() {
        let diag = ProtocolError::new(ResultCode::InvalidCredentials, "");
        assert!(Error::Authentication(diag.clone()).is_session_error());
        assert!(Error::Tls(diag.clone()).is_session_error());
        assert!(!Error::Directory(diag).is_session_error());
        assert!(Error::Cancelled.is_cancelled());
    }
}
