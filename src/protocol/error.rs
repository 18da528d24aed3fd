//! Protocol-level diagnostic returned by directory primitives

use super::ResultCode;

/// Failure reported by the directory (or by the client library on its behalf).
///
/// Carries the result code and the server's human-readable text verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    /// Result code
    pub code: ResultCode,
    /// Diagnostic text (may be empty)
    pub message: String,
    /// Matched DN reported by the server, if any
    pub matched_dn: Option<String>,
}

impl ProtocolError {
    /// Create a diagnostic from a code and message
    pub fn new(code: impl Into<ResultCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            matched_dn: None,
        }
    }

    /// Attach the matched DN reported by the server
    pub fn with_matched_dn(mut self, matched_dn: impl Into<String>) -> Self {
        let matched_dn = matched_dn.into();
        if !matched_dn.is_empty() {
            self.matched_dn = Some(matched_dn);
        }
        self
    }

    /// Whether the directory reported a duplicate value/entry
    pub fn is_conflict(&self) -> bool {
        self.code.is_conflict()
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<ldap3::LdapResult> for ProtocolError {
    fn from(result: ldap3::LdapResult) -> Self {
        ProtocolError::new(result.rc, result.text).with_matched_dn(result.matched)
    }
}

impl From<ldap3::LdapError> for ProtocolError {
    fn from(err: ldap3::LdapError) -> Self {
        match err {
            ldap3::LdapError::LdapResult { result } => result.into(),
            ldap3::LdapError::Timeout { .. } => {
                ProtocolError::new(ResultCode::Timeout, err.to_string())
            }
            ldap3::LdapError::Io { .. } => {
                ProtocolError::new(ResultCode::ConnectError, err.to_string())
            }
            other => ProtocolError::new(ResultCode::Other(u32::MAX), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_message() {
        let err = ProtocolError::new(ResultCode::NoSuchObject, "");
        assert_eq!(err.to_string(), "No Such Object");
    }

    #[test]
    fn test_display_with_message() {
        let err = ProtocolError::new(20u32, "member: value #0 already exists");
        assert_eq!(
            err.to_string(),
            "Attribute Or Value Exists: member: value #0 already exists"
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn test_empty_matched_dn_is_dropped() {
        let err = ProtocolError::new(ResultCode::NoSuchObject, "").with_matched_dn("");
        assert!(err.matched_dn.is_none());

        let err = ProtocolError::new(ResultCode::NoSuchObject, "").with_matched_dn("dc=example,dc=net");
        assert_eq!(err.matched_dn.as_deref(), Some("dc=example,dc=net"));
    }

    #[test]
    fn test_from_ldap_result() {
        let result = ldap3::LdapResult {
            rc: 32,
            matched: "dc=example,dc=net".to_string(),
            text: "no such entry".to_string(),
            refs: vec![],
            ctrls: vec![],
        };
        let err = ProtocolError::from(result);
        assert_eq!(err.code, ResultCode::NoSuchObject);
        assert_eq!(err.message, "no such entry");
        assert_eq!(err.matched_dn.as_deref(), Some("dc=example,dc=net"));
    }
}
