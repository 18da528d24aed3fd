//! LDAP result codes (RFC 4511 §4.1.9, plus client-side codes)

/// Result code attached to every directory response.
///
/// Only the codes the membership core interprets get their own variant;
/// anything else is carried verbatim in [`ResultCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// 0
    Success,
    /// 1
    OperationsError,
    /// 2
    ProtocolError,
    /// 3
    TimeLimitExceeded,
    /// 16
    NoSuchAttribute,
    /// 17
    UndefinedAttributeType,
    /// 19
    ConstraintViolation,
    /// 20
    AttributeOrValueExists,
    /// 21
    InvalidAttributeSyntax,
    /// 32
    NoSuchObject,
    /// 34
    InvalidDnSyntax,
    /// 48
    InappropriateAuthentication,
    /// 49
    InvalidCredentials,
    /// 50
    InsufficientAccessRights,
    /// 51
    Busy,
    /// 52
    Unavailable,
    /// 53
    UnwillingToPerform,
    /// 68
    EntryAlreadyExists,
    /// 81 (client side: connection lost)
    ServerDown,
    /// 85 (client side: operation timed out)
    Timeout,
    /// 91 (client side: could not connect)
    ConnectError,
    /// Any other code
    Other(u32),
}

impl ResultCode {
    /// Numeric wire value
    pub fn code(&self) -> u32 {
        match self {
            Self::Success => 0,
            Self::OperationsError => 1,
            Self::ProtocolError => 2,
            Self::TimeLimitExceeded => 3,
            Self::NoSuchAttribute => 16,
            Self::UndefinedAttributeType => 17,
            Self::ConstraintViolation => 19,
            Self::AttributeOrValueExists => 20,
            Self::InvalidAttributeSyntax => 21,
            Self::NoSuchObject => 32,
            Self::InvalidDnSyntax => 34,
            Self::InappropriateAuthentication => 48,
            Self::InvalidCredentials => 49,
            Self::InsufficientAccessRights => 50,
            Self::Busy => 51,
            Self::Unavailable => 52,
            Self::UnwillingToPerform => 53,
            Self::EntryAlreadyExists => 68,
            Self::ServerDown => 81,
            Self::Timeout => 85,
            Self::ConnectError => 91,
            Self::Other(code) => *code,
        }
    }

    /// Whether the directory reported that the value being added is already present.
    ///
    /// Servers disagree on which code they use for a duplicate `member` value,
    /// so both are treated as the same conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AttributeOrValueExists | Self::EntryAlreadyExists)
    }

    /// Whether this code signals success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<u32> for ResultCode {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::OperationsError,
            2 => Self::ProtocolError,
            3 => Self::TimeLimitExceeded,
            16 => Self::NoSuchAttribute,
            17 => Self::UndefinedAttributeType,
            19 => Self::ConstraintViolation,
            20 => Self::AttributeOrValueExists,
            21 => Self::InvalidAttributeSyntax,
            32 => Self::NoSuchObject,
            34 => Self::InvalidDnSyntax,
            48 => Self::InappropriateAuthentication,
            49 => Self::InvalidCredentials,
            50 => Self::InsufficientAccessRights,
            51 => Self::Busy,
            52 => Self::Unavailable,
            53 => Self::UnwillingToPerform,
            68 => Self::EntryAlreadyExists,
            81 => Self::ServerDown,
            85 => Self::Timeout,
            91 => Self::ConnectError,
            other => Self::Other(other),
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::OperationsError => write!(f, "Operations Error"),
            Self::ProtocolError => write!(f, "Protocol Error"),
            Self::TimeLimitExceeded => write!(f, "Time Limit Exceeded"),
            Self::NoSuchAttribute => write!(f, "No Such Attribute"),
            Self::UndefinedAttributeType => write!(f, "Undefined Attribute Type"),
            Self::ConstraintViolation => write!(f, "Constraint Violation"),
            Self::AttributeOrValueExists => write!(f, "Attribute Or Value Exists"),
            Self::InvalidAttributeSyntax => write!(f, "Invalid Attribute Syntax"),
            Self::NoSuchObject => write!(f, "No Such Object"),
            Self::InvalidDnSyntax => write!(f, "Invalid DN Syntax"),
            Self::InappropriateAuthentication => write!(f, "Inappropriate Authentication"),
            Self::InvalidCredentials => write!(f, "Invalid Credentials"),
            Self::InsufficientAccessRights => write!(f, "Insufficient Access Rights"),
            Self::Busy => write!(f, "Busy"),
            Self::Unavailable => write!(f, "Unavailable"),
            Self::UnwillingToPerform => write!(f, "Unwilling To Perform"),
            Self::EntryAlreadyExists => write!(f, "Entry Already Exists"),
            Self::ServerDown => write!(f, "Server Down"),
            Self::Timeout => write!(f, "LDAP Timeout"),
            Self::ConnectError => write!(f, "Connect Error"),
            Self::Other(code) => write!(f, "LDAP Result Code {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip() {
        for code in [0u32, 2, 16, 20, 32, 49, 68, 91] {
            assert_eq!(ResultCode::from(code).code(), code);
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let code = ResultCode::from(4096);
        assert_eq!(code, ResultCode::Other(4096));
        assert_eq!(code.to_string(), "LDAP Result Code 4096");
    }

    #[test]
    fn test_conflict_codes() {
        assert!(ResultCode::AttributeOrValueExists.is_conflict());
        assert!(ResultCode::EntryAlreadyExists.is_conflict());
        assert!(!ResultCode::NoSuchObject.is_conflict());
        assert!(!ResultCode::Success.is_conflict());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ResultCode::NoSuchObject.to_string(), "No Such Object");
        assert_eq!(
            ResultCode::AttributeOrValueExists.to_string(),
            "Attribute Or Value Exists"
        );
        assert_eq!(
            ResultCode::InvalidCredentials.to_string(),
            "Invalid Credentials"
        );
    }
}
