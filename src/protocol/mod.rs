//! Directory protocol vocabulary
//!
//! This module defines:
//! * LDAP result codes and their conventional names
//! * The diagnostic returned by directory primitives
//! * The entry shape returned by a read

mod entry;
mod error;
mod result_code;

pub use entry::Entry;
pub use error::ProtocolError;
pub use result_code::ResultCode;

/// Attribute holding a group's member DNs
pub const MEMBER_ATTRIBUTE: &str = "member";

/// Filter matching any entry, used for base-scope reads
pub const MATCH_ALL_FILTER: &str = "(objectClass=*)";

/// Default port for plain LDAP (and StartTLS)
pub const DEFAULT_PORT: u16 = 389;

/// Default port for LDAP over TLS
pub const DEFAULT_SECURE_PORT: u16 = 636;

/// Result of a directory primitive
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
