//! Connection management
//!
//! This module handles:
//! * Connection parameters and validation
//! * The directory transport abstraction and its `ldap3` backend
//! * Session lifecycle (connect, StartTLS, bind, teardown)
//! * State machine enforcement
//! * TLS configuration

mod config;
mod directory;
mod session;
mod state;
mod tls;
mod transport;

pub use config::{
    ConnectionParameters, ConnectionParametersBuilder, Credentials, Endpoint, ProtocolVersion,
};
pub use directory::Directory;
pub use session::{with_session, Session};
pub use state::SessionState;
pub use tls::{TlsConfig, TlsConfigBuilder};
pub use transport::Ldap3Directory;
