//! Directory transport abstraction

use super::{Credentials, Endpoint, ProtocolVersion};
use crate::protocol::{Entry, ProtocolResult};
use async_trait::async_trait;

/// Directory protocol primitives a session is built from.
///
/// Implementations own exactly one connection. Every primitive reports
/// failures as a [`ProtocolError`](crate::protocol::ProtocolError) carrying the
/// result code; interpreting those codes is the caller's job.
#[async_trait]
pub trait Directory: Send {
    /// Open the transport connection
    async fn connect(&mut self, endpoint: &Endpoint) -> ProtocolResult<()>;

    /// Negotiate StartTLS on an open, unbound connection
    async fn start_tls(&mut self) -> ProtocolResult<()>;

    /// Reverse a previous StartTLS
    async fn stop_tls(&mut self) -> ProtocolResult<()>;

    /// Bind with the given credentials
    async fn bind(
        &mut self,
        credentials: &Credentials,
        version: ProtocolVersion,
    ) -> ProtocolResult<()>;

    /// Read a single entry by DN, returning only the requested attributes
    async fn read(&mut self, dn: &str, attributes: &[&str]) -> ProtocolResult<Entry>;

    /// Add one value to an attribute of an entry
    async fn modify_add(&mut self, dn: &str, attribute: &str, value: &str) -> ProtocolResult<()>;

    /// Unbind (if bound) and close the transport
    async fn disconnect(&mut self) -> ProtocolResult<()>;
}
