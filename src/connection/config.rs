//! Connection parameters

use super::TlsConfig;
use crate::protocol::{DEFAULT_PORT, DEFAULT_SECURE_PORT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// LDAP protocol version used for the bind.
///
/// LDAPv2 is deprecated; use V3 unless a legacy server requires otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// LDAPv2
    V2,
    /// LDAPv3
    #[default]
    V3,
}

impl ProtocolVersion {
    /// Numeric version sent in the bind request
    pub fn number(&self) -> u8 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V2 => write!(f, "v2"),
            Self::V3 => write!(f, "v3"),
        }
    }
}

impl std::str::FromStr for ProtocolVersion {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "2" | "v2" => Ok(Self::V2),
            "3" | "v3" => Ok(Self::V3),
            _ => Err(Error::Config(format!(
                "invalid protocol version '{}': expected 2 or 3",
                s
            ))),
        }
    }
}

/// Bind credentials
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Simple bind with DN and password
    Simple {
        /// Bind DN
        user: String,
        /// Password
        password: String,
    },
    /// Anonymous bind
    Anonymous,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple { user, .. } => f
                .debug_struct("Simple")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Network endpoint of the directory server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or address
    pub host: String,
    /// Port (already resolved, never 0)
    pub port: u16,
    /// Connect with LDAP over TLS (`ldaps://`)
    pub secure: bool,
}

impl Endpoint {
    /// URL form understood by the directory client
    pub fn url(&self) -> String {
        let scheme = if self.secure { "ldaps" } else { "ldap" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url())
    }
}

/// Connection parameters
///
/// Shared by every directory task: where to connect, how to protect the
/// transport, and how to bind. Use `ConnectionParameters::builder()` for
/// timeouts and TLS settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParameters {
    /// Host
    pub host: String,
    /// Port. 0 means the protocol default (636 with `secure_socket_layer`, otherwise 389)
    #[serde(default)]
    pub port: u16,
    /// Connect over LDAPS
    #[serde(default)]
    pub secure_socket_layer: bool,
    /// Upgrade the connection with StartTLS before binding
    #[serde(default)]
    pub tls: bool,
    /// Protocol version
    #[serde(default)]
    pub protocol_version: ProtocolVersion,
    /// Bind anonymously instead of with `user`/`password`
    #[serde(default)]
    pub anonymous_bind: bool,
    /// Bind DN
    #[serde(default)]
    pub user: String,
    /// Password
    #[serde(default)]
    pub password: String,
    /// Kept for the shared parameter shape. Membership failures are always
    /// returned as errors whatever this is set to.
    #[serde(default)]
    pub throw_on_error: bool,
    /// Transport connect timeout
    #[serde(default, skip_serializing)]
    pub connect_timeout: Option<Duration>,
    /// Per-operation timeout
    #[serde(default, skip_serializing)]
    pub operation_timeout: Option<Duration>,
    /// TLS settings (None = system roots, full verification)
    #[serde(skip)]
    pub tls_config: Option<TlsConfig>,
}

impl ConnectionParameters {
    /// Create parameters for a credentialed bind
    ///
    /// # Defaults
    ///
    /// - `port`: 0 (protocol default)
    /// - `secure_socket_layer`: false
    /// - `tls`: false
    /// - `protocol_version`: V3
    /// - timeouts: None
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::builder(host).credentials(user, password).build()
    }

    /// Create parameters for an anonymous bind
    pub fn anonymous(host: impl Into<String>) -> Self {
        Self::builder(host).anonymous_bind(true).build()
    }

    /// Create a builder for advanced configuration
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let params = ConnectionParameters::builder("ldap.example.net")
    ///     .credentials("uid=admin,ou=system", "secret")
    ///     .tls(true)
    ///     .connect_timeout(Duration::from_secs(10))
    ///     .build();
    /// ```
    pub fn builder(host: impl Into<String>) -> ConnectionParametersBuilder {
        ConnectionParametersBuilder {
            host: host.into(),
            port: 0,
            secure_socket_layer: false,
            tls: false,
            protocol_version: ProtocolVersion::default(),
            anonymous_bind: false,
            user: String::new(),
            password: String::new(),
            throw_on_error: false,
            connect_timeout: None,
            operation_timeout: None,
            tls_config: None,
        }
    }

    /// Check required parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if host is blank, or if user or password is
    /// blank and anonymous bind was not requested.
    pub fn validate(&self) -> Result<()> {
        let missing_credentials =
            !self.anonymous_bind && (self.user.trim().is_empty() || self.password.trim().is_empty());
        if self.host.trim().is_empty() || missing_credentials {
            return Err(Error::Config("Connection parameters missing.".into()));
        }
        Ok(())
    }

    /// Port to connect to, resolving 0 to the protocol default
    pub fn effective_port(&self) -> u16 {
        match self.port {
            0 if self.secure_socket_layer => DEFAULT_SECURE_PORT,
            0 => DEFAULT_PORT,
            port => port,
        }
    }

    /// Endpoint to connect to
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.host.trim().to_string(),
            port: self.effective_port(),
            secure: self.secure_socket_layer,
        }
    }

    /// Credentials to bind with
    pub fn credentials(&self) -> Credentials {
        if self.anonymous_bind {
            Credentials::Anonymous
        } else {
            Credentials::Simple {
                user: self.user.clone(),
                password: self.password.clone(),
            }
        }
    }
}

impl std::fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure_socket_layer", &self.secure_socket_layer)
            .field("tls", &self.tls)
            .field("protocol_version", &self.protocol_version)
            .field("anonymous_bind", &self.anonymous_bind)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("throw_on_error", &self.throw_on_error)
            .field("connect_timeout", &self.connect_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .field("tls_config", &self.tls_config)
            .finish()
    }
}

/// Builder for creating `ConnectionParameters`
#[derive(Debug, Clone)]
pub struct ConnectionParametersBuilder {
    host: String,
    port: u16,
    secure_socket_layer: bool,
    tls: bool,
    protocol_version: ProtocolVersion,
    anonymous_bind: bool,
    user: String,
    password: String,
    throw_on_error: bool,
    connect_timeout: Option<Duration>,
    operation_timeout: Option<Duration>,
    tls_config: Option<TlsConfig>,
}

impl ConnectionParametersBuilder {
    /// Set bind DN and password
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Set the port (0 = protocol default)
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Connect over LDAPS
    pub fn secure_socket_layer(mut self, enabled: bool) -> Self {
        self.secure_socket_layer = enabled;
        self
    }

    /// Upgrade with StartTLS before binding
    pub fn tls(mut self, enabled: bool) -> Self {
        self.tls = enabled;
        self
    }

    /// Set protocol version
    pub fn protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = version;
        self
    }

    /// Bind anonymously
    pub fn anonymous_bind(mut self, enabled: bool) -> Self {
        self.anonymous_bind = enabled;
        self
    }

    /// Surface directory errors to the caller
    pub fn throw_on_error(mut self, enabled: bool) -> Self {
        self.throw_on_error = enabled;
        self
    }

    /// Set transport connect timeout
    ///
    /// Default: None (no timeout)
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set per-operation timeout
    ///
    /// Default: None (no timeout)
    pub fn operation_timeout(mut self, duration: Duration) -> Self {
        self.operation_timeout = Some(duration);
        self
    }

    /// Set TLS configuration used for LDAPS and StartTLS
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Build the parameters
    pub fn build(self) -> ConnectionParameters {
        ConnectionParameters {
            host: self.host,
            port: self.port,
            secure_socket_layer: self.secure_socket_layer,
            tls: self.tls,
            protocol_version: self.protocol_version,
            anonymous_bind: self.anonymous_bind,
            user: self.user,
            password: self.password,
            throw_on_error: self.throw_on_error,
            connect_timeout: self.connect_timeout,
            operation_timeout: self.operation_timeout,
            tls_config: self.tls_config,
        }
    }
}
