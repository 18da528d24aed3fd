//! `ldap3`-backed directory transport

use super::{ConnectionParameters, Credentials, Directory, Endpoint, ProtocolVersion, TlsConfig};
use crate::protocol::{Entry, ProtocolError, ProtocolResult, ResultCode, MATCH_ALL_FILTER};
use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, Scope, SearchEntry};
use std::collections::HashSet;
use std::time::Duration;

/// Directory transport over the `ldap3` client.
///
/// One instance drives one connection. `ldap3` negotiates StartTLS only while
/// a connection is being set up, so [`Directory::start_tls`] re-opens the
/// (still unbound) connection with StartTLS enabled.
pub struct Ldap3Directory {
    connect_timeout: Option<Duration>,
    operation_timeout: Option<Duration>,
    tls_config: Option<TlsConfig>,
    endpoint: Option<Endpoint>,
    ldap: Option<Ldap>,
    starttls: bool,
}

impl std::fmt::Debug for Ldap3Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ldap3Directory")
            .field("endpoint", &self.endpoint)
            .field("connected", &self.ldap.is_some())
            .field("starttls", &self.starttls)
            .finish()
    }
}

impl Ldap3Directory {
    /// Create an unconnected transport using the timeouts and TLS settings of `params`
    pub fn new(params: &ConnectionParameters) -> Self {
        Self {
            connect_timeout: params.connect_timeout,
            operation_timeout: params.operation_timeout,
            tls_config: params.tls_config.clone(),
            endpoint: None,
            ldap: None,
            starttls: false,
        }
    }

    fn settings(&self, starttls: bool) -> LdapConnSettings {
        let mut settings = LdapConnSettings::new().set_starttls(starttls);
        if let Some(timeout) = self.connect_timeout {
            settings = settings.set_conn_timeout(timeout);
        }
        if let Some(tls) = &self.tls_config {
            settings = settings
                .set_config(tls.client_config())
                .set_no_tls_verify(tls.danger_accept_invalid_certs());
        }
        settings
    }

    async fn open(&mut self, endpoint: &Endpoint, starttls: bool) -> ProtocolResult<()> {
        let url = endpoint.url();
        let (conn, ldap) = LdapConnAsync::with_settings(self.settings(starttls), &url)
            .await
            .map_err(|e| ProtocolError::new(ResultCode::ConnectError, e.to_string()))?;

        // Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "LDAP connection driver error");
            }
        });

        self.ldap = Some(ldap);
        self.starttls = starttls;
        Ok(())
    }

    fn handle(&mut self) -> ProtocolResult<&mut Ldap> {
        let timeout = self.operation_timeout;
        let ldap = self
            .ldap
            .as_mut()
            .ok_or_else(|| ProtocolError::new(ResultCode::ServerDown, "not connected"))?;
        if let Some(timeout) = timeout {
            ldap.with_timeout(timeout);
        }
        Ok(ldap)
    }
}

#[async_trait]
impl Directory for Ldap3Directory {
    async fn connect(&mut self, endpoint: &Endpoint) -> ProtocolResult<()> {
        self.endpoint = Some(endpoint.clone());
        self.open(endpoint, false).await
    }

    async fn start_tls(&mut self) -> ProtocolResult<()> {
        let endpoint = self
            .endpoint
            .clone()
            .ok_or_else(|| ProtocolError::new(ResultCode::ServerDown, "not connected"))?;
        if endpoint.secure {
            return Err(ProtocolError::new(
                ResultCode::OperationsError,
                "StartTLS requested on a connection that is already TLS-protected",
            ));
        }
        if self.starttls {
            return Err(ProtocolError::new(
                ResultCode::OperationsError,
                "StartTLS already negotiated",
            ));
        }

        // Nothing has been bound yet, so the plain connection can be replaced.
        if let Some(mut plain) = self.ldap.take() {
            if let Err(e) = plain.unbind().await {
                tracing::debug!(error = %e, "error closing plain connection before StartTLS");
            }
        }
        self.open(&endpoint, true).await
    }

    async fn stop_tls(&mut self) -> ProtocolResult<()> {
        // ldap3 closes the TLS layer together with the socket on unbind
        tracing::debug!("TLS layer will close with the connection");
        self.starttls = false;
        Ok(())
    }

    async fn bind(
        &mut self,
        credentials: &Credentials,
        version: ProtocolVersion,
    ) -> ProtocolResult<()> {
        if version != ProtocolVersion::V3 {
            return Err(ProtocolError::new(
                ResultCode::ProtocolError,
                format!("LDAP{} is not supported by this client", version),
            ));
        }

        let (user, password) = match credentials {
            Credentials::Simple { user, password } => (user.as_str(), password.as_str()),
            Credentials::Anonymous => ("", ""),
        };

        self.handle()?.simple_bind(user, password).await?.success()?;
        Ok(())
    }

    async fn read(&mut self, dn: &str, attributes: &[&str]) -> ProtocolResult<Entry> {
        let (entries, _res) = self
            .handle()?
            .search(dn, Scope::Base, MATCH_ALL_FILTER, attributes.to_vec())
            .await?
            .success()?;

        entries
            .into_iter()
            .next()
            .map(|entry| Entry::from(SearchEntry::construct(entry)))
            .ok_or_else(|| ProtocolError::new(ResultCode::NoSuchObject, ""))
    }

    async fn modify_add(&mut self, dn: &str, attribute: &str, value: &str) -> ProtocolResult<()> {
        let mods = vec![Mod::Add(
            attribute.to_string(),
            HashSet::from([value.to_string()]),
        )];
        self.handle()?.modify(dn, mods).await?.success()?;
        Ok(())
    }

    async fn disconnect(&mut self) -> ProtocolResult<()> {
        self.starttls = false;
        match self.ldap.take() {
            Some(mut ldap) => ldap.unbind().await.map_err(ProtocolError::from),
            None => Ok(()),
        }
    }
}
