//! Directory session: connect, StartTLS, bind, guaranteed teardown

use super::state::SessionState;
use super::{ConnectionParameters, Directory, Endpoint};
use crate::protocol::{Entry, ProtocolResult};
use crate::{Error, Result};
use futures::future::BoxFuture;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Race a directory primitive against cancellation.
///
/// The outer `Result` reports cancellation, the inner one the primitive's own outcome.
async fn cancellable<T, F>(
    cancel: &CancellationToken,
    primitive: F,
) -> Result<ProtocolResult<T>>
where
    F: Future<Output = ProtocolResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = primitive => Ok(result),
    }
}

/// An open, bound directory session.
///
/// Owns its transport for the duration of one operation. Teardown (StopTLS if
/// StartTLS succeeded, then disconnect) runs exactly once: either through
/// [`Session::close`], which consumes the session, or internally when
/// [`Session::open`] fails part-way.
pub struct Session<D: Directory> {
    directory: D,
    state: SessionState,
    tls_active: bool,
}

impl<D: Directory> Session<D> {
    /// Open a session over `directory`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if required parameters are missing (nothing is contacted)
    /// - [`Error::Connection`] if the transport cannot be opened
    /// - [`Error::Tls`] if StartTLS fails
    /// - [`Error::Authentication`] if the bind fails
    /// - [`Error::Cancelled`] if `cancel` fires first
    ///
    /// On any failure after the connect attempt, the transport is torn down
    /// before the error is returned.
    pub async fn open(
        directory: D,
        params: &ConnectionParameters,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        params.validate()?;
        let endpoint = params.endpoint();

        let mut session = Self {
            directory,
            state: SessionState::Initial,
            tls_active: false,
        };

        let span = tracing::info_span!(
            "open_session",
            host = %endpoint.host,
            port = endpoint.port,
            secure = endpoint.secure,
            starttls = params.tls
        );

        async move {
            match session.establish(params, &endpoint, cancel).await {
                Ok(()) => {
                    crate::metrics::counters::session_opened();
                    tracing::info!("session established");
                    Ok(session)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "session establishment failed");
                    session.teardown().await;
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn establish(
        &mut self,
        params: &ConnectionParameters,
        endpoint: &Endpoint,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.state.transition(SessionState::Connecting)?;
        tracing::debug!(url = %endpoint, "connecting");
        cancellable(cancel, self.directory.connect(endpoint))
            .await?
            .map_err(|e| {
                crate::metrics::counters::session_failed(crate::metrics::labels::STAGE_CONNECT);
                Error::Connection(e)
            })?;
        self.state.transition(SessionState::Connected)?;

        if params.tls {
            tracing::debug!("negotiating StartTLS");
            cancellable(cancel, self.directory.start_tls())
                .await?
                .map_err(|e| {
                    crate::metrics::counters::session_failed(crate::metrics::labels::STAGE_TLS);
                    Error::Tls(e)
                })?;
            self.tls_active = true;
            self.state.transition(SessionState::TlsActive)?;
        }

        let credentials = params.credentials();
        tracing::debug!(anonymous = params.anonymous_bind, "binding");
        cancellable(
            cancel,
            self.directory.bind(&credentials, params.protocol_version),
        )
        .await?
        .map_err(|e| {
            crate::metrics::counters::session_failed(crate::metrics::labels::STAGE_BIND);
            Error::Authentication(e)
        })?;
        self.state.transition(SessionState::Bound)?;

        Ok(())
    }

    /// Get current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether StartTLS was negotiated on this session
    pub fn tls_active(&self) -> bool {
        self.tls_active
    }

    fn ensure_bound(&self) -> Result<()> {
        if self.state != SessionState::Bound {
            return Err(Error::InvalidState {
                expected: SessionState::Bound.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// Read an entry, returning only `attributes`.
    ///
    /// Protocol failures surface as [`Error::Directory`].
    pub async fn read(
        &mut self,
        dn: &str,
        attributes: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Entry> {
        self.ensure_bound()?;
        cancellable(cancel, self.directory.read(dn, attributes))
            .await?
            .map_err(Error::Directory)
    }

    /// Add one value to an attribute.
    ///
    /// Protocol failures (including conflicts) surface as [`Error::Directory`].
    pub async fn modify_add(
        &mut self,
        dn: &str,
        attribute: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.ensure_bound()?;
        cancellable(cancel, self.directory.modify_add(dn, attribute, value))
            .await?
            .map_err(Error::Directory)
    }

    /// Tear the session down.
    ///
    /// Best-effort: failures are logged and counted, never returned.
    pub async fn close(mut self) {
        self.teardown().await;
    }

    async fn teardown(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        let needs_disconnect = self.state.needs_disconnect();
        let _ = self.state.transition(SessionState::Closed);

        if self.tls_active {
            self.tls_active = false;
            if let Err(e) = self.directory.stop_tls().await {
                tracing::warn!(error = %e, "error stopping TLS during teardown");
                crate::metrics::counters::teardown_failed(crate::metrics::labels::STEP_STOP_TLS);
            }
        }

        if needs_disconnect {
            if let Err(e) = self.directory.disconnect().await {
                tracing::warn!(error = %e, "error disconnecting during teardown");
                crate::metrics::counters::teardown_failed(crate::metrics::labels::STEP_DISCONNECT);
            }
        }

        tracing::debug!("session closed");
    }
}

impl<D: Directory> Drop for Session<D> {
    fn drop(&mut self) {
        if self.state != SessionState::Closed {
            tracing::warn!(state = %self.state, "session dropped without teardown");
        }
    }
}

impl<D: Directory> std::fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("tls_active", &self.tls_active)
            .finish()
    }
}

/// Run `op` over a freshly opened session and always tear it down afterwards.
///
/// The result of `op` is returned unchanged; teardown failures never replace it.
/// The future returned by `op` may only borrow the session, so move owned
/// copies of anything else it needs into the closure.
///
/// # Examples
///
/// ```ignore
/// let op_cancel = cancel.clone();
/// let entry = with_session(directory, &params, &cancel, move |session| {
///     Box::pin(async move { session.read(&group_dn, &["member"], &op_cancel).await })
/// })
/// .await?;
/// ```
///
/// # Errors
///
/// Any error from [`Session::open`], or the error returned by `op`.
pub async fn with_session<D, T, F>(
    directory: D,
    params: &ConnectionParameters,
    cancel: &CancellationToken,
    op: F,
) -> Result<T>
where
    D: Directory + 'static,
    F: for<'s> FnOnce(&'s mut Session<D>) -> BoxFuture<'s, Result<T>>,
{
    let mut session = Session::open(directory, params, cancel).await?;
    let result = op(&mut session).await;
    session.close().await;
    result
}
