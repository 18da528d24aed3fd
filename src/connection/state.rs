//! Session state machine

use crate::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state (no connect attempted)
    Initial,

    /// Connect attempted but not completed
    Connecting,

    /// Transport connected, not yet bound
    Connected,

    /// StartTLS completed, not yet bound
    TlsActive,

    /// Bound (ready for operations)
    Bound,

    /// Torn down
    Closed,
}

impl SessionState {
    /// Check if transition is valid
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Initial, Connecting)
                | (Connecting, Connected)
                | (Connected, TlsActive)
                | (Connected, Bound)
                | (TlsActive, Bound)
                | (Initial, Closed)
                | (Connecting, Closed)
                | (Connected, Closed)
                | (TlsActive, Closed)
                | (Bound, Closed)
        )
    }

    /// Transition to new state
    pub fn transition(&mut self, next: SessionState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(Error::InvalidState {
                expected: format!("valid transition from {}", self),
                actual: format!("{}", next),
            });
        }
        *self = next;
        Ok(())
    }

    /// Whether a connect was attempted (the transport needs disconnecting)
    pub fn needs_disconnect(&self) -> bool {
        !matches!(self, Self::Initial | Self::Closed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::TlsActive => write!(f, "tls_active"),
            Self::Bound => write!(f, "bound"),
            Self::Closed => write!(f, "closed"),
        }
    }
}
