use crate::session::NegotiationState;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("permission to capture media was denied")]
    PermissionDenied,

    #[error("media device unavailable: {0}")]
    DeviceUnavailable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Offer or answer arrived, or was requested, in the wrong state. Never fatal.
    #[error("cannot {action} while {state}")]
    NegotiationStateConflict {
        action: &'static str,
        state: NegotiationState,
    },

    /// A single candidate was rejected. The session carries on.
    #[error("candidate rejected: {0}")]
    CandidateApplication(String),

    #[error("media acquisition failed: {0}")]
    MediaAcquisition(#[from] MediaError),

    #[error("peer connection error: {0:#}")]
    Connection(#[from] anyhow::Error),

    #[error("signaling channel error: {0}")]
    Signaling(String),

    #[error("session is closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, ClientError>;
