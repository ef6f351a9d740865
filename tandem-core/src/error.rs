use crate::model::ParticipantId;
use thiserror::Error;

/// Relay-side failures. None of them is fatal to the relay process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// `join-room` without a room id or display name. Reported to the sender only.
    #[error("invalid join request: {0}")]
    InvalidJoinRequest(String),

    /// Target of a `signal` is not connected. Never reported to the sender.
    #[error("participant {0} is not connected")]
    UnroutableSignal(ParticipantId),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("room registry is unavailable")]
    RegistryUnavailable,
}
