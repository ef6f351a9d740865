use crate::model::message::ServerMessage;
use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Negotiation content carried between two participants.
///
/// The relay checks that a payload is one of these three shapes and nothing
/// more: SDP bodies and candidate objects pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NegotiationPayload {
    Offer { sdp: String },
    Answer { sdp: String },
    Candidate { candidate: serde_json::Value },
}

impl NegotiationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            NegotiationPayload::Offer { .. } => "offer",
            NegotiationPayload::Answer { .. } => "answer",
            NegotiationPayload::Candidate { .. } => "candidate",
        }
    }
}

/// A payload in flight from `sender_id` to `target_id`. Routed, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEnvelope {
    pub target_id: ParticipantId,
    pub sender_id: ParticipantId,
    pub payload: NegotiationPayload,
}

impl SignalEnvelope {
    pub fn new(
        sender_id: ParticipantId,
        target_id: ParticipantId,
        payload: NegotiationPayload,
    ) -> Self {
        Self {
            target_id,
            sender_id,
            payload,
        }
    }

    /// The frame the target receives: the target id is implied by the channel.
    pub fn into_delivery(self) -> ServerMessage {
        ServerMessage::Signal {
            from: self.sender_id,
            signal: self.payload,
        }
    }
}
