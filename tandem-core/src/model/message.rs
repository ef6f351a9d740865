use crate::model::participant::{Participant, ParticipantId};
use crate::model::signaling::{IceServerConfig, NegotiationPayload, SignalEnvelope};
use serde::{Deserialize, Serialize};

/// Frames a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: String,
        display_name: String,
    },
    Signal {
        to: ParticipantId,
        from: ParticipantId,
        signal: NegotiationPayload,
    },
}

impl ClientMessage {
    pub fn join(room_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        ClientMessage::JoinRoom {
            room_id: room_id.into(),
            display_name: display_name.into(),
        }
    }

    pub fn signal(envelope: SignalEnvelope) -> Self {
        ClientMessage::Signal {
            to: envelope.target_id,
            from: envelope.sender_id,
            signal: envelope.payload,
        }
    }
}

/// Frames the relay sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    Welcome {
        id: ParticipantId,
    },
    #[serde(rename_all = "camelCase")]
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    ExistingUsers {
        users: Vec<Participant>,
    },
    UserConnected(Participant),
    UserDisconnected(Participant),
    Signal {
        from: ParticipantId,
        signal: NegotiationPayload,
    },
    Error {
        message: String,
    },
}
