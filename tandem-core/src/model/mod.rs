mod message;
mod participant;
mod room;
mod signaling;

pub use message::{ClientMessage, ServerMessage};
pub use participant::{Participant, ParticipantId};
pub use room::RoomId;
pub use signaling::{IceServerConfig, NegotiationPayload, SignalEnvelope};
