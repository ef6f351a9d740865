use tandem_core::{Participant, ParticipantId, RelayError, RoomId};
use tokio::sync::oneshot;

/// Commands consumed by the [`crate::RoomManager`] actor, one at a time.
#[derive(Debug)]
pub enum RoomCommand {
    Join {
        room_id: RoomId,
        participant: Participant,
        reply: oneshot::Sender<Result<Vec<Participant>, RelayError>>,
    },

    Leave {
        room_id: RoomId,
        participant_id: ParticipantId,
        reply: oneshot::Sender<Option<Participant>>,
    },

    /// The participant's transport session ended.
    Disconnect { participant_id: ParticipantId },

    Participants {
        room_id: RoomId,
        reply: oneshot::Sender<Option<Vec<Participant>>>,
    },

    RoomCount { reply: oneshot::Sender<usize> },
}
