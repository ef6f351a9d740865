use async_trait::async_trait;
use tandem_core::{Participant, ParticipantId};

/// Room-level notifications the room manager pushes to clients.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Tell a fresh joiner who is already in the room.
    async fn send_existing_users(&self, to: ParticipantId, users: Vec<Participant>);

    async fn send_user_connected(&self, to: ParticipantId, participant: Participant);

    async fn send_user_disconnected(&self, to: ParticipantId, participant: Participant);
}
