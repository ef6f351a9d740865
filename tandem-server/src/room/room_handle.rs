use crate::room::RoomCommand;
use tandem_core::{Participant, ParticipantId, RelayError, RoomId};
use tokio::sync::{mpsc, oneshot};
use tracing::error;

/// Cloneable front door to the [`crate::RoomManager`] actor.
#[derive(Clone)]
pub struct RoomHandle {
    command_tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn new(command_tx: mpsc::Sender<RoomCommand>) -> Self {
        Self { command_tx }
    }

    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<RoomCommand>) {
        let (command_tx, command_rx) = mpsc::channel(buffer);
        (Self::new(command_tx), command_rx)
    }

    /// Joins the room and returns who was already there. The joiner also gets
    /// `existing-users` and the rest of the room gets `user-connected`.
    pub async fn join(
        &self,
        room_id: RoomId,
        participant: Participant,
    ) -> Result<Vec<Participant>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            room_id,
            participant,
            reply,
        })
        .await?;
        rx.await.map_err(|_| RelayError::RegistryUnavailable)?
    }

    pub async fn leave(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
    ) -> Option<Participant> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Leave {
            room_id,
            participant_id,
            reply,
        })
        .await
        .ok()?;
        rx.await.ok().flatten()
    }

    pub async fn disconnect(&self, participant_id: ParticipantId) {
        let _ = self
            .send(RoomCommand::Disconnect { participant_id })
            .await;
    }

    pub async fn participants(&self, room_id: RoomId) -> Option<Vec<Participant>> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Participants { room_id, reply })
            .await
            .ok()?;
        rx.await.ok().flatten()
    }

    pub async fn room_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        if self.send(RoomCommand::RoomCount { reply }).await.is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RelayError> {
        self.command_tx.send(cmd).await.map_err(|e| {
            error!("Room manager is gone: {}", e);
            RelayError::RegistryUnavailable
        })
    }
}
