use crate::room::{Departure, RoomCommand, RoomRegistry};
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use tandem_core::{Participant, ParticipantId, RelayError, RoomId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Actor owning the [`RoomRegistry`].
///
/// Every command, including the broadcasts it causes, finishes before the
/// next one is taken off the queue, so no two events ever observe a room
/// mid-update. Broadcasts go through [`SignalingOutput`], whose sends never
/// wait on a client.
pub struct RoomManager {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(command_rx: mpsc::Receiver<RoomCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Room manager started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room manager finished.");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                room_id,
                participant,
                reply,
            } => {
                let result = self.join(room_id, participant).await;
                let _ = reply.send(result);
            }

            RoomCommand::Leave {
                room_id,
                participant_id,
                reply,
            } => {
                let departure = self.registry.leave(&room_id, &participant_id);
                let left = self.announce_departure(departure).await;
                let _ = reply.send(left);
            }

            RoomCommand::Disconnect { participant_id } => {
                let departure = self.registry.leave_any(&participant_id);
                if departure.is_none() {
                    debug!("Disconnected participant {} was in no room", participant_id);
                }
                self.announce_departure(departure).await;
            }

            RoomCommand::Participants { room_id, reply } => {
                let participants = self.registry.participants(&room_id).map(<[_]>::to_vec);
                let _ = reply.send(participants);
            }

            RoomCommand::RoomCount { reply } => {
                let _ = reply.send(self.registry.room_count());
            }
        }
    }

    async fn join(
        &mut self,
        room_id: RoomId,
        participant: Participant,
    ) -> Result<Vec<Participant>, RelayError> {
        let outcome = match self.registry.join(room_id.clone(), participant.clone()) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Rejected join from {}: {}", participant.id, e);
                return Err(e);
            }
        };

        self.announce_departure(outcome.previous).await;

        info!(
            room = %room_id,
            participant = %participant.id,
            name = %participant.display_name,
            existing = outcome.existing.len(),
            "Participant joined"
        );

        self.signaling
            .send_existing_users(participant.id, outcome.existing.clone())
            .await;
        for other in &outcome.existing {
            self.signaling
                .send_user_connected(other.id, participant.clone())
                .await;
        }

        Ok(outcome.existing)
    }

    async fn announce_departure(&self, departure: Option<Departure>) -> Option<Participant> {
        let departure = departure?;

        info!(
            room = %departure.room_id,
            participant = %departure.participant.id,
            remaining = departure.remaining.len(),
            "Participant left"
        );

        for other in departure.remaining {
            self.signaling
                .send_user_disconnected(other, departure.participant.clone())
                .await;
        }

        Some(departure.participant)
    }

    #[cfg(test)]
    fn registry(&self) -> &RoomRegistry {
        &self.registry
    }
}
