use tandem_core::model::{NegotiationPayload, Participant, ParticipantId, ServerMessage};
use tracing::{debug, info, warn};

use crate::conference::{Conference, ConferenceEvent, ConferencePhase};
use crate::error::{ClientError, Result};

impl Conference {
    /// Only a failed media acquisition is returned as an error; everything
    /// else is logged and the loop carries on.
    pub(super) async fn handle_server_message(&mut self, msg: ServerMessage) -> Result<()> {
        match msg {
            ServerMessage::Welcome { id } => self.on_welcome(id).await?,
            ServerMessage::IceConfig { ice_servers } => {
                if self.config.ice_servers.is_none() {
                    debug!("Using {} ICE servers from the relay", ice_servers.len());
                    self.ice_servers = ice_servers;
                }
            }
            ServerMessage::ExistingUsers { users } => self.on_existing_users(users).await,
            ServerMessage::UserConnected(participant) => {
                info!("{} joined the room", participant.display_name);
                self.on_user_connected(participant.clone()).await;
                self.emit(ConferenceEvent::ParticipantJoined(participant));
            }
            ServerMessage::UserDisconnected(participant) => {
                info!("{} left the room", participant.display_name);
                self.remove_peer(&participant.id).await;
                self.emit(ConferenceEvent::ParticipantLeft(participant));
            }
            ServerMessage::Signal { from, signal } => self.on_signal(from, signal).await,
            ServerMessage::Error { message } => {
                warn!("Relay reported an error: {}", message);
                self.emit(ConferenceEvent::Error(message));
            }
        }
        Ok(())
    }

    async fn on_welcome(&mut self, id: ParticipantId) -> Result<()> {
        info!("Relay assigned id {}", id);
        self.local_id = Some(id);
        self.phase = ConferencePhase::Joining;

        match self.media_source.acquire(self.config.initial_source).await {
            Ok(media) => self.local_media = Some(media),
            Err(e) => {
                warn!("Could not acquire local media: {}", e);
                self.emit(ConferenceEvent::Error(format!(
                    "Could not access camera or microphone: {e}"
                )));
                return Err(ClientError::MediaAcquisition(e));
            }
        }

        self.send_join()
    }

    async fn on_user_connected(&mut self, participant: Participant) {
        // A session opened from the newcomer's own offer is kept and named.
        if let Some(peer) = self.peers.get_mut(&participant.id) {
            if peer.participant.is_none() {
                debug!("Naming session with {} after its offer", participant.id);
                peer.participant = Some(participant);
                return;
            }
        }

        let id = participant.id;
        if let Err(e) = self.open_session(id, Some(participant)).await {
            warn!("Failed to open session with {}: {}", id, e);
        }
    }

    async fn on_existing_users(&mut self, users: Vec<Participant>) {
        let Some(local_id) = self.local_id else {
            warn!("Ignoring existing-users before welcome");
            return;
        };
        self.phase = ConferencePhase::Joined;
        self.emit(ConferenceEvent::Joined {
            local_id,
            existing: users.clone(),
        });

        for participant in users {
            let id = participant.id;
            if let Err(e) = self.open_session(id, Some(participant)).await {
                warn!("Failed to open session with {}: {}", id, e);
                continue;
            }
            let Some(peer) = self.peers.get_mut(&id) else {
                continue;
            };
            if let Err(e) = peer.session.create_offer().await {
                warn!("Failed to offer to {}: {}", id, e);
            }
        }
    }

    async fn on_signal(&mut self, from: ParticipantId, signal: NegotiationPayload) {
        if !self.peers.contains_key(&from) {
            if !matches!(signal, NegotiationPayload::Offer { .. }) {
                debug!("Dropping {} from unknown peer {}", signal.kind(), from);
                return;
            }
            debug!("Offer from {} before it was announced", from);
            if let Err(e) = self.open_session(from, None).await {
                warn!("Failed to open session for offer from {}: {}", from, e);
                return;
            }
        }

        let Some(peer) = self.peers.get_mut(&from) else {
            return;
        };
        let result = match signal {
            NegotiationPayload::Offer { sdp } => peer.session.handle_remote_offer(sdp).await,
            NegotiationPayload::Answer { sdp } => peer.session.handle_remote_answer(sdp).await,
            NegotiationPayload::Candidate { candidate } => peer
                .session
                .handle_remote_candidate(candidate)
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => {}
            Err(ClientError::NegotiationStateConflict { .. }) => {}
            Err(e) => warn!("Signal from {} not applied: {}", from, e),
        }
    }
}
