use tracing::{debug, warn};

use crate::conference::{Conference, ConferenceEvent, ConferencePhase};
use crate::connection::{Connectivity, PeerEvent, PeerEventKind};
use crate::monitor::GraceExpired;

impl Conference {
    pub(super) async fn handle_peer_event(&mut self, event: PeerEvent) {
        let Some(peer) = self
            .peers
            .get_mut(&event.remote_id)
            .filter(|peer| peer.session.epoch() == event.epoch)
        else {
            debug!(
                "Ignoring event from replaced session with {} (epoch {})",
                event.remote_id, event.epoch
            );
            return;
        };

        match event.kind {
            PeerEventKind::CandidateGenerated(candidate) => {
                if let Err(e) = peer.session.send_local_candidate(candidate) {
                    warn!("Local candidate for {} not sent: {}", event.remote_id, e);
                }
            }
            PeerEventKind::RemoteTrack(track) => {
                peer.remote_tracks.push(track.clone());
                self.emit(ConferenceEvent::RemoteTrackAdded {
                    participant_id: event.remote_id,
                    track,
                });
            }
            PeerEventKind::ConnectivityChanged(connectivity) => {
                let action = peer.session.on_connectivity(connectivity);
                if connectivity == Connectivity::Connected {
                    self.reconnect_attempts = 0;
                    if matches!(self.phase, ConferencePhase::Reconnecting { .. }) {
                        self.phase = ConferencePhase::Joined;
                    }
                }
                self.emit(ConferenceEvent::ConnectivityChanged {
                    participant_id: event.remote_id,
                    connectivity,
                });
                self.apply_monitor_action(event.remote_id, action).await;
            }
        }
    }

    pub(super) async fn handle_grace_expired(&mut self, expired: GraceExpired) {
        let Some(peer) = self
            .peers
            .get_mut(&expired.remote_id)
            .filter(|peer| peer.session.epoch() == expired.epoch)
        else {
            return;
        };
        let action = peer.session.on_grace_expired(expired.generation);
        self.apply_monitor_action(expired.remote_id, action).await;
    }
}
