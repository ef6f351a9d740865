use tandem_core::model::ParticipantId;
use tracing::{error, info, warn};

use crate::conference::{Conference, ConferenceEvent, ConferencePhase};
use crate::media::TrackSource;
use crate::monitor::MonitorAction;

impl Conference {
    pub(super) async fn apply_monitor_action(&mut self, remote_id: ParticipantId, action: MonitorAction) {
        match action {
            MonitorAction::None => {}
            MonitorAction::RestartIce => {
                let Some(peer) = self.peers.get_mut(&remote_id) else {
                    return;
                };
                match peer.session.restart_ice().await {
                    Ok(outcome) => info!("ICE restart with {}: {:?}", remote_id, outcome),
                    Err(e) => {
                        warn!("ICE restart with {} failed: {}", remote_id, e);
                        if peer.session.on_restart_failed() == MonitorAction::Reconnect {
                            self.reconnect().await;
                        }
                    }
                }
            }
            MonitorAction::Reconnect => self.reconnect().await,
        }
    }

    /// Tears down every session and re-issues `join-room` with the same
    /// identity. Gives up once the attempt budget is spent.
    pub(super) async fn reconnect(&mut self) {
        if self.phase == ConferencePhase::Closed {
            return;
        }
        if self.reconnect_attempts >= self.config.max_reconnect_attempts {
            error!(
                "Giving up on room {} after {} reconnect attempts",
                self.config.room_id, self.reconnect_attempts
            );
            self.emit(ConferenceEvent::GaveUp);
            self.shutdown().await;
            return;
        }

        self.reconnect_attempts += 1;
        let attempt = self.reconnect_attempts;
        info!("Reconnecting to room {} (attempt {})", self.config.room_id, attempt);
        self.phase = ConferencePhase::Reconnecting { attempt };
        self.emit(ConferenceEvent::Reconnecting { attempt });

        self.close_all_peers().await;
        if let Err(e) = self.send_join() {
            error!("Failed to re-join room {}: {}", self.config.room_id, e);
            self.shutdown().await;
        }
    }

    /// Swaps the published video and renegotiates with every peer.
    pub(super) async fn switch_source(&mut self, source: TrackSource) {
        let media = match self.media_source.acquire(source).await {
            Ok(media) => media,
            Err(e) => {
                warn!("Could not switch to {:?}: {}", source, e);
                self.emit(ConferenceEvent::Error(format!(
                    "Could not switch video source: {e}"
                )));
                return;
            }
        };

        for (id, peer) in self.peers.iter_mut() {
            if let Err(e) = peer.session.set_local_media(&media).await {
                warn!("Failed to attach new media for {}: {}", id, e);
                continue;
            }
            for kind in &self.muted {
                if let Err(e) = peer.session.set_track_enabled(*kind, false).await {
                    warn!("Failed to keep {:?} muted for {}: {}", kind, id, e);
                }
            }
            match peer.session.renegotiate().await {
                Ok(outcome) => info!("Renegotiation with {}: {:?}", id, outcome),
                Err(e) => warn!("Renegotiation with {} failed: {}", id, e),
            }
        }
        self.local_media = Some(media);
    }
}
