use std::time::Duration;

use tandem_core::model::ParticipantId;
use tandem_core::utils::DEFAULT_GRACE_PERIOD_MS;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::connection::Connectivity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub grace_period: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(DEFAULT_GRACE_PERIOD_MS),
        }
    }
}

/// What the owner of a monitor should do after feeding it an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorAction {
    None,
    RestartIce,
    Reconnect,
}

/// Sent by a grace timer that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceExpired {
    pub remote_id: ParticipantId,
    pub epoch: u64,
    pub generation: u64,
}

/// Watches the connectivity of one peer connection.
///
/// A failure gets one ICE restart; a second failure before the connection
/// recovers asks for a reconnect. A transient disconnect only escalates if it
/// outlives the grace period. Any transition cancels a running grace timer.
pub struct ConnectionMonitor {
    remote_id: ParticipantId,
    epoch: u64,
    config: MonitorConfig,
    condition: Option<Connectivity>,
    restart_attempted: bool,
    generation: u64,
    grace_timer: Option<JoinHandle<()>>,
    expiry_tx: mpsc::UnboundedSender<GraceExpired>,
}

impl ConnectionMonitor {
    pub fn new(
        remote_id: ParticipantId,
        epoch: u64,
        config: MonitorConfig,
        expiry_tx: mpsc::UnboundedSender<GraceExpired>,
    ) -> Self {
        Self {
            remote_id,
            epoch,
            config,
            condition: None,
            restart_attempted: false,
            generation: 0,
            grace_timer: None,
            expiry_tx,
        }
    }

    pub fn condition(&self) -> Option<Connectivity> {
        self.condition
    }

    pub fn has_pending_grace(&self) -> bool {
        self.grace_timer.is_some()
    }

    pub fn observe(&mut self, connectivity: Connectivity) -> MonitorAction {
        if self.condition == Some(connectivity) {
            return MonitorAction::None;
        }

        self.cancel();
        self.condition = Some(connectivity);

        match connectivity {
            Connectivity::Connected => {
                self.restart_attempted = false;
                MonitorAction::None
            }
            Connectivity::TransientlyDisconnected => {
                self.start_grace();
                MonitorAction::None
            }
            Connectivity::Failed if self.restart_attempted => {
                warn!(
                    "Connection to {} failed again after an ICE restart",
                    self.remote_id
                );
                MonitorAction::Reconnect
            }
            Connectivity::Failed => {
                info!("Connection to {} failed, restarting ICE", self.remote_id);
                self.restart_attempted = true;
                MonitorAction::RestartIce
            }
        }
    }

    pub fn on_grace_expired(&mut self, generation: u64) -> MonitorAction {
        if self.grace_timer.is_none() || generation != self.generation {
            debug!("Ignoring stale grace timer for {}", self.remote_id);
            return MonitorAction::None;
        }
        self.grace_timer = None;

        if self.condition == Some(Connectivity::TransientlyDisconnected) {
            warn!(
                "Connection to {} did not recover within {:?}",
                self.remote_id, self.config.grace_period
            );
            MonitorAction::Reconnect
        } else {
            MonitorAction::None
        }
    }

    /// The ICE restart could not even be started.
    pub fn restart_failed(&mut self) -> MonitorAction {
        self.cancel();
        MonitorAction::Reconnect
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.grace_timer.take() {
            timer.abort();
        }
    }

    fn start_grace(&mut self) {
        self.generation += 1;
        let expired = GraceExpired {
            remote_id: self.remote_id,
            epoch: self.epoch,
            generation: self.generation,
        };
        let period = self.config.grace_period;
        let tx = self.expiry_tx.clone();

        self.grace_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(period).await;
            let _ = tx.send(expired);
        }));
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.cancel();
    }
}
