use serde_json::Value;
use tandem_core::model::ParticipantId;
use tokio::sync::mpsc;

use crate::media::RemoteTrack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    TransientlyDisconnected,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PeerEventKind {
    CandidateGenerated(Value),
    ConnectivityChanged(Connectivity),
    RemoteTrack(RemoteTrack),
}

/// Event raised by a connection. `epoch` identifies the session that owns
/// the connection, so events from a replaced session can be told apart.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerEvent {
    pub remote_id: ParticipantId,
    pub epoch: u64,
    pub kind: PeerEventKind,
}

#[derive(Debug, Clone)]
pub struct PeerEventSender {
    remote_id: ParticipantId,
    epoch: u64,
    tx: mpsc::UnboundedSender<PeerEvent>,
}

impl PeerEventSender {
    pub fn new(remote_id: ParticipantId, epoch: u64, tx: mpsc::UnboundedSender<PeerEvent>) -> Self {
        Self {
            remote_id,
            epoch,
            tx,
        }
    }

    pub fn remote_id(&self) -> ParticipantId {
        self.remote_id
    }

    /// Returns false once the receiving side is gone.
    pub fn send(&self, kind: PeerEventKind) -> bool {
        self.tx
            .send(PeerEvent {
                remote_id: self.remote_id,
                epoch: self.epoch,
                kind,
            })
            .is_ok()
    }
}
