use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tandem_core::model::{ClientMessage, NegotiationPayload, ParticipantId, SignalEnvelope};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::connection::{Connectivity, PeerConnection, SdpKind};
use crate::error::{ClientError, Result};
use crate::media::{LocalMedia, MediaKind};
use crate::monitor::{ConnectionMonitor, MonitorAction};
use crate::session::NegotiationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredOffer {
    Renegotiate,
    IceRestart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenegotiationOutcome {
    Started,
    Deferred,
    AlreadyDeferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    Applied,
    Buffered,
}

/// Negotiation with one remote participant.
///
/// Every step takes `&mut self`, so two steps of the same session never
/// overlap. Signals go out through `outbound` addressed to `remote_id`.
pub struct PeerSession {
    local_id: ParticipantId,
    remote_id: ParticipantId,
    epoch: u64,
    connection: Arc<dyn PeerConnection>,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    state: NegotiationState,
    remote_description_set: bool,
    pending_candidates: Vec<Value>,
    seen_candidates: HashSet<String>,
    deferred: Option<DeferredOffer>,
    monitor: ConnectionMonitor,
}

impl PeerSession {
    pub fn new(
        local_id: ParticipantId,
        remote_id: ParticipantId,
        epoch: u64,
        connection: Arc<dyn PeerConnection>,
        outbound: mpsc::UnboundedSender<ClientMessage>,
        monitor: ConnectionMonitor,
    ) -> Self {
        Self {
            local_id,
            remote_id,
            epoch,
            connection,
            outbound,
            state: NegotiationState::Idle,
            remote_description_set: false,
            pending_candidates: Vec::new(),
            seen_candidates: HashSet::new(),
            deferred: None,
            monitor,
        }
    }

    pub fn remote_id(&self) -> ParticipantId {
        self.remote_id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn connectivity(&self) -> Option<Connectivity> {
        self.monitor.condition()
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    pub fn has_deferred_offer(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn has_pending_grace(&self) -> bool {
        self.monitor.has_pending_grace()
    }

    pub async fn create_offer(&mut self) -> Result<()> {
        self.offer(false).await
    }

    pub async fn handle_remote_offer(&mut self, sdp: String) -> Result<()> {
        let settled = self.state;
        if !settled.is_settled() {
            warn!(
                "Dropping offer from {}: negotiation already {}",
                self.remote_id, settled
            );
            return Err(ClientError::NegotiationStateConflict {
                action: "answer an offer",
                state: settled,
            });
        }

        self.state = NegotiationState::Negotiating;
        if let Err(e) = self.answer(sdp).await {
            self.state = settled;
            return Err(e);
        }

        self.state = NegotiationState::Stable;
        debug!("Answered offer from {}", self.remote_id);
        self.run_deferred().await;
        Ok(())
    }

    pub async fn handle_remote_answer(&mut self, sdp: String) -> Result<()> {
        if self.state != NegotiationState::AwaitingAnswer {
            warn!(
                "Dropping stale answer from {}: negotiation {}",
                self.remote_id, self.state
            );
            return Err(ClientError::NegotiationStateConflict {
                action: "apply an answer",
                state: self.state,
            });
        }

        self.connection
            .set_remote_description(SdpKind::Answer, sdp)
            .await?;
        self.remote_description_set = true;
        self.flush_candidates().await;

        self.state = NegotiationState::Stable;
        debug!("Negotiation with {} is stable", self.remote_id);
        self.run_deferred().await;
        Ok(())
    }

    pub async fn handle_remote_candidate(&mut self, candidate: Value) -> Result<CandidateOutcome> {
        if self.state == NegotiationState::Closed {
            return Err(ClientError::SessionClosed);
        }
        if candidate.get("candidate").and_then(Value::as_str).is_none() {
            warn!("Rejecting malformed candidate from {}", self.remote_id);
            return Err(ClientError::CandidateApplication(
                "missing candidate field".to_owned(),
            ));
        }
        if !self.seen_candidates.insert(candidate.to_string()) {
            warn!("Rejecting duplicate candidate from {}", self.remote_id);
            return Err(ClientError::CandidateApplication(
                "duplicate candidate".to_owned(),
            ));
        }

        if !self.remote_description_set {
            self.pending_candidates.push(candidate);
            return Ok(CandidateOutcome::Buffered);
        }

        self.connection
            .add_ice_candidate(candidate)
            .await
            .map_err(|e| ClientError::CandidateApplication(format!("{e:#}")))?;
        Ok(CandidateOutcome::Applied)
    }

    /// Sends a candidate gathered by the local connection.
    pub fn send_local_candidate(&self, candidate: Value) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(ClientError::SessionClosed);
        }
        self.send(NegotiationPayload::Candidate { candidate })
    }

    pub async fn renegotiate(&mut self) -> Result<RenegotiationOutcome> {
        self.request_offer(DeferredOffer::Renegotiate).await
    }

    /// In-place connectivity restart: an offer with fresh ICE credentials.
    pub async fn restart_ice(&mut self) -> Result<RenegotiationOutcome> {
        self.request_offer(DeferredOffer::IceRestart).await
    }

    pub async fn set_local_media(&mut self, media: &LocalMedia) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(ClientError::SessionClosed);
        }
        self.connection.set_local_media(media).await?;
        Ok(())
    }

    /// Mutes or unmutes without touching the negotiation.
    pub async fn set_track_enabled(&self, kind: MediaKind, enabled: bool) -> Result<()> {
        if self.state == NegotiationState::Closed {
            return Err(ClientError::SessionClosed);
        }
        self.connection.set_track_enabled(kind, enabled).await?;
        Ok(())
    }

    pub fn on_connectivity(&mut self, connectivity: Connectivity) -> MonitorAction {
        if self.state == NegotiationState::Closed {
            return MonitorAction::None;
        }
        self.monitor.observe(connectivity)
    }

    pub fn on_grace_expired(&mut self, generation: u64) -> MonitorAction {
        if self.state == NegotiationState::Closed {
            return MonitorAction::None;
        }
        self.monitor.on_grace_expired(generation)
    }

    pub fn on_restart_failed(&mut self) -> MonitorAction {
        self.monitor.restart_failed()
    }

    /// Idempotent. Drops buffered candidates and any deferred offer, and
    /// cancels the grace timer.
    pub async fn close(&mut self) {
        if self.state == NegotiationState::Closed {
            return;
        }
        self.state = NegotiationState::Closed;
        self.pending_candidates.clear();
        self.deferred = None;
        self.monitor.cancel();

        if let Err(e) = self.connection.close().await {
            error!("Failed to close connection to {}: {:#}", self.remote_id, e);
        }
        info!("Session with {} closed", self.remote_id);
    }

    async fn request_offer(&mut self, kind: DeferredOffer) -> Result<RenegotiationOutcome> {
        if self.state == NegotiationState::Closed {
            return Err(ClientError::SessionClosed);
        }

        // Only a completed first cycle may be renegotiated. From `Idle` the
        // request waits for the first offer/answer exchange, whichever side
        // starts it.
        if self.state == NegotiationState::Stable {
            self.offer(kind == DeferredOffer::IceRestart).await?;
            return Ok(RenegotiationOutcome::Started);
        }

        match self.deferred {
            None => {
                debug!("Deferring {:?} with {} until stable", kind, self.remote_id);
                self.deferred = Some(kind);
                Ok(RenegotiationOutcome::Deferred)
            }
            Some(DeferredOffer::Renegotiate) if kind == DeferredOffer::IceRestart => {
                self.deferred = Some(kind);
                Ok(RenegotiationOutcome::AlreadyDeferred)
            }
            Some(_) => Ok(RenegotiationOutcome::AlreadyDeferred),
        }
    }

    async fn offer(&mut self, ice_restart: bool) -> Result<()> {
        let settled = self.state;
        if !settled.is_settled() {
            return Err(ClientError::NegotiationStateConflict {
                action: "create an offer",
                state: settled,
            });
        }

        self.state = NegotiationState::Offering;
        let sdp = match self.connection.create_offer(ice_restart).await {
            Ok(sdp) => sdp,
            Err(e) => {
                self.state = settled;
                return Err(ClientError::Connection(e));
            }
        };

        if let Err(e) = self.send(NegotiationPayload::Offer { sdp }) {
            self.state = settled;
            return Err(e);
        }
        self.state = NegotiationState::AwaitingAnswer;
        debug!("Offer sent to {} (ice restart: {})", self.remote_id, ice_restart);
        Ok(())
    }

    async fn answer(&mut self, sdp: String) -> Result<()> {
        self.connection
            .set_remote_description(SdpKind::Offer, sdp)
            .await?;
        self.remote_description_set = true;
        self.flush_candidates().await;

        let sdp = self.connection.create_answer().await?;
        self.send(NegotiationPayload::Answer { sdp })
    }

    async fn flush_candidates(&mut self) {
        for candidate in std::mem::take(&mut self.pending_candidates) {
            if let Err(e) = self.connection.add_ice_candidate(candidate).await {
                warn!(
                    "Buffered candidate from {} rejected: {:#}",
                    self.remote_id, e
                );
            }
        }
    }

    async fn run_deferred(&mut self) {
        let Some(kind) = self.deferred.take() else {
            return;
        };
        if let Err(e) = self.offer(kind == DeferredOffer::IceRestart).await {
            error!(
                "Deferred {:?} with {} failed: {}",
                kind, self.remote_id, e
            );
        }
    }

    fn send(&self, payload: NegotiationPayload) -> Result<()> {
        let envelope = SignalEnvelope::new(self.local_id, self.remote_id, payload);
        self.outbound
            .send(ClientMessage::signal(envelope))
            .map_err(|_| ClientError::Signaling("outbound channel closed".to_owned()))
    }
}
