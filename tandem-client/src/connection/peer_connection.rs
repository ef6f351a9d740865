use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tandem_core::model::{IceServerConfig, ParticipantId};

use crate::connection::PeerEventSender;
use crate::media::{LocalMedia, MediaKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// One media connection to one remote participant.
///
/// Implementations report candidates, connectivity and remote tracks
/// through the [`PeerEventSender`] they were created with.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    /// Creates an offer and installs it as the local description.
    async fn create_offer(&self, ice_restart: bool) -> Result<String>;

    /// Creates an answer to the current remote offer and installs it locally.
    async fn create_answer(&self) -> Result<String>;

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: Value) -> Result<()>;

    /// Replaces whatever tracks were published before.
    async fn set_local_media(&self, media: &LocalMedia) -> Result<()>;

    /// Starts or stops sending the local tracks of `kind`. The tracks stay
    /// negotiated, so no new offer is needed.
    async fn set_track_enabled(&self, kind: MediaKind, enabled: bool) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(
        &self,
        remote_id: ParticipantId,
        ice_servers: &[IceServerConfig],
        events: PeerEventSender,
    ) -> Result<Arc<dyn PeerConnection>>;
}
