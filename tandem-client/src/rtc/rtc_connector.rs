use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tandem_core::model::{IceServerConfig, ParticipantId};

use crate::connection::{PeerConnection, PeerConnector, PeerEventSender};
use crate::rtc::RtcConnection;

/// Builds webrtc-rs connections, one API instance per peer.
#[derive(Debug, Default, Clone)]
pub struct RtcConnector;

#[async_trait]
impl PeerConnector for RtcConnector {
    async fn connect(
        &self,
        remote_id: ParticipantId,
        ice_servers: &[IceServerConfig],
        events: PeerEventSender,
    ) -> Result<Arc<dyn PeerConnection>> {
        let connection = RtcConnection::new(remote_id, ice_servers, events).await?;
        Ok(Arc::new(connection) as Arc<dyn PeerConnection>)
    }
}
