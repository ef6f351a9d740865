use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tandem_core::model::{IceServerConfig, ParticipantId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::offer_answer_options::RTCOfferOptions;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

use crate::connection::{
    Connectivity, PeerConnection, PeerEventKind, PeerEventSender, SdpKind,
};
use crate::media::{LocalMedia, MediaKind, RemoteTrack};

struct PublishedTrack {
    kind: MediaKind,
    track: Arc<TrackLocalStaticSample>,
    sender: Arc<RTCRtpSender>,
}

pub struct RtcConnection {
    remote_id: ParticipantId,
    peer_connection: Arc<RTCPeerConnection>,
    published: Mutex<Vec<PublishedTrack>>,
}

impl RtcConnection {
    pub async fn new(
        remote_id: ParticipantId,
        ice_servers: &[IceServerConfig],
        events: PeerEventSender,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_events = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let events = state_events.clone();
                Box::pin(async move {
                    info!(
                        "Peer connection state changed for {}: {:?}",
                        events.remote_id(),
                        s
                    );
                    let connectivity = match s {
                        RTCPeerConnectionState::Connected => Connectivity::Connected,
                        RTCPeerConnectionState::Disconnected => {
                            Connectivity::TransientlyDisconnected
                        }
                        RTCPeerConnectionState::Failed => Connectivity::Failed,
                        _ => return,
                    };
                    events.send(PeerEventKind::ConnectivityChanged(connectivity));
                })
            },
        ));

        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let Ok(value) = serde_json::to_value(&init) else {
                    return;
                };
                events.send(PeerEventKind::CandidateGenerated(value));
            })
        }));

        let track_events = events;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let events = track_events.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => MediaKind::Audio,
                        RTPCodecType::Video => MediaKind::Video,
                        _ => return,
                    };
                    debug!("Remote {:?} track {} from {}", kind, track.id(), events.remote_id());
                    events.send(PeerEventKind::RemoteTrack(RemoteTrack {
                        id: track.id(),
                        kind,
                    }));
                })
            },
        ));

        Ok(Self {
            remote_id,
            peer_connection,
            published: Mutex::new(Vec::new()),
        })
    }

    fn codec_for(kind: MediaKind) -> RTCRtpCodecCapability {
        match kind {
            MediaKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            MediaKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl PeerConnection for RtcConnection {
    async fn create_offer(&self, ice_restart: bool) -> Result<String> {
        let options = ice_restart.then(|| RTCOfferOptions {
            ice_restart: true,
            ..Default::default()
        });
        let offer = self.peer_connection.create_offer(options).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<()> {
        let desc = match kind {
            SdpKind::Offer => RTCSessionDescription::offer(sdp)?,
            SdpKind::Answer => RTCSessionDescription::answer(sdp)?,
        };
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: Value) -> Result<()> {
        let candidate: RTCIceCandidateInit =
            serde_json::from_value(candidate).context("Failed to parse ICE candidate JSON")?;
        self.peer_connection.add_ice_candidate(candidate).await?;
        Ok(())
    }

    async fn set_local_media(&self, media: &LocalMedia) -> Result<()> {
        let mut published = self.published.lock().await;
        for old in published.drain(..) {
            if let Err(e) = self.peer_connection.remove_track(&old.sender).await {
                warn!("Failed to remove local track for {}: {}", self.remote_id, e);
            }
        }

        for track in &media.tracks {
            let local = Arc::new(TrackLocalStaticSample::new(
                Self::codec_for(track.kind()),
                track.id.clone(),
                media.stream_id.clone(),
            ));
            let sender = self
                .peer_connection
                .add_track(local.clone() as Arc<dyn TrackLocal + Send + Sync>)
                .await
                .with_context(|| format!("Failed to publish track {}", track.id))?;
            published.push(PublishedTrack {
                kind: track.kind(),
                track: local,
                sender,
            });
        }
        Ok(())
    }

    async fn set_track_enabled(&self, kind: MediaKind, enabled: bool) -> Result<()> {
        let published = self.published.lock().await;
        for entry in published.iter().filter(|entry| entry.kind == kind) {
            // A sender without a track keeps its transceiver and sends nothing.
            let track = enabled.then(|| entry.track.clone() as Arc<dyn TrackLocal + Send + Sync>);
            entry
                .sender
                .replace_track(track)
                .await
                .with_context(|| format!("Failed to toggle {:?} for {}", kind, self.remote_id))?;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
