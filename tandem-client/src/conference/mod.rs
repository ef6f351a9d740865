mod conference_config;
mod conference_event;
mod local_media_impl;
mod peer_event_impl;
mod recovery_impl;
mod server_message_impl;

pub use conference_config::*;
pub use conference_event::*;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tandem_core::model::{ClientMessage, IceServerConfig, Participant, ParticipantId, ServerMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::connection::{PeerConnector, PeerEvent, PeerEventSender};
use crate::error::{ClientError, Result};
use crate::media::{LocalMedia, MediaKind, MediaSource, RemoteTrack};
use crate::monitor::{ConnectionMonitor, GraceExpired};
use crate::session::PeerSession;
use crate::signaling_client::SignalingClient;

struct RemotePeer {
    /// `None` while the peer is known only from an offer it sent.
    participant: Option<Participant>,
    session: PeerSession,
    remote_tracks: Vec<RemoteTrack>,
}

/// Client side of one room: owns every [`PeerSession`] of the local
/// participant and drives them from relay messages, connection events and
/// local commands. Everything runs on one task.
pub struct Conference {
    config: ConferenceConfig,
    connector: Arc<dyn PeerConnector>,
    media_source: Arc<dyn MediaSource>,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    events: mpsc::UnboundedSender<ConferenceEvent>,

    local_id: Option<ParticipantId>,
    ice_servers: Vec<IceServerConfig>,
    local_media: Option<LocalMedia>,
    muted: HashSet<MediaKind>,
    peers: HashMap<ParticipantId, RemotePeer>,
    next_epoch: u64,
    phase: ConferencePhase,
    reconnect_attempts: u32,

    peer_tx: mpsc::UnboundedSender<PeerEvent>,
    peer_rx: mpsc::UnboundedReceiver<PeerEvent>,
    grace_tx: mpsc::UnboundedSender<GraceExpired>,
    grace_rx: mpsc::UnboundedReceiver<GraceExpired>,
}

impl Conference {
    pub fn new(
        config: ConferenceConfig,
        connector: Arc<dyn PeerConnector>,
        media_source: Arc<dyn MediaSource>,
        outbound: mpsc::UnboundedSender<ClientMessage>,
    ) -> (Self, mpsc::UnboundedReceiver<ConferenceEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        let (grace_tx, grace_rx) = mpsc::unbounded_channel();
        let ice_servers = config.ice_servers.clone().unwrap_or_default();

        let conference = Self {
            config,
            connector,
            media_source,
            outbound,
            events,
            local_id: None,
            ice_servers,
            local_media: None,
            muted: HashSet::new(),
            peers: HashMap::new(),
            next_epoch: 0,
            phase: ConferencePhase::AwaitingWelcome,
            reconnect_attempts: 0,
            peer_tx,
            peer_rx,
            grace_tx,
            grace_rx,
        };
        (conference, events_rx)
    }

    pub fn phase(&self) -> ConferencePhase {
        self.phase
    }

    pub fn local_id(&self) -> Option<ParticipantId> {
        self.local_id
    }

    /// Runs until `Leave`, until the command channel closes, until the
    /// reconnect budget is spent, or until the relay goes away.
    pub async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<ServerMessage>,
        mut commands: mpsc::Receiver<ConferenceCommand>,
    ) -> Result<()> {
        info!(
            "Conference for {} in room {} started",
            self.config.display_name, self.config.room_id
        );

        loop {
            tokio::select! {
                msg = inbound.recv() => match msg {
                    Some(msg) => {
                        if let Err(e) = self.handle_server_message(msg).await {
                            self.shutdown().await;
                            return Err(e);
                        }
                    }
                    None => {
                        warn!("Relay connection closed");
                        self.shutdown().await;
                        return Err(ClientError::Signaling("relay connection closed".to_owned()));
                    }
                },
                Some(event) = self.peer_rx.recv() => {
                    self.handle_peer_event(event).await;
                }
                Some(expired) = self.grace_rx.recv() => {
                    self.handle_grace_expired(expired).await;
                }
                cmd = commands.recv() => match cmd {
                    Some(ConferenceCommand::SwitchSource(source)) => {
                        self.switch_source(source).await;
                    }
                    Some(ConferenceCommand::SetAudioEnabled(enabled)) => {
                        self.set_track_enabled(MediaKind::Audio, enabled).await;
                    }
                    Some(ConferenceCommand::SetVideoEnabled(enabled)) => {
                        self.set_track_enabled(MediaKind::Video, enabled).await;
                    }
                    Some(ConferenceCommand::Leave) | None => {
                        info!("Leaving room {}", self.config.room_id);
                        self.shutdown().await;
                        return Ok(());
                    }
                },
            }

            if self.phase == ConferencePhase::Closed {
                return Ok(());
            }
        }
    }

    fn emit(&self, event: ConferenceEvent) {
        if self.events.send(event).is_err() {
            debug!("Conference event dropped: no listener");
        }
    }

    fn send_join(&self) -> Result<()> {
        self.outbound
            .send(ClientMessage::join(
                self.config.room_id.clone(),
                self.config.display_name.clone(),
            ))
            .map_err(|_| ClientError::Signaling("outbound channel closed".to_owned()))
    }

    /// Creates the session for `remote_id`, replacing any previous one.
    async fn open_session(
        &mut self,
        remote_id: ParticipantId,
        participant: Option<Participant>,
    ) -> Result<()> {
        let Some(local_id) = self.local_id else {
            return Err(ClientError::Signaling(
                "peer announced before welcome".to_owned(),
            ));
        };

        self.remove_peer(&remote_id).await;

        self.next_epoch += 1;
        let epoch = self.next_epoch;
        let events = PeerEventSender::new(remote_id, epoch, self.peer_tx.clone());
        let connection = self
            .connector
            .connect(remote_id, &self.ice_servers, events)
            .await?;

        let monitor = ConnectionMonitor::new(
            remote_id,
            epoch,
            self.config.monitor.clone(),
            self.grace_tx.clone(),
        );
        let mut session = PeerSession::new(
            local_id,
            remote_id,
            epoch,
            connection,
            self.outbound.clone(),
            monitor,
        );
        if let Some(media) = &self.local_media {
            session.set_local_media(media).await?;
            for kind in &self.muted {
                session.set_track_enabled(*kind, false).await?;
            }
        }

        debug!("Session with {} opened (epoch {})", remote_id, epoch);
        self.peers.insert(
            remote_id,
            RemotePeer {
                participant,
                session,
                remote_tracks: Vec::new(),
            },
        );
        Ok(())
    }

    async fn remove_peer(&mut self, id: &ParticipantId) {
        let Some(mut peer) = self.peers.remove(id) else {
            return;
        };
        peer.session.close().await;
        self.emit(ConferenceEvent::RemoteMediaCleared {
            participant_id: *id,
            tracks: peer.remote_tracks,
        });
    }

    async fn close_all_peers(&mut self) {
        let ids: Vec<ParticipantId> = self.peers.keys().copied().collect();
        for id in ids {
            self.remove_peer(&id).await;
        }
    }

    async fn shutdown(&mut self) {
        self.close_all_peers().await;
        self.phase = ConferencePhase::Closed;
    }
}

/// A conference running on its own task, talking to a relay over WebSocket.
pub struct ConferenceHandle {
    pub commands: mpsc::Sender<ConferenceCommand>,
    pub events: mpsc::UnboundedReceiver<ConferenceEvent>,
    pub task: JoinHandle<Result<()>>,
}

impl ConferenceHandle {
    pub async fn leave(self) -> Result<()> {
        let _ = self.commands.send(ConferenceCommand::Leave).await;
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                error!("Conference task failed: {}", e);
                Err(ClientError::Signaling(e.to_string()))
            }
        }
    }
}

pub async fn join_conference(
    url: &str,
    config: ConferenceConfig,
    connector: Arc<dyn PeerConnector>,
    media_source: Arc<dyn MediaSource>,
) -> anyhow::Result<ConferenceHandle> {
    let (outbound, inbound) = SignalingClient::connect(url).await?;
    let (conference, events) = Conference::new(config, connector, media_source, outbound);
    let (commands, commands_rx) = mpsc::channel(16);
    let task = tokio::spawn(conference.run(inbound, commands_rx));

    Ok(ConferenceHandle {
        commands,
        events,
        task,
    })
}
