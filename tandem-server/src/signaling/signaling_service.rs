use crate::room::RoomHandle;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{
    ClientMessage, IceServerConfig, Participant, ParticipantId, RelayError, RoomId,
    ServerMessage, SignalEnvelope,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

struct SignalingInner {
    peers: DashMap<ParticipantId, mpsc::UnboundedSender<ServerMessage>>,
    ice_servers: Vec<IceServerConfig>,
}

/// Live transport sessions plus the point-to-point signal router.
///
/// Signals never pass through the room manager: a `signal` frame is resolved
/// against the connected sessions and forwarded as is, or dropped.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    rooms: RoomHandle,
}

impl SignalingService {
    pub fn new(rooms: RoomHandle, ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
                ice_servers,
            }),
            rooms,
        }
    }

    pub fn rooms(&self) -> &RoomHandle {
        &self.rooms
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    /// Registers a new transport session under a fresh id and greets it with
    /// `welcome` and `ice-config`.
    pub fn connect(&self) -> (ParticipantId, mpsc::UnboundedReceiver<ServerMessage>) {
        let participant_id = ParticipantId::new();
        let (tx, rx) = mpsc::unbounded_channel();

        self.add_peer(participant_id, tx);
        self.send_signal(participant_id, ServerMessage::Welcome { id: participant_id });
        self.send_signal(
            participant_id,
            ServerMessage::IceConfig {
                ice_servers: self.get_ice_servers(),
            },
        );

        (participant_id, rx)
    }

    pub fn add_peer(&self, peer_id: ParticipantId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.inner.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &ParticipantId) {
        self.inner.peers.remove(peer_id);
    }

    pub fn is_connected(&self, peer_id: &ParticipantId) -> bool {
        self.inner.peers.contains_key(peer_id)
    }

    /// Transport session ended: forget the channel, then leave the room.
    pub async fn disconnect(&self, peer_id: ParticipantId) {
        self.remove_peer(&peer_id);
        self.rooms.disconnect(peer_id).await;
    }

    /// Queues a message for one client. Returns `false` when the client is gone.
    pub fn send_signal(&self, peer_id: ParticipantId, msg: ServerMessage) -> bool {
        let Some(peer) = self.inner.peers.get(&peer_id) else {
            debug!("Attempted to send to disconnected participant {}", peer_id);
            return false;
        };

        if let Err(e) = peer.send(msg) {
            error!("Failed to queue message for {}: {}", peer_id, e);
            return false;
        }
        true
    }

    /// Best-effort delivery of an envelope to its target. An unknown or
    /// closed target is a silent drop: no error to the sender, no retry.
    pub fn route(&self, envelope: SignalEnvelope) -> bool {
        let target = envelope.target_id;
        let kind = envelope.payload.kind();

        let delivered = self.send_signal(target, envelope.into_delivery());
        if delivered {
            debug!("Routed {} to {}", kind, target);
        } else {
            debug!("{}", RelayError::UnroutableSignal(target));
        }
        delivered
    }

    pub fn send_error(&self, peer_id: ParticipantId, error: &RelayError) {
        self.send_signal(
            peer_id,
            ServerMessage::Error {
                message: error.to_string(),
            },
        );
    }

    pub async fn handle_client_text(&self, sender: ParticipantId, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.handle_client_message(sender, msg).await,
            Err(e) => {
                warn!("Invalid message from {}: {}", sender, e);
                self.send_error(sender, &RelayError::MalformedMessage(e.to_string()));
            }
        }
    }

    pub async fn handle_client_message(&self, sender: ParticipantId, msg: ClientMessage) {
        match msg {
            ClientMessage::JoinRoom {
                room_id,
                display_name,
            } => {
                info!("Participant {} wants to join room '{}'", sender, room_id);
                let participant = Participant::new(sender, display_name);
                if let Err(e) = self.rooms.join(RoomId::from(room_id), participant).await {
                    self.send_error(sender, &e);
                }
            }

            ClientMessage::Signal { to, from, signal } => {
                if from != sender {
                    warn!(
                        "Participant {} sent a signal claiming to be {}; using the session id",
                        sender, from
                    );
                }
                self.route(SignalEnvelope::new(sender, to, signal));
            }
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_existing_users(&self, to: ParticipantId, users: Vec<Participant>) {
        self.send_signal(to, ServerMessage::ExistingUsers { users });
    }

    async fn send_user_connected(&self, to: ParticipantId, participant: Participant) {
        self.send_signal(to, ServerMessage::UserConnected(participant));
    }

    async fn send_user_disconnected(&self, to: ParticipantId, participant: Participant) {
        self.send_signal(to, ServerMessage::UserDisconnected(participant));
    }
}
