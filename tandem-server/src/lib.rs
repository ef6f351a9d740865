mod config;
mod room;
mod signaling;

pub use config::*;
pub use room::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Wires the room manager actor and the signaling service together and
/// starts the actor. Must be called from within a tokio runtime.
pub fn spawn_relay(config: RelayConfig) -> SignalingService {
    let (rooms, command_rx) = RoomHandle::channel(config.command_buffer);
    let signaling = SignalingService::new(rooms, config.ice_servers);

    let manager = RoomManager::new(command_rx, Arc::new(signaling.clone()));
    tokio::spawn(manager.run());

    signaling
}

pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/ws", get(ws_handler))
        .with_state(service)
}
