mod peer_connection;
mod peer_event;

pub use peer_connection::*;
pub use peer_event::*;
