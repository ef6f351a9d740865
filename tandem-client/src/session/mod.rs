mod negotiation_state;
mod peer_session;

pub use negotiation_state::*;
pub use peer_session::*;
