use tandem_core::IceServerConfig;
use tandem_core::utils::{
    DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2, DEFAULT_STUN_ADDR_3, DEFAULT_STUN_ADDR_4,
};

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Sent to every client right after `welcome`.
    pub ice_servers: Vec<IceServerConfig>,
    /// Capacity of the room manager's command queue.
    pub command_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![
                    DEFAULT_STUN_ADDR.to_string(),
                    DEFAULT_STUN_ADDR_2.to_string(),
                    DEFAULT_STUN_ADDR_3.to_string(),
                    DEFAULT_STUN_ADDR_4.to_string(),
                ],
                username: None,
                credential: None,
            }],
            command_buffer: 256,
        }
    }
}
