use tandem_core::model::IceServerConfig;

use crate::media::TrackSource;
use crate::monitor::MonitorConfig;

pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct ConferenceConfig {
    pub room_id: String,
    pub display_name: String,
    /// Video published on join.
    pub initial_source: TrackSource,
    /// Overrides whatever the relay announces in `ice-config`.
    pub ice_servers: Option<Vec<IceServerConfig>>,
    pub monitor: MonitorConfig,
    pub max_reconnect_attempts: u32,
}

impl ConferenceConfig {
    pub fn new(room_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            display_name: display_name.into(),
            initial_source: TrackSource::Camera,
            ice_servers: None,
            monitor: MonitorConfig::default(),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
        }
    }
}
