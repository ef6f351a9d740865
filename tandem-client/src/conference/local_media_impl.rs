use tracing::{info, warn};

use crate::conference::Conference;
use crate::media::MediaKind;

impl Conference {
    /// Mutes or unmutes the local tracks of `kind` on every connection.
    /// Sessions opened later, and media attached later, inherit the choice.
    pub(super) async fn set_track_enabled(&mut self, kind: MediaKind, enabled: bool) {
        let changed = if enabled {
            self.muted.remove(&kind)
        } else {
            self.muted.insert(kind)
        };
        if !changed {
            return;
        }
        info!("Local {:?} {}", kind, if enabled { "enabled" } else { "disabled" });

        for (id, peer) in &self.peers {
            if let Err(e) = peer.session.set_track_enabled(kind, enabled).await {
                warn!("Failed to toggle {:?} for {}: {}", kind, id, e);
            }
        }
    }
}
