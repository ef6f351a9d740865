use async_trait::async_trait;

use crate::error::MediaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackSource {
    Microphone,
    Camera,
    Screen,
}

impl TrackSource {
    pub fn kind(self) -> MediaKind {
        match self {
            TrackSource::Microphone => MediaKind::Audio,
            TrackSource::Camera | TrackSource::Screen => MediaKind::Video,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: String,
    pub source: TrackSource,
}

impl MediaTrack {
    pub fn new(id: impl Into<String>, source: TrackSource) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.source.kind()
    }
}

/// Tracks the local participant publishes to every peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMedia {
    pub stream_id: String,
    pub tracks: Vec<MediaTrack>,
}

impl LocalMedia {
    pub fn video_source(&self) -> Option<TrackSource> {
        self.tracks
            .iter()
            .map(|t| t.source)
            .find(|s| s.kind() == MediaKind::Video)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrack {
    pub id: String,
    pub kind: MediaKind,
}

/// Capture side. Treated as a black box: only success or failure matters.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Microphone plus the requested video source.
    async fn acquire(&self, video: TrackSource) -> Result<LocalMedia, MediaError>;
}
