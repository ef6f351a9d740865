use tandem_core::model::{Participant, ParticipantId};

use crate::connection::Connectivity;
use crate::media::{RemoteTrack, TrackSource};

#[derive(Debug, Clone, PartialEq)]
pub enum ConferenceCommand {
    SwitchSource(TrackSource),
    SetAudioEnabled(bool),
    SetVideoEnabled(bool),
    Leave,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConferenceEvent {
    Joined {
        local_id: ParticipantId,
        existing: Vec<Participant>,
    },
    ParticipantJoined(Participant),
    ParticipantLeft(Participant),
    RemoteTrackAdded {
        participant_id: ParticipantId,
        track: RemoteTrack,
    },
    /// Every track received from the participant is gone.
    RemoteMediaCleared {
        participant_id: ParticipantId,
        tracks: Vec<RemoteTrack>,
    },
    ConnectivityChanged {
        participant_id: ParticipantId,
        connectivity: Connectivity,
    },
    Reconnecting {
        attempt: u32,
    },
    GaveUp,
    /// Shown to the user as is.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConferencePhase {
    AwaitingWelcome,
    Joining,
    Joined,
    Reconnecting { attempt: u32 },
    Closed,
}
