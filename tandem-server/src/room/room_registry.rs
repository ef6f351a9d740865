use crate::room::Room;
use std::collections::HashMap;
use tandem_core::{Participant, ParticipantId, RelayError, RoomId};
use tracing::info;

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// Participants that were already in the room, in join order.
    pub existing: Vec<Participant>,
    /// Set when the participant had to leave another room (or re-enter the
    /// same one) first.
    pub previous: Option<Departure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub room_id: RoomId,
    pub participant: Participant,
    /// Who is still in the room and must hear about the departure.
    pub remaining: Vec<ParticipantId>,
    pub room_closed: bool,
}

/// Room membership bookkeeping.
///
/// Plain data with no interior locking: the owner serializes access (see
/// [`crate::RoomManager`]). Rooms are created on first join and removed as
/// soon as their last participant leaves, and a participant belongs to at
/// most one room.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<ParticipantId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(
        &mut self,
        room_id: RoomId,
        participant: Participant,
    ) -> Result<JoinOutcome, RelayError> {
        if room_id.as_str().trim().is_empty() {
            return Err(RelayError::InvalidJoinRequest("room id is required".into()));
        }
        if participant.display_name.trim().is_empty() {
            return Err(RelayError::InvalidJoinRequest(
                "display name is required".into(),
            ));
        }

        let previous = match self.memberships.get(&participant.id).cloned() {
            Some(current) => self.leave(&current, &participant.id),
            None => None,
        };

        let room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!(room = %room_id, "Creating room");
            Room::new(room_id.clone())
        });

        let existing = room.participants().to_vec();
        room.push(participant.clone());
        self.memberships.insert(participant.id, room_id);

        Ok(JoinOutcome { existing, previous })
    }

    /// Removes the participant from the room. Absence is not an error:
    /// disconnects race with room cleanup.
    pub fn leave(
        &mut self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Option<Departure> {
        let room = self.rooms.get_mut(room_id)?;
        let participant = room.remove(participant_id)?;

        if self.memberships.get(participant_id) == Some(room_id) {
            self.memberships.remove(participant_id);
        }

        let remaining: Vec<ParticipantId> = room.participants().iter().map(|p| p.id).collect();
        let room_closed = room.is_empty();
        if room_closed {
            self.rooms.remove(room_id);
            info!(room = %room_id, "Room is empty, removing");
        }

        Some(Departure {
            room_id: room_id.clone(),
            participant,
            remaining,
            room_closed,
        })
    }

    /// Leaves whatever room the participant is in.
    pub fn leave_any(&mut self, participant_id: &ParticipantId) -> Option<Departure> {
        let room_id = self.memberships.get(participant_id)?.clone();
        self.leave(&room_id, participant_id)
    }

    pub fn room_of(&self, participant_id: &ParticipantId) -> Option<&RoomId> {
        self.memberships.get(participant_id)
    }

    pub fn participants(&self, room_id: &RoomId) -> Option<&[Participant]> {
        self.rooms.get(room_id).map(Room::participants)
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
