use tandem_core::{Participant, ParticipantId, RoomId};

/// Participants of one room in join order. Ids are unique.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    participants: Vec<Participant>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            participants: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.participants.iter().any(|p| &p.id == participant_id)
    }

    /// Appends the participant. Returns `false` if the id is already present.
    pub(crate) fn push(&mut self, participant: Participant) -> bool {
        if self.contains(&participant.id) {
            return false;
        }
        self.participants.push(participant);
        true
    }

    pub(crate) fn remove(&mut self, participant_id: &ParticipantId) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.id == participant_id)?;
        Some(self.participants.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }
}
