use std::fmt;

/// Offer/answer progress of one peer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    Idle,
    Offering,
    AwaitingAnswer,
    Negotiating,
    Stable,
    Closed,
}

impl NegotiationState {
    /// No exchange in flight: a new offer may start from here.
    pub fn is_settled(self) -> bool {
        matches!(self, NegotiationState::Idle | NegotiationState::Stable)
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationState::Idle => "idle",
            NegotiationState::Offering => "offering",
            NegotiationState::AwaitingAnswer => "awaiting an answer",
            NegotiationState::Negotiating => "negotiating",
            NegotiationState::Stable => "stable",
            NegotiationState::Closed => "closed",
        };
        f.write_str(name)
    }
}
