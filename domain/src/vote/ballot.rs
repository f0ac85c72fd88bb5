//! Ballot value object.

use crate::core::ids::PlayerId;
use serde::{Deserialize, Serialize};

/// A single ballot: either a vote for a player or an explicit pass.
///
/// A tagged variant rather than a sentinel id, so a pass can never be
/// confused with a real player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum Ballot {
    For(PlayerId),
    Pass,
}

impl Ballot {
    pub fn is_pass(&self) -> bool {
        matches!(self, Ballot::Pass)
    }

    pub fn target(&self) -> Option<&PlayerId> {
        match self {
            Ballot::For(id) => Some(id),
            Ballot::Pass => None,
        }
    }
}

impl std::fmt::Display for Ballot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ballot::For(id) => write!(f, "for {id}"),
            Ballot::Pass => write!(f, "pass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ballot_accessors() {
        let cast = Ballot::For(PlayerId::new("h1"));
        assert!(!cast.is_pass());
        assert_eq!(cast.target(), Some(&PlayerId::new("h1")));
        assert!(Ballot::Pass.is_pass());
        assert_eq!(Ballot::Pass.target(), None);
    }

    #[test]
    fn test_ballot_serde_round_trip() {
        let cast = Ballot::For(PlayerId::new("h1"));
        let json = serde_json::to_string(&cast).unwrap();
        let back: Ballot = serde_json::from_str(&json).unwrap();
        assert_eq!(cast, back);
    }
}
