//! Voting session state machine.

use crate::core::error::GameError;
use crate::core::ids::PlayerId;
use crate::vote::ballot::Ballot;
use crate::vote::tally::VoteTally;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of one voting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    Idle,
    Open,
    Complete,
}

/// Collects at most one ballot per eligible voter, then reports the
/// tally.
///
/// `Idle → Open` when the coordinator starts voting; `Open → Complete`
/// when every eligible voter has cast a ballot, or on an explicit
/// [`VotingSession::force_close`] (voting deadline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingSession {
    state: VoteState,
    eligible_voters: Vec<PlayerId>,
    eligible_targets: Vec<PlayerId>,
    ballots: BTreeMap<PlayerId, Ballot>,
}

impl Default for VotingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingSession {
    pub fn new() -> Self {
        Self {
            state: VoteState::Idle,
            eligible_voters: Vec::new(),
            eligible_targets: Vec::new(),
            ballots: BTreeMap::new(),
        }
    }

    /// Opens a fresh voting phase, clearing any ballots from a previous
    /// one.
    pub fn open(&mut self, eligible_voters: Vec<PlayerId>, eligible_targets: Vec<PlayerId>) {
        self.state = VoteState::Open;
        self.eligible_voters = eligible_voters;
        self.eligible_targets = eligible_targets;
        self.ballots.clear();
    }

    pub fn state(&self) -> VoteState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == VoteState::Open
    }

    pub fn ballots_cast(&self) -> usize {
        self.ballots.len()
    }

    pub fn total_eligible(&self) -> usize {
        self.eligible_voters.len()
    }

    pub fn has_voted(&self, voter: &PlayerId) -> bool {
        self.ballots.contains_key(voter)
    }

    /// Records one ballot. On a validation failure no state changes; an
    /// existing ballot from the same voter is left untouched.
    pub fn cast(&mut self, voter: PlayerId, ballot: Ballot) -> Result<(), GameError> {
        if self.state != VoteState::Open {
            return Err(GameError::VotingClosed);
        }
        if !self.eligible_voters.contains(&voter) {
            return Err(GameError::IneligibleVoter(voter));
        }
        if self.ballots.contains_key(&voter) {
            return Err(GameError::AlreadyVoted(voter));
        }
        if let Some(target) = ballot.target() {
            if *target == voter {
                return Err(GameError::SelfVote);
            }
            if !self.eligible_targets.contains(target) {
                return Err(GameError::InvalidTarget(target.clone()));
            }
        }

        self.ballots.insert(voter, ballot);
        if self.ballots.len() == self.eligible_voters.len() {
            self.state = VoteState::Complete;
        }
        Ok(())
    }

    /// True exactly when every eligible voter has cast a ballot.
    pub fn is_complete(&self) -> bool {
        !self.eligible_voters.is_empty() && self.ballots.len() == self.eligible_voters.len()
    }

    /// Closes the session with whatever ballots exist (voting deadline).
    pub fn force_close(&mut self) {
        if self.state == VoteState::Open {
            self.state = VoteState::Complete;
        }
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally::from_ballots(self.ballots.values())
    }

    /// Back to idle; ballots are cleared.
    pub fn reset(&mut self) {
        self.state = VoteState::Idle;
        self.eligible_voters.clear();
        self.eligible_targets.clear();
        self.ballots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().copied().map(PlayerId::new).collect()
    }

    fn open_session(names: &[&str]) -> VotingSession {
        let mut session = VotingSession::new();
        session.open(ids(names), ids(names));
        session
    }

    #[test]
    fn test_cast_requires_open_session() {
        let mut session = VotingSession::new();
        assert_eq!(
            session.cast(PlayerId::new("h1"), Ballot::Pass),
            Err(GameError::VotingClosed)
        );
    }

    #[test]
    fn test_complete_exactly_when_everyone_voted() {
        let mut session = open_session(&["h1", "h2", "a1"]);
        session
            .cast(PlayerId::new("h1"), Ballot::For(PlayerId::new("a1")))
            .unwrap();
        assert!(!session.is_complete());
        session.cast(PlayerId::new("h2"), Ballot::Pass).unwrap();
        assert!(!session.is_complete());
        session
            .cast(PlayerId::new("a1"), Ballot::For(PlayerId::new("h1")))
            .unwrap();
        assert!(session.is_complete());
        assert_eq!(session.state(), VoteState::Complete);
    }

    #[test]
    fn test_double_vote_rejected_and_original_kept() {
        let mut session = open_session(&["h1", "h2", "a1"]);
        session
            .cast(PlayerId::new("h1"), Ballot::For(PlayerId::new("a1")))
            .unwrap();

        let err = session
            .cast(PlayerId::new("h1"), Ballot::For(PlayerId::new("h2")))
            .unwrap_err();
        assert_eq!(err, GameError::AlreadyVoted(PlayerId::new("h1")));

        let tally = session.tally();
        assert_eq!(tally.votes_for(&PlayerId::new("a1")), 1);
        assert_eq!(tally.votes_for(&PlayerId::new("h2")), 0);
    }

    #[test]
    fn test_self_vote_rejected() {
        let mut session = open_session(&["h1", "h2"]);
        assert_eq!(
            session.cast(PlayerId::new("h1"), Ballot::For(PlayerId::new("h1"))),
            Err(GameError::SelfVote)
        );
        assert_eq!(session.ballots_cast(), 0);
    }

    #[test]
    fn test_invalid_target_and_ineligible_voter() {
        let mut session = open_session(&["h1", "h2"]);
        assert_eq!(
            session.cast(PlayerId::new("h1"), Ballot::For(PlayerId::new("ghost"))),
            Err(GameError::InvalidTarget(PlayerId::new("ghost")))
        );
        assert_eq!(
            session.cast(PlayerId::new("ghost"), Ballot::Pass),
            Err(GameError::IneligibleVoter(PlayerId::new("ghost")))
        );
    }

    #[test]
    fn test_pass_is_always_a_valid_choice() {
        let mut session = open_session(&["h1", "h2"]);
        session.cast(PlayerId::new("h1"), Ballot::Pass).unwrap();
        assert_eq!(session.tally().pass_count(), 1);
    }

    #[test]
    fn test_force_close_freezes_partial_ballots() {
        let mut session = open_session(&["h1", "h2", "a1"]);
        session
            .cast(PlayerId::new("h1"), Ballot::For(PlayerId::new("a1")))
            .unwrap();
        session.force_close();
        assert_eq!(session.state(), VoteState::Complete);
        assert_eq!(
            session.cast(PlayerId::new("h2"), Ballot::Pass),
            Err(GameError::VotingClosed)
        );
        assert_eq!(session.tally().total_cast(), 1);
    }

    #[test]
    fn test_open_clears_previous_ballots() {
        let mut session = open_session(&["h1", "h2"]);
        session.cast(PlayerId::new("h1"), Ballot::Pass).unwrap();
        session.open(ids(&["h1", "h2"]), ids(&["h1", "h2"]));
        assert_eq!(session.ballots_cast(), 0);
        assert!(session.is_open());
    }
}
