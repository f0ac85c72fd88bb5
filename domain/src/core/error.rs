//! Domain error types

use crate::core::ids::PlayerId;
use crate::round::RoundPhase;
use thiserror::Error;

/// Domain-level errors.
///
/// Validation and state errors are recoverable: the offending action is
/// rejected without mutating round state, and the caller may retry.
/// Resource errors signal that the round cannot safely continue as-is;
/// the coordinator ends the round defensively rather than deadlocking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    // ==================== Validation ====================
    #[error("it is not {0}'s turn to act")]
    NotYourTurn(PlayerId),

    #[error("{what} must not be empty")]
    EmptyInput { what: &'static str },

    #[error("{what} is {len} characters, the limit is {max}")]
    InputTooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{0} has already voted this round")]
    AlreadyVoted(PlayerId),

    #[error("a question is already waiting for an answer")]
    QuestionPending,

    #[error("players cannot vote for themselves")]
    SelfVote,

    #[error("{0} is not a valid vote target")]
    InvalidTarget(PlayerId),

    #[error("{0} is not eligible to vote")]
    IneligibleVoter(PlayerId),

    #[error("duplicate player id: {0}")]
    DuplicatePlayer(PlayerId),

    #[error("the round is full ({max} players)")]
    RoundFull { max: usize },

    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    // ==================== State ====================
    #[error("expected the round to be {expected}, but it is {actual}")]
    WrongPhase {
        expected: RoundPhase,
        actual: RoundPhase,
    },

    #[error("voting needs {quota} completed questions, only {asked} so far")]
    QuotaNotReached { asked: u32, quota: u32 },

    #[error("voting is not open")]
    VotingClosed,

    #[error("the outsider has already been assigned this round")]
    OutsiderAlreadyAssigned,

    #[error("the outsider role can only go to an AI player")]
    OutsiderMustBeAi,

    // ==================== Resource ====================
    #[error("cannot build a turn order from an empty roster")]
    EmptyRoster,

    #[error("no valid question target remains for {0}")]
    NoValidTarget(PlayerId),

    #[error("need at least {needed} active players, have {have}")]
    InsufficientPlayers { needed: usize, have: usize },

    #[error("no AI player is available to take the outsider role")]
    NoAiPlayer,
}

impl GameError {
    /// Whether the caller can simply retry with corrected input.
    ///
    /// Resource errors are the exception: they mean the roster has
    /// degraded past the point where the round can continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            GameError::EmptyRoster
                | GameError::NoValidTarget(_)
                | GameError::InsufficientPlayers { .. }
                | GameError::NoAiPlayer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_recoverable() {
        assert!(GameError::SelfVote.is_recoverable());
        assert!(GameError::AlreadyVoted(PlayerId::new("p1")).is_recoverable());
        assert!(
            GameError::QuotaNotReached { asked: 2, quota: 5 }.is_recoverable()
        );
    }

    #[test]
    fn test_resource_errors_are_not_recoverable() {
        assert!(!GameError::EmptyRoster.is_recoverable());
        assert!(!GameError::InsufficientPlayers { needed: 2, have: 1 }.is_recoverable());
        assert!(!GameError::NoValidTarget(PlayerId::new("p1")).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = GameError::InputTooLong {
            what: "question",
            len: 250,
            max: 200,
        };
        assert_eq!(
            err.to_string(),
            "question is 250 characters, the limit is 200"
        );
    }
}
