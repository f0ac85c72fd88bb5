//! Round entity and lifecycle phases.

use crate::core::error::GameError;
use crate::core::ids::{PlayerId, RoundId};
use crate::round::turn::TurnOrder;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a round.
///
/// Transitions are monotonic except for the explicit `Voting → Playing`
/// rollback when a vote resolves without a winner (all-pass, or a tie
/// that leaves enough survivors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    Waiting,
    Playing,
    Voting,
    Finished,
}

impl RoundPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, RoundPhase::Playing | RoundPhase::Voting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Waiting => "waiting",
            RoundPhase::Playing => "playing",
            RoundPhase::Voting => "voting",
            RoundPhase::Finished => "finished",
        }
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side won a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Humans,
    Ai,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Humans => write!(f, "humans"),
            Winner::Ai => write!(f, "ai"),
        }
    }
}

/// One complete play-through, from location assignment to a declared
/// winner (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    id: RoundId,
    pub phase: RoundPhase,
    /// Known to everyone except the outsider. Empty until the round starts.
    pub location: String,
    pub turn_order: TurnOrder,
    pub turn_index: usize,
    /// Completed exchanges since the round started or since the last
    /// vote rollback.
    pub question_count: u32,
    pub question_quota: u32,
    pub current_asker: Option<PlayerId>,
    pub current_target: Option<PlayerId>,
    pub winner: Option<Winner>,
    pub win_reason: Option<String>,
    /// Bumped on every reset; in-flight AI results stamped with an older
    /// epoch are discarded on arrival.
    pub epoch: u64,
}

impl Round {
    pub fn new(id: RoundId, question_quota: u32) -> Self {
        Self {
            id,
            phase: RoundPhase::Waiting,
            location: String::new(),
            turn_order: TurnOrder::empty(),
            turn_index: 0,
            question_count: 0,
            question_quota,
            current_asker: None,
            current_target: None,
            winner: None,
            win_reason: None,
            epoch: 0,
        }
    }

    pub fn id(&self) -> &RoundId {
        &self.id
    }

    /// 1-based turn number for display.
    pub fn turn_number(&self) -> usize {
        self.turn_index + 1
    }

    pub fn require_phase(&self, expected: RoundPhase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Moves the round into play with a fresh location and turn order.
    pub fn begin(&mut self, location: String, turn_order: TurnOrder) {
        self.phase = RoundPhase::Playing;
        self.location = location;
        self.turn_order = turn_order;
        self.turn_index = 0;
        self.question_count = 0;
        self.current_asker = None;
        self.current_target = None;
        self.winner = None;
        self.win_reason = None;
    }

    /// Selects the asker and target for the current turn.
    ///
    /// Scans the fixed order forward from `turn_index` for the next
    /// active asker (players eliminated mid-round are skipped), then
    /// picks a uniformly random target among the other active players.
    pub fn select_turn<R: Rng>(
        &mut self,
        active: &[PlayerId],
        rng: &mut R,
    ) -> Result<(PlayerId, PlayerId), GameError> {
        let asker_offset = self.turn_order.next_active_offset(self.turn_index, active)?;
        self.turn_index += asker_offset;
        let asker = self.turn_order.asker_at(self.turn_index).clone();
        let target = crate::round::turn::pick_target(&asker, active, rng)?;
        self.current_asker = Some(asker.clone());
        self.current_target = Some(target.clone());
        Ok((asker, target))
    }

    /// Advances to the next turn: bumps the index, clears the pairing,
    /// and recomputes asker/target.
    pub fn advance<R: Rng>(
        &mut self,
        active: &[PlayerId],
        rng: &mut R,
    ) -> Result<(PlayerId, PlayerId), GameError> {
        self.turn_index += 1;
        self.current_asker = None;
        self.current_target = None;
        self.select_turn(active, rng)
    }

    pub fn quota_reached(&self) -> bool {
        self.question_count >= self.question_quota
    }

    pub fn enter_voting(&mut self) {
        self.phase = RoundPhase::Voting;
    }

    /// The `Voting → Playing` rollback: no winner, fresh question count.
    pub fn resume_playing(&mut self) {
        self.phase = RoundPhase::Playing;
        self.question_count = 0;
        self.current_asker = None;
        self.current_target = None;
    }

    pub fn finish(&mut self, winner: Winner, reason: impl Into<String>) {
        self.phase = RoundPhase::Finished;
        self.winner = Some(winner);
        self.win_reason = Some(reason.into());
        self.current_asker = None;
        self.current_target = None;
    }

    /// Returns the round to `Waiting` for a fresh start. The epoch bump
    /// invalidates any AI work still in flight.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.phase = RoundPhase::Waiting;
        self.location.clear();
        self.turn_order = TurnOrder::empty();
        self.turn_index = 0;
        self.question_count = 0;
        self.current_asker = None;
        self.current_target = None;
        self.winner = None;
        self.win_reason = None;
    }
}
