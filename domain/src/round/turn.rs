//! Turn order construction and target selection.
//!
//! The order is fixed once per round so every player gets roughly equal
//! asking opportunities; targets are re-rolled each turn to keep the
//! conversation unpredictable.

use crate::core::error::GameError;
use crate::core::ids::PlayerId;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Fixed asking order for one round: a rotation of the player set with
/// the starting player first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnOrder {
    order: Vec<PlayerId>,
}

impl TurnOrder {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the order from the active player set.
    ///
    /// When no starting player is given one is picked uniformly at
    /// random; the list is then rotated so the starting player is first.
    pub fn build<R: Rng>(
        players: &[PlayerId],
        starting_player: Option<&PlayerId>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if players.is_empty() {
            return Err(GameError::EmptyRoster);
        }

        let start = match starting_player {
            Some(id) => players
                .iter()
                .position(|p| p == id)
                .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?,
            None => rng.gen_range(0..players.len()),
        };

        let mut order = Vec::with_capacity(players.len());
        order.extend_from_slice(&players[start..]);
        order.extend_from_slice(&players[..start]);
        Ok(Self { order })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[PlayerId] {
        &self.order
    }

    /// The asker for a given turn index: `order[index % len]`.
    pub fn asker_at(&self, turn_index: usize) -> &PlayerId {
        &self.order[turn_index % self.order.len()]
    }

    /// Offset (0-based) from `turn_index` to the next asker still in the
    /// active set. Players voted out mid-round keep their slot in the
    /// order but are skipped here.
    pub fn next_active_offset(
        &self,
        turn_index: usize,
        active: &[PlayerId],
    ) -> Result<usize, GameError> {
        if self.order.is_empty() {
            return Err(GameError::EmptyRoster);
        }
        (0..self.order.len())
            .find(|off| active.contains(self.asker_at(turn_index + off)))
            .ok_or(GameError::EmptyRoster)
    }
}

/// Picks a question target uniformly at random among the active players,
/// excluding the asker. With two active players the pairing is forced.
pub fn pick_target<R: Rng>(
    asker: &PlayerId,
    active: &[PlayerId],
    rng: &mut R,
) -> Result<PlayerId, GameError> {
    let candidates: Vec<&PlayerId> = active.iter().filter(|p| *p != asker).collect();
    candidates
        .choose(rng)
        .map(|p| (*p).clone())
        .ok_or_else(|| GameError::NoValidTarget(asker.clone()))
}
