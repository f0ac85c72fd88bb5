//! Player entity and roster.

use crate::core::error::GameError;
use crate::core::ids::PlayerId;
use crate::player::personality::Personality;
use serde::{Deserialize, Serialize};

/// A participant in a round (Entity).
///
/// Exactly one player per round carries the outsider role, and it is
/// always an AI player. Per-round counters are reset when a new round
/// starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_ai: bool,
    /// Set only for AI players.
    pub personality: Option<Personality>,
    pub is_outsider: bool,
    pub connected: bool,
    /// Voted out in a tie; stays in the roster but no longer acts.
    pub eliminated: bool,
    pub questions_asked: u32,
    pub questions_answered: u32,
    pub votes_received: u32,
}

impl Player {
    pub fn human(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self::new(id, name, false, None)
    }

    pub fn ai(
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        personality: Personality,
    ) -> Self {
        Self::new(id, name, true, Some(personality))
    }

    fn new(
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        is_ai: bool,
        personality: Option<Personality>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_ai,
            personality,
            is_outsider: false,
            connected: true,
            eliminated: false,
            questions_asked: 0,
            questions_answered: 0,
            votes_received: 0,
        }
    }

    /// Connected and not voted out: allowed to ask, answer, and vote.
    pub fn is_active(&self) -> bool {
        self.connected && !self.eliminated
    }
}

/// The set of players in one round (Player Registry).
///
/// Keeps insertion order so snapshots and event payloads list players
/// the way they joined.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.get(&player.id).is_some() {
            return Err(GameError::DuplicatePlayer(player.id.clone()));
        }
        self.players.push(player);
        Ok(())
    }

    pub fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| &p.id == id)?;
        Some(self.players.remove(idx))
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Players who can currently act.
    pub fn list_active(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_active()).collect()
    }

    pub fn active_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn active_ai(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_active() && p.is_ai)
            .collect()
    }

    pub fn active_humans(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_active() && !p.is_ai)
            .collect()
    }

    pub fn outsider(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_outsider)
    }

    /// Assigns the outsider role. Exactly one call per round; the role
    /// can only go to an AI player.
    pub fn assign_outsider(&mut self, id: &PlayerId) -> Result<(), GameError> {
        if self.outsider().is_some() {
            return Err(GameError::OutsiderAlreadyAssigned);
        }
        let player = self
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
        if !player.is_ai {
            return Err(GameError::OutsiderMustBeAi);
        }
        player.is_outsider = true;
        Ok(())
    }

    pub fn mark_connected(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.set_connected(id, true)
    }

    pub fn mark_disconnected(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.set_connected(id, false)
    }

    fn set_connected(&mut self, id: &PlayerId, connected: bool) -> Result<(), GameError> {
        let player = self
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
        player.connected = connected;
        Ok(())
    }

    /// Removes a player from active play after a tie elimination.
    pub fn eliminate(&mut self, id: &PlayerId) -> Result<(), GameError> {
        let player = self
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
        player.eliminated = true;
        Ok(())
    }

    pub fn record_question_asked(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.get_mut(id)
            .map(|p| p.questions_asked += 1)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))
    }

    pub fn record_question_answered(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.get_mut(id)
            .map(|p| p.questions_answered += 1)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))
    }

    pub fn record_vote_received(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.get_mut(id)
            .map(|p| p.votes_received += 1)
            .ok_or_else(|| GameError::UnknownPlayer(id.clone()))
    }

    /// Clears roles, eliminations, and counters ahead of a new round.
    pub fn reset_round_state(&mut self) {
        for player in &mut self.players {
            player.is_outsider = false;
            player.eliminated = false;
            player.questions_asked = 0;
            player.questions_answered = 0;
            player.votes_received = 0;
        }
    }
}
