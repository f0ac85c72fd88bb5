//! Round persistence port.
//!
//! The core treats persistence as a key-value store keyed by round id;
//! what sits behind it (cache, database, nothing) is an adapter choice.

use async_trait::async_trait;
use outsider_domain::{Exchange, Player, PlayerId, Roster, Round, RoundPhase, Transcript, Winner};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the backing store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record for round {0}")]
    Corrupt(String),
}

/// Per-player slice of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub is_ai: bool,
    pub connected: bool,
    pub eliminated: bool,
    pub questions_asked: u32,
    pub questions_answered: u32,
    pub votes_received: u32,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            is_ai: player.is_ai,
            connected: player.connected,
            eliminated: player.eliminated,
            questions_asked: player.questions_asked,
            questions_answered: player.questions_answered,
            votes_received: player.votes_received,
        }
    }
}

/// Serializable picture of a round at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round_id: String,
    pub phase: RoundPhase,
    pub location: Option<String>,
    pub outsider: Option<PlayerId>,
    pub turn_index: usize,
    pub question_count: u32,
    pub question_quota: u32,
    pub current_asker: Option<PlayerId>,
    pub current_target: Option<PlayerId>,
    /// True while a question waits for its answer.
    pub question_pending: bool,
    pub players: Vec<PlayerView>,
    /// The question/answer record so far, completed and pending.
    pub exchanges: Vec<Exchange>,
    pub winner: Option<Winner>,
    pub win_reason: Option<String>,
}

impl RoundSnapshot {
    pub fn capture(round: &Round, roster: &Roster, transcript: &Transcript) -> Self {
        Self {
            round_id: round.id().to_string(),
            phase: round.phase,
            location: (!round.location.is_empty()).then(|| round.location.clone()),
            outsider: roster.outsider().map(|p| p.id.clone()),
            turn_index: round.turn_index,
            question_count: round.question_count,
            question_quota: round.question_quota,
            current_asker: round.current_asker.clone(),
            current_target: round.current_target.clone(),
            question_pending: transcript.has_open_exchange(),
            players: roster.iter().map(PlayerView::from).collect(),
            exchanges: transcript.exchanges().cloned().collect(),
            winner: round.winner,
            win_reason: round.win_reason.clone(),
        }
    }

    /// Copy with the secrets removed, safe to show mid-round.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.location = None;
        copy.outsider = None;
        copy
    }
}

/// Key-value store for round snapshots.
#[async_trait]
pub trait RoundStore: Send + Sync {
    async fn save(&self, snapshot: &RoundSnapshot) -> Result<(), StoreError>;

    async fn load(&self, round_id: &str) -> Result<Option<RoundSnapshot>, StoreError>;

    async fn delete(&self, round_id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use outsider_domain::{Personality, RoundId};

    #[test]
    fn test_redacted_snapshot_hides_secrets() {
        let mut roster = Roster::new();
        roster.add_player(Player::human("h1", "Dana")).unwrap();
        roster
            .add_player(Player::ai("a1", "Quinn", Personality::Direct))
            .unwrap();
        roster.assign_outsider(&PlayerId::new("a1")).unwrap();

        let mut round = Round::new(RoundId::new("r1"), 5);
        round.location = "Zoo".to_string();

        let snapshot = RoundSnapshot::capture(&round, &roster, &Transcript::new());
        assert_eq!(snapshot.location.as_deref(), Some("Zoo"));
        assert_eq!(snapshot.outsider, Some(PlayerId::new("a1")));

        let public = snapshot.redacted();
        assert!(public.location.is_none());
        assert!(public.outsider.is_none());
        assert_eq!(public.players.len(), 2);
    }
}
