//! Outbound game events for the transport layer.
//!
//! These events form the output port from the round coordinator to
//! whatever delivers state to players (sockets, HTTP push, a console).
//! The transport has no business logic of its own: each event carries
//! the snapshot it needs.

use crate::ports::round_store::PlayerView;
use crate::ports::statistics::WinTally;
use outsider_domain::{PlayerId, Winner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Events emitted by the round coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A round moved from waiting into play.
    RoundStarted(RoundStartedEvent),
    /// A new turn began; the target stays hidden until the question is
    /// actually asked.
    TurnStarted(TurnStartedEvent),
    QuestionAsked(QuestionAskedEvent),
    AnswerGiven(AnswerGivenEvent),
    /// Progress toward the voting quota.
    QuestionCountUpdate(QuestionCountEvent),
    /// An anonymous location guess was made.
    LocationGuessMade(LocationGuessEvent),
    VotingStarted(VotingStartedEvent),
    VoteRecorded(VoteRecordedEvent),
    VotingResolved(VotingResolvedEvent),
    RoundEnded(RoundEndedEvent),
    /// The round returned to waiting; a new one can start.
    RoundReset(RoundResetEvent),
    InactivityWarning(InactivityWarningEvent),
}

impl GameEvent {
    /// Stable name for transports that key on event type.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::RoundStarted(_) => "round_started",
            GameEvent::TurnStarted(_) => "turn_started",
            GameEvent::QuestionAsked(_) => "question_asked",
            GameEvent::AnswerGiven(_) => "answer_given",
            GameEvent::QuestionCountUpdate(_) => "question_count_update",
            GameEvent::LocationGuessMade(_) => "location_guess_made",
            GameEvent::VotingStarted(_) => "voting_started",
            GameEvent::VoteRecorded(_) => "vote_recorded",
            GameEvent::VotingResolved(_) => "voting_resolved",
            GameEvent::RoundEnded(_) => "round_ended",
            GameEvent::RoundReset(_) => "round_reset",
            GameEvent::InactivityWarning(_) => "inactivity_warning",
        }
    }
}

// === Supporting Types ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStartedEvent {
    pub round_id: String,
    /// The transport must withhold this from the outsider.
    pub location: String,
    pub players: Vec<PlayerView>,
    pub player_order: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStartedEvent {
    pub asker: PlayerId,
    pub asker_name: String,
    pub turn_number: usize,
    pub total_players: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAskedEvent {
    pub asker: PlayerId,
    pub asker_name: String,
    pub target: PlayerId,
    pub target_name: String,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerGivenEvent {
    pub target: PlayerId,
    pub target_name: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCountEvent {
    pub question_count: u32,
    pub questions_until_vote: u32,
    pub can_vote: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationGuessEvent {
    pub guess: String,
    pub is_correct: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingStartedEvent {
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecordedEvent {
    /// Who voted; the ballot itself stays secret.
    pub voter: PlayerId,
    pub votes_cast: usize,
    pub total_eligible: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingResolvedEvent {
    pub message: String,
    pub eliminated: Vec<PlayerId>,
    pub all_passed: bool,
    /// True when play resumes instead of the round ending.
    pub continues: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEndedEvent {
    pub winner: Winner,
    pub reason: String,
    pub outsider: Option<PlayerId>,
    pub location: String,
    pub tally: WinTally,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResetEvent {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InactivityWarningEvent {
    pub reset_in_secs: u64,
}

// === Port ===

/// Outbound notification port. Delivery is the transport's problem;
/// implementations must not block.
pub trait GameNotifier: Send + Sync {
    fn notify(&self, event: GameEvent);
}

/// No-op notifier for when nobody is listening.
pub struct NoNotifier;

impl GameNotifier for NoNotifier {
    fn notify(&self, _event: GameEvent) {}
}

/// Fans one event out to several notifiers (e.g. sockets plus a JSONL
/// transcript).
pub struct FanoutNotifier {
    sinks: Vec<Arc<dyn GameNotifier>>,
}

impl FanoutNotifier {
    pub fn new(sinks: Vec<Arc<dyn GameNotifier>>) -> Self {
        Self { sinks }
    }
}

impl GameNotifier for FanoutNotifier {
    fn notify(&self, event: GameEvent) {
        for sink in &self.sinks {
            sink.notify(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording(Mutex<Vec<String>>);

    impl GameNotifier for Recording {
        fn notify(&self, event: GameEvent) {
            self.0.lock().unwrap().push(event.kind().to_string());
        }
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = GameEvent::QuestionCountUpdate(QuestionCountEvent {
            question_count: 3,
            questions_until_vote: 2,
            can_vote: false,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "question_count_update");
        assert_eq!(json["question_count"], 3);
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let a = Arc::new(Recording(Mutex::new(Vec::new())));
        let b = Arc::new(Recording(Mutex::new(Vec::new())));
        let fanout = FanoutNotifier::new(vec![a.clone(), b.clone()]);

        fanout.notify(GameEvent::RoundReset(RoundResetEvent {
            message: "fresh table".into(),
        }));

        assert_eq!(a.0.lock().unwrap().as_slice(), ["round_reset"]);
        assert_eq!(b.0.lock().unwrap().as_slice(), ["round_reset"]);
    }
}
