//! Round session — the synchronous coordinator core.
//!
//! [`RoundSession`] owns all state for one round (roster, round entity,
//! transcript, voting session, RNG) and validates every action against
//! it. Each successful operation returns the [`Effect`]s the async
//! shell must carry out: events to emit, AI work to schedule, snapshots
//! to persist. Failed validations mutate nothing.
//!
//! Keeping this core free of async makes the whole state machine
//! testable without a runtime; [`super::round_runtime::RoundRuntime`]
//! is the thin shell that owns one session per round and interprets the
//! effects.

use crate::config::GameParams;
use crate::ports::location_guess::{GuessRequest, LocationGuess, QaPair};
use crate::ports::notifier::{
    AnswerGivenEvent, GameEvent, LocationGuessEvent, QuestionAskedEvent, QuestionCountEvent,
    RoundResetEvent, RoundStartedEvent, TurnStartedEvent, VoteRecordedEvent, VotingResolvedEvent,
    VotingStartedEvent,
};
use crate::ports::round_store::{PlayerView, RoundSnapshot};
use crate::ports::text_generation::{AnswerPrompt, QuestionPrompt};
use outsider_domain::{
    Ballot, GameError, Player, PlayerId, Round, RoundId, RoundPhase, Roster, Transcript, TurnOrder,
    VotingSession, Winner, default_locations, resolve,
};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

/// Follow-up work produced by a successful session operation.
///
/// The sync core decides *what* happens; the async shell decides *how*
/// (delays, timeouts, fallbacks).
#[derive(Debug, Clone)]
pub enum Effect {
    /// Deliver an event through the notifier port.
    Emit(GameEvent),
    /// An AI player should ask a question after its thinking delay.
    ScheduleAiQuestion {
        epoch: u64,
        asker: PlayerId,
        target: PlayerId,
        prompt: QuestionPrompt,
    },
    /// An AI player should answer the pending question.
    ScheduleAiAnswer {
        epoch: u64,
        answerer: PlayerId,
        prompt: AnswerPrompt,
    },
    /// An AI player should cast its ballot.
    ScheduleAiVote { epoch: u64, voter: PlayerId },
    /// The outsider just answered; run the location-guess heuristic
    /// before the next turn starts.
    CheckLocationGuess { epoch: u64, request: GuessRequest },
    /// Save a snapshot through the persistence port.
    Persist,
    /// The round is over: record statistics and emit the final event.
    RoundFinished { winner: Winner, reason: String },
}

/// All state for one round, behind a synchronous API.
pub struct RoundSession {
    params: GameParams,
    locations: Vec<String>,
    roster: Roster,
    round: Round,
    transcript: Transcript,
    voting: VotingSession,
    rng: ChaCha8Rng,
}

impl RoundSession {
    pub fn new(round_id: RoundId, params: GameParams) -> Self {
        Self {
            params,
            locations: default_locations(),
            roster: Roster::new(),
            round: Round::new(round_id, 0),
            transcript: Transcript::new(),
            voting: VotingSession::new(),
            rng: ChaCha8Rng::from_entropy(),
        }
        .sync_quota()
    }

    /// Replaces the built-in location catalog.
    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        if !locations.is_empty() {
            self.locations = locations;
        }
        self
    }

    /// Seeds the RNG for reproducible rounds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    fn sync_quota(mut self) -> Self {
        self.round.question_quota = self.params.question_quota;
        self
    }

    // ==================== Accessors ====================

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn epoch(&self) -> u64 {
        self.round.epoch
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot::capture(&self.round, &self.roster, &self.transcript)
    }

    fn name_of(&self, id: &PlayerId) -> String {
        self.roster
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn active_views(&self) -> Vec<PlayerView> {
        self.roster
            .list_active()
            .into_iter()
            .map(PlayerView::from)
            .collect()
    }

    // ==================== Lobby ====================

    /// Players join while the round is waiting to start.
    pub fn add_player(&mut self, player: Player) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Waiting)?;
        if self.roster.len() >= self.params.max_players {
            return Err(GameError::RoundFull {
                max: self.params.max_players,
            });
        }
        info!(player = %player.id, name = %player.name, is_ai = player.is_ai, "player joining");
        self.roster.add_player(player)?;
        Ok(vec![Effect::Persist])
    }

    /// A leaver is removed outright before the round starts; mid-round
    /// they are only marked disconnected so the transcript stays
    /// coherent. If too few players remain the round ends defensively.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Vec<Effect>, GameError> {
        if self.round.phase == RoundPhase::Waiting {
            self.roster
                .remove_player(id)
                .ok_or_else(|| GameError::UnknownPlayer(id.clone()))?;
            return Ok(vec![Effect::Persist]);
        }

        self.roster.mark_disconnected(id)?;
        info!(player = %id, "player disconnected mid-round");

        if self.round.phase.is_active()
            && self.roster.list_active().len() < self.params.min_players
        {
            return Ok(self.defensive_end("too few players remain"));
        }
        Ok(vec![Effect::Persist])
    }

    // ==================== Round lifecycle ====================

    /// Starts the round: picks the location, assigns the outsider among
    /// the AI players, fixes the turn order, and opens the first turn.
    pub fn start_round(
        &mut self,
        starting_player: Option<&PlayerId>,
    ) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Waiting)?;

        let active = self.roster.active_ids();
        if active.len() < self.params.min_players {
            return Err(GameError::InsufficientPlayers {
                needed: self.params.min_players,
                have: active.len(),
            });
        }

        self.roster.reset_round_state();

        let outsider = {
            let ai = self.roster.active_ai();
            ai.choose(&mut self.rng)
                .map(|p| p.id.clone())
                .ok_or(GameError::NoAiPlayer)?
        };
        self.roster.assign_outsider(&outsider)?;

        let location = self
            .locations
            .choose(&mut self.rng)
            .expect("location catalog is never empty")
            .clone();

        let order = TurnOrder::build(&active, starting_player, &mut self.rng)?;
        self.transcript.clear();
        self.voting.reset();
        self.round.question_quota = self.params.question_quota;
        self.round.begin(location.clone(), order);

        info!(round = %self.round.id(), location = %location, players = active.len(), "round started");

        let mut effects = vec![
            Effect::Emit(GameEvent::RoundStarted(RoundStartedEvent {
                round_id: self.round.id().to_string(),
                location,
                players: self.active_views(),
                player_order: self.round.turn_order.as_slice().to_vec(),
            })),
            Effect::Persist,
        ];
        effects.extend(self.turn_effects(false));
        Ok(effects)
    }

    /// Opens the current (or next) turn and schedules the asker's AI
    /// question when the asker is not human. Resource failures here end
    /// the round defensively instead of wedging it.
    fn turn_effects(&mut self, advance: bool) -> Vec<Effect> {
        if self.round.phase != RoundPhase::Playing {
            return Vec::new();
        }

        let active = self.roster.active_ids();
        if active.len() < self.params.min_players {
            return self.defensive_end("too few players remain");
        }
        if self.roster.active_humans().is_empty() {
            return self.defensive_end("no human players remain");
        }

        let selected = if advance {
            self.round.advance(&active, &mut self.rng)
        } else {
            self.round.select_turn(&active, &mut self.rng)
        };
        let (asker, target) = match selected {
            Ok(pair) => pair,
            Err(err) => {
                return self.defensive_end(format!("could not continue the round: {err}"));
            }
        };

        debug!(turn = self.round.turn_number(), asker = %asker, target = %target, "turn started");

        let mut effects = vec![Effect::Emit(GameEvent::TurnStarted(TurnStartedEvent {
            asker: asker.clone(),
            asker_name: self.name_of(&asker),
            turn_number: self.round.turn_number(),
            total_players: active.len(),
        }))];

        if let Some(player) = self.roster.get(&asker)
            && player.is_ai
        {
            let prompt = QuestionPrompt {
                target_name: self.name_of(&target),
                is_outsider: player.is_outsider,
                location_hint: (!player.is_outsider).then(|| self.round.location.clone()),
                previous_questions: self.transcript.recent_questions(3),
                personality: player.personality,
            };
            effects.push(Effect::ScheduleAiQuestion {
                epoch: self.round.epoch,
                asker,
                target,
                prompt,
            });
        }
        effects
    }

    fn defensive_end(&mut self, reason: impl Into<String>) -> Vec<Effect> {
        let reason = reason.into();
        warn!(round = %self.round.id(), reason = %reason, "ending round defensively");
        self.finish_effects(Winner::Ai, reason)
    }

    fn finish_effects(&mut self, winner: Winner, reason: impl Into<String>) -> Vec<Effect> {
        let reason = reason.into();
        self.round.finish(winner, reason.clone());
        self.transcript.push_system(reason.clone());
        vec![Effect::RoundFinished { winner, reason }]
    }

    // ==================== Questions and answers ====================

    /// Records a question from the current asker to the current target.
    pub fn ask_question(
        &mut self,
        asker: &PlayerId,
        target: &PlayerId,
        text: &str,
    ) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Playing)?;

        if self.round.current_asker.as_ref() != Some(asker) {
            return Err(GameError::NotYourTurn(asker.clone()));
        }
        if self.round.current_target.as_ref() != Some(target) {
            return Err(GameError::InvalidTarget(target.clone()));
        }
        if self.transcript.has_open_exchange() {
            return Err(GameError::QuestionPending);
        }

        let text = validated_text(text, "question", self.params.max_question_len)?;
        self.transcript.push_exchange(outsider_domain::Exchange::new(
            asker.clone(),
            target.clone(),
            text.clone(),
        ));
        self.roster.record_question_asked(asker)?;

        let mut effects = vec![Effect::Emit(GameEvent::QuestionAsked(QuestionAskedEvent {
            asker: asker.clone(),
            asker_name: self.name_of(asker),
            target: target.clone(),
            target_name: self.name_of(target),
            question: text.clone(),
        }))];

        if let Some(player) = self.roster.get(target)
            && player.is_ai
        {
            let prompt = AnswerPrompt {
                question: text,
                asker_name: self.name_of(asker),
                is_outsider: player.is_outsider,
                location: (!player.is_outsider).then(|| self.round.location.clone()),
                personality: player.personality,
                previous_context: self
                    .transcript
                    .completed_pairs()
                    .into_iter()
                    .map(|(q, a)| format!("Q: {q} A: {a}"))
                    .collect(),
            };
            effects.push(Effect::ScheduleAiAnswer {
                epoch: self.round.epoch,
                answerer: target.clone(),
                prompt,
            });
        }
        Ok(effects)
    }

    /// Completes the pending exchange. When the outsider answered and
    /// enough questions have passed, the guess heuristic runs before
    /// the turn advances; otherwise the next turn opens immediately.
    pub fn submit_answer(
        &mut self,
        answerer: &PlayerId,
        text: &str,
    ) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Playing)?;

        if self.round.current_target.as_ref() != Some(answerer) {
            return Err(GameError::NotYourTurn(answerer.clone()));
        }
        let text = validated_text(text, "answer", self.params.max_answer_len)?;

        let Some(exchange) = self.transcript.open_exchange_mut() else {
            // The question hasn't been asked yet.
            return Err(GameError::NotYourTurn(answerer.clone()));
        };
        exchange.complete(text.clone());

        self.roster.record_question_answered(answerer)?;
        self.round.question_count += 1;

        let count = self.round.question_count;
        let quota = self.round.question_quota;
        let mut effects = vec![
            Effect::Emit(GameEvent::AnswerGiven(AnswerGivenEvent {
                target: answerer.clone(),
                target_name: self.name_of(answerer),
                answer: text,
            })),
            Effect::Emit(GameEvent::QuestionCountUpdate(QuestionCountEvent {
                question_count: count,
                questions_until_vote: quota.saturating_sub(count),
                can_vote: count >= quota,
            })),
            Effect::Persist,
        ];

        let is_outsider = self
            .roster
            .get(answerer)
            .is_some_and(|p| p.is_outsider);
        if is_outsider && count >= self.params.guess_threshold {
            // Nobody is on turn until the guess verdict comes back.
            self.round.current_asker = None;
            self.round.current_target = None;
            effects.push(Effect::CheckLocationGuess {
                epoch: self.round.epoch,
                request: self.guess_request(),
            });
        } else {
            effects.extend(self.turn_effects(true));
        }
        Ok(effects)
    }

    fn guess_request(&self) -> GuessRequest {
        GuessRequest {
            qa_pairs: self
                .transcript
                .completed_pairs()
                .into_iter()
                .map(|(question, answer)| QaPair { question, answer })
                .collect(),
            candidate_locations: self.locations.clone(),
            questions_asked: self.round.question_count,
        }
    }

    /// Applies the guess heuristic's verdict. An exact (case-
    /// insensitive) match ends the round for the AI; anything else is
    /// announced anonymously and play moves on.
    pub fn apply_guess(&mut self, guess: LocationGuess) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Playing)?;

        let mut effects = Vec::new();
        if let Some(location) = guess.location.as_deref() {
            let is_correct =
                location.trim().to_lowercase() == self.round.location.to_lowercase();
            let message = format!("Someone guessed the location: {}", location.trim());
            self.transcript.push_system(message.clone());
            effects.push(Effect::Emit(GameEvent::LocationGuessMade(
                LocationGuessEvent {
                    guess: location.trim().to_string(),
                    is_correct,
                    message,
                },
            )));

            if is_correct {
                info!(round = %self.round.id(), "outsider guessed the location");
                effects.extend(self.finish_effects(
                    Winner::Ai,
                    format!(
                        "Someone correctly guessed the location: {}! The AI wins!",
                        self.round.location
                    ),
                ));
                return Ok(effects);
            }
        }

        effects.extend(self.turn_effects(true));
        Ok(effects)
    }

    // ==================== Voting ====================

    /// Moves the round into its voting phase once the quota is met.
    pub fn request_voting(&mut self, requester: &PlayerId) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Playing)?;
        if self.roster.get(requester).is_none() {
            return Err(GameError::UnknownPlayer(requester.clone()));
        }
        if !self.round.quota_reached() {
            return Err(GameError::QuotaNotReached {
                asked: self.round.question_count,
                quota: self.round.question_quota,
            });
        }

        let active = self.roster.active_ids();
        self.round.enter_voting();
        self.voting.open(active.clone(), active.clone());

        info!(round = %self.round.id(), voters = active.len(), "voting started");

        let mut effects = vec![
            Effect::Emit(GameEvent::VotingStarted(VotingStartedEvent {
                players: self.active_views(),
            })),
            Effect::Persist,
        ];
        for player in self.roster.active_ai() {
            effects.push(Effect::ScheduleAiVote {
                epoch: self.round.epoch,
                voter: player.id.clone(),
            });
        }
        Ok(effects)
    }

    /// Records one ballot; when the last eligible voter has cast, the
    /// tally resolves immediately.
    pub fn cast_vote(&mut self, voter: &PlayerId, ballot: Ballot) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Voting)?;
        self.voting.cast(voter.clone(), ballot.clone())?;

        if let Some(target) = ballot.target() {
            self.roster.record_vote_received(target)?;
        }

        let mut effects = vec![Effect::Emit(GameEvent::VoteRecorded(VoteRecordedEvent {
            voter: voter.clone(),
            votes_cast: self.voting.ballots_cast(),
            total_eligible: self.voting.total_eligible(),
        }))];

        if self.voting.is_complete() {
            effects.extend(self.resolve_effects());
        }
        Ok(effects)
    }

    /// An AI ballot: uniformly random among the active human players
    /// (never itself, never a pass), so AI participation can't stall
    /// the vote.
    pub fn cast_ai_vote(&mut self, voter: &PlayerId) -> Result<Vec<Effect>, GameError> {
        let humans: Vec<PlayerId> = self
            .roster
            .active_humans()
            .into_iter()
            .map(|p| p.id.clone())
            .filter(|id| id != voter)
            .collect();

        let ballot = match humans.choose(&mut self.rng) {
            Some(target) => Ballot::For(target.clone()),
            // Degenerate roster with no human candidates.
            None => Ballot::Pass,
        };
        self.cast_vote(voter, ballot)
    }

    /// Voting deadline: resolve whatever ballots exist.
    pub fn close_voting(&mut self) -> Result<Vec<Effect>, GameError> {
        self.round.require_phase(RoundPhase::Voting)?;
        warn!(round = %self.round.id(), cast = self.voting.ballots_cast(), "voting force-closed");
        self.voting.force_close();
        Ok(self.resolve_effects())
    }

    fn resolve_effects(&mut self) -> Vec<Effect> {
        let tally = self.voting.tally();
        let Some(outsider) = self.roster.outsider().map(|p| p.id.clone()) else {
            return self.defensive_end("no outsider assigned");
        };
        let total_active = self.roster.list_active().len();
        let outcome = resolve(&tally, total_active, &outsider);
        info!(round = %self.round.id(), ?outcome, "vote resolved");

        let mut effects = Vec::new();
        match &outcome {
            outsider_domain::VoteOutcome::AllPassed => {
                let message =
                    "Everyone passed! No one was eliminated. The game continues!".to_string();
                self.transcript.push_system(message.clone());
                effects.push(Effect::Emit(GameEvent::VotingResolved(
                    VotingResolvedEvent {
                        message,
                        eliminated: Vec::new(),
                        all_passed: true,
                        continues: true,
                    },
                )));
                self.round.resume_playing();
                self.voting.reset();
                effects.push(Effect::Persist);
                effects.extend(self.turn_effects(true));
            }
            outsider_domain::VoteOutcome::Eliminated { player, winner } => {
                let message = match winner {
                    Winner::Humans => format!(
                        "Humans win! {} (the outsider) was eliminated!",
                        self.name_of(player)
                    ),
                    Winner::Ai => format!("AI wins! {} was eliminated!", self.name_of(player)),
                };
                let _ = self.roster.eliminate(player);
                effects.push(Effect::Emit(GameEvent::VotingResolved(
                    VotingResolvedEvent {
                        message: message.clone(),
                        eliminated: vec![player.clone()],
                        all_passed: false,
                        continues: false,
                    },
                )));
                effects.extend(self.finish_effects(*winner, message));
            }
            outsider_domain::VoteOutcome::TiedOneOnOne { tied } => {
                let message = "Tie with two players left! Humans win by default!".to_string();
                effects.push(Effect::Emit(GameEvent::VotingResolved(
                    VotingResolvedEvent {
                        message: message.clone(),
                        eliminated: tied.clone(),
                        all_passed: false,
                        continues: false,
                    },
                )));
                effects.extend(self.finish_effects(Winner::Humans, message));
            }
            outsider_domain::VoteOutcome::TiedEliminated {
                eliminated,
                survivors,
            } => {
                let names: Vec<String> = eliminated.iter().map(|id| self.name_of(id)).collect();
                for id in eliminated {
                    let _ = self.roster.eliminate(id);
                }
                let message = format!("Tie! {} were all eliminated!", names.join(", "));
                self.transcript.push_system(message.clone());
                let continues = *survivors >= 2;
                effects.push(Effect::Emit(GameEvent::VotingResolved(
                    VotingResolvedEvent {
                        message,
                        eliminated: eliminated.clone(),
                        all_passed: false,
                        continues,
                    },
                )));
                if continues {
                    self.round.resume_playing();
                    self.voting.reset();
                    effects.push(Effect::Persist);
                    effects.extend(self.turn_effects(true));
                } else {
                    effects.extend(
                        self.finish_effects(Winner::Ai, "Not enough players remaining. AI wins!"),
                    );
                }
            }
        }
        effects
    }

    // ==================== Reset ====================

    /// Returns the table to `Waiting` so a fresh round can start. Any
    /// AI work still in flight is invalidated by the epoch bump.
    pub fn reset(&mut self, message: impl Into<String>) -> Vec<Effect> {
        let message = message.into();
        info!(round = %self.round.id(), "round reset");
        self.roster.reset_round_state();
        self.round.reset();
        self.transcript.clear();
        self.voting.reset();
        vec![
            Effect::Emit(GameEvent::RoundReset(RoundResetEvent { message })),
            Effect::Persist,
        ]
    }
}

fn validated_text(
    text: &str,
    what: &'static str,
    max_len: usize,
) -> Result<String, GameError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GameError::EmptyInput { what });
    }
    if trimmed.chars().count() > max_len {
        return Err(GameError::InputTooLong {
            what,
            len: trimmed.chars().count(),
            max: max_len,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use outsider_domain::Personality;

    fn session_with(humans: &[&str], ais: &[&str]) -> RoundSession {
        let mut session = RoundSession::new(
            RoundId::new("test-round"),
            GameParams::default().without_ai_delays(),
        )
        .with_seed(42);
        for h in humans {
            session.add_player(Player::human(*h, h.to_uppercase())).unwrap();
        }
        for a in ais {
            session
                .add_player(Player::ai(*a, a.to_uppercase(), Personality::Curious))
                .unwrap();
        }
        session
    }

    /// Drives one full exchange through whoever is on turn, so tests
    /// can reach the quota without caring who asks whom.
    fn complete_exchange(session: &mut RoundSession) {
        let asker = session.round().current_asker.clone().unwrap();
        let target = session.round().current_target.clone().unwrap();
        session
            .ask_question(&asker, &target, "What do you usually wear here?")
            .unwrap();
        let effects = session
            .submit_answer(&target, "Whatever fits the occasion.")
            .unwrap();
        // The outsider's guess check defers the turn advance.
        if effects
            .iter()
            .any(|e| matches!(e, Effect::CheckLocationGuess { .. }))
        {
            session.apply_guess(LocationGuess::none()).unwrap();
        }
    }

    fn started(humans: &[&str], ais: &[&str]) -> RoundSession {
        let mut session = session_with(humans, ais);
        session.start_round(Some(&PlayerId::new(humans[0]))).unwrap();
        session
    }

    #[test]
    fn test_start_requires_enough_players() {
        let mut session = session_with(&["h1"], &[]);
        let err = session.start_round(None).unwrap_err();
        assert_eq!(err, GameError::InsufficientPlayers { needed: 2, have: 1 });
    }

    #[test]
    fn test_start_requires_an_ai_for_the_outsider_role() {
        let mut session = session_with(&["h1", "h2"], &[]);
        assert_eq!(session.start_round(None).unwrap_err(), GameError::NoAiPlayer);
    }

    #[test]
    fn test_start_fixes_order_and_marks_one_ai_outsider() {
        let session = started(&["h1", "h2"], &["a1"]);
        assert_eq!(session.phase(), RoundPhase::Playing);

        let order = session.round().turn_order.as_slice();
        let mut sorted: Vec<PlayerId> = order.to_vec();
        sorted.sort();
        let mut expected = session.roster().active_ids();
        expected.sort();
        assert_eq!(sorted, expected);

        let outsider = session.roster().outsider().unwrap();
        assert!(outsider.is_ai);
        assert_eq!(
            session.roster().iter().filter(|p| p.is_outsider).count(),
            1
        );
        assert!(!session.round().location.is_empty());
    }

    #[test]
    fn test_wrong_asker_is_rejected_without_state_change() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let asker = session.round().current_asker.clone().unwrap();
        let target = session.round().current_target.clone().unwrap();
        let wrong = session
            .roster()
            .active_ids()
            .into_iter()
            .find(|id| *id != asker)
            .unwrap();

        let err = session.ask_question(&wrong, &target, "Hm?").unwrap_err();
        assert_eq!(err, GameError::NotYourTurn(wrong));
        assert_eq!(session.transcript().len(), 0);
    }

    #[test]
    fn test_question_bounds_are_enforced() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let asker = session.round().current_asker.clone().unwrap();
        let target = session.round().current_target.clone().unwrap();

        assert_eq!(
            session.ask_question(&asker, &target, "   ").unwrap_err(),
            GameError::EmptyInput { what: "question" }
        );
        let long = "x".repeat(201);
        assert!(matches!(
            session.ask_question(&asker, &target, &long).unwrap_err(),
            GameError::InputTooLong { what: "question", .. }
        ));
    }

    #[test]
    fn test_answer_only_from_current_target() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let asker = session.round().current_asker.clone().unwrap();
        let target = session.round().current_target.clone().unwrap();
        session
            .ask_question(&asker, &target, "What's the dress code?")
            .unwrap();

        let err = session.submit_answer(&asker, "Casual.").unwrap_err();
        assert_eq!(err, GameError::NotYourTurn(asker));

        session.submit_answer(&target, "Casual.").unwrap();
        assert_eq!(session.round().question_count, 1);
    }

    #[test]
    fn test_answer_before_question_is_rejected() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let target = session.round().current_target.clone().unwrap();
        let err = session.submit_answer(&target, "Eager!").unwrap_err();
        assert_eq!(err, GameError::NotYourTurn(target));
        assert_eq!(session.round().question_count, 0);
    }

    #[test]
    fn test_exchange_advances_the_turn() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let first_turn = session.round().turn_number();
        complete_exchange(&mut session);
        assert_eq!(session.round().turn_number(), first_turn + 1);
        let asker = session.round().current_asker.clone().unwrap();
        let target = session.round().current_target.clone().unwrap();
        assert_ne!(asker, target);
    }

    #[test]
    fn test_voting_gate_respects_the_quota() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let requester = PlayerId::new("h1");

        for done in 0..5u32 {
            match session.request_voting(&requester) {
                Err(GameError::QuotaNotReached { asked, quota }) => {
                    assert_eq!(asked, done);
                    assert_eq!(quota, 5);
                }
                other => panic!("expected quota error before 5 exchanges, got {other:?}"),
            }
            complete_exchange(&mut session);
        }

        let effects = session.request_voting(&requester).unwrap();
        assert_eq!(session.phase(), RoundPhase::Voting);
        // One scheduled ballot for the lone AI.
        assert_eq!(
            effects
                .iter()
                .filter(|e| matches!(e, Effect::ScheduleAiVote { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_unanimous_vote_against_outsider_wins_for_humans() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        for _ in 0..5 {
            complete_exchange(&mut session);
        }
        session.request_voting(&PlayerId::new("h1")).unwrap();

        let outsider = session.roster().outsider().unwrap().id.clone();
        session
            .cast_vote(&PlayerId::new("h1"), Ballot::For(outsider.clone()))
            .unwrap();
        session
            .cast_vote(&PlayerId::new("h2"), Ballot::For(outsider.clone()))
            .unwrap();
        let effects = session.cast_ai_vote(&outsider).unwrap();

        assert_eq!(session.phase(), RoundPhase::Finished);
        assert_eq!(session.round().winner, Some(Winner::Humans));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::RoundFinished { winner: Winner::Humans, .. }
        )));
        // Both human ballots landed on the outsider.
        assert_eq!(
            session.roster().get(&outsider).unwrap().votes_received,
            2
        );
    }

    #[test]
    fn test_all_pass_resumes_play_with_fresh_count() {
        let mut session = started(&["h1", "h2", "h3"], &["a1"]);
        for _ in 0..5 {
            complete_exchange(&mut session);
        }
        session.request_voting(&PlayerId::new("h1")).unwrap();

        // Humans all pass; the AI ballot is replaced by a pass via
        // force-close to keep the scenario pure.
        session.cast_vote(&PlayerId::new("h1"), Ballot::Pass).unwrap();
        session.cast_vote(&PlayerId::new("h2"), Ballot::Pass).unwrap();
        session.cast_vote(&PlayerId::new("h3"), Ballot::Pass).unwrap();
        session.close_voting().unwrap();

        assert_eq!(session.phase(), RoundPhase::Playing);
        assert_eq!(session.round().question_count, 0);
        assert!(session.round().current_asker.is_some());
    }

    #[test]
    fn test_duplicate_vote_keeps_the_original_ballot() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        for _ in 0..5 {
            complete_exchange(&mut session);
        }
        session.request_voting(&PlayerId::new("h1")).unwrap();

        let outsider = session.roster().outsider().unwrap().id.clone();
        session
            .cast_vote(&PlayerId::new("h1"), Ballot::For(outsider.clone()))
            .unwrap();
        let err = session
            .cast_vote(&PlayerId::new("h1"), Ballot::For(PlayerId::new("h2")))
            .unwrap_err();
        assert_eq!(err, GameError::AlreadyVoted(PlayerId::new("h1")));
        assert_eq!(session.roster().get(&outsider).unwrap().votes_received, 1);
        assert_eq!(
            session.roster().get(&PlayerId::new("h2")).unwrap().votes_received,
            0
        );
    }

    #[test]
    fn test_correct_guess_ends_the_round_for_the_ai() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        for _ in 0..3 {
            complete_exchange(&mut session);
        }
        let location = session.round().location.clone();

        let effects = session
            .apply_guess(LocationGuess::new(location.to_uppercase(), 0.9))
            .unwrap();

        assert_eq!(session.phase(), RoundPhase::Finished);
        assert_eq!(session.round().winner, Some(Winner::Ai));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Emit(GameEvent::LocationGuessMade(LocationGuessEvent {
                is_correct: true,
                ..
            }))
        )));
    }

    #[test]
    fn test_wrong_guess_is_announced_and_play_continues() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        for _ in 0..3 {
            complete_exchange(&mut session);
        }

        let effects = session
            .apply_guess(LocationGuess::new("Nowhere In Particular", 0.4))
            .unwrap();

        assert_eq!(session.phase(), RoundPhase::Playing);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Emit(GameEvent::LocationGuessMade(LocationGuessEvent {
                is_correct: false,
                ..
            }))
        )));
    }

    #[test]
    fn test_leaver_below_minimum_ends_round_defensively() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        session.remove_player(&PlayerId::new("h1")).unwrap();
        let effects = session.remove_player(&PlayerId::new("h2")).unwrap();

        assert_eq!(session.phase(), RoundPhase::Finished);
        assert_eq!(session.round().winner, Some(Winner::Ai));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::RoundFinished { winner: Winner::Ai, .. })));
    }

    #[test]
    fn test_reset_returns_to_waiting_and_bumps_epoch() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let epoch = session.epoch();
        session.reset("table cleared");
        assert_eq!(session.phase(), RoundPhase::Waiting);
        assert_eq!(session.epoch(), epoch + 1);
        assert!(session.transcript().is_empty());

        // A fresh round can start immediately.
        session.start_round(None).unwrap();
        assert_eq!(session.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_join_rejected_once_round_is_running() {
        let mut session = started(&["h1", "h2"], &["a1"]);
        let err = session
            .add_player(Player::human("late", "Late"))
            .unwrap_err();
        assert!(matches!(err, GameError::WrongPhase { .. }));
    }

    #[test]
    fn test_scenario_three_player_round_flow() {
        // H1, H2 and the outsider AI1 play to the quota, then vote AI1 out.
        let mut session = started(&["h1", "h2"], &["a1"]);
        assert!(session.roster().get(&PlayerId::new("a1")).unwrap().is_outsider);

        for expected in 1..=5u32 {
            complete_exchange(&mut session);
            assert_eq!(session.round().question_count, expected);
        }

        session.request_voting(&PlayerId::new("h2")).unwrap();
        session
            .cast_vote(&PlayerId::new("h1"), Ballot::For(PlayerId::new("a1")))
            .unwrap();
        session
            .cast_vote(&PlayerId::new("h2"), Ballot::For(PlayerId::new("a1")))
            .unwrap();
        session.cast_ai_vote(&PlayerId::new("a1")).unwrap();

        assert_eq!(session.round().winner, Some(Winner::Humans));
    }
}
