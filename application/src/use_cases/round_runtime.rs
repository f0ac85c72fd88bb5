//! Round runtime — the single owner of a round's state.
//!
//! One actor task per round owns a [`RoundSession`]; every mutation
//! flows through its command queue, so turn-order serialization is
//! guaranteed without locks. AI actions are spawned as delayed tasks
//! that re-enter through the same queue, stamped with the round epoch
//! they were born under; results from a previous epoch are discarded on
//! arrival.
//!
//! External generation and guess calls run under a timeout and degrade
//! to canned fallbacks; a slow or broken backend can never end a
//! round. The inactivity watchdog lives here too: a warning fires a
//! minute before the reset, and both rearm on every successful action.
//! While a generation call is in flight the watchdog holds off, so
//! slow external calls don't trigger spurious resets.

use crate::ports::location_guess::{GuessRequest, LocationGuess, LocationGuesser};
use crate::ports::notifier::{GameEvent, GameNotifier, InactivityWarningEvent, RoundEndedEvent};
use crate::ports::round_store::{RoundSnapshot, RoundStore};
use crate::ports::statistics::StatisticsSink;
use crate::ports::text_generation::{AnswerPrompt, QuestionPrompt, TextGenerator};
use crate::use_cases::round_session::{Effect, RoundSession};
use outsider_domain::{Ballot, GameError, Player, PlayerId, RoundPhase, Winner};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Canned lines used when the generation backend fails or times out.
const FALLBACK_QUESTION: &str = "What's your favorite thing about this place?";
const FALLBACK_ANSWER: &str = "It's pretty nice here.";

/// Errors returned through a [`RoundHandle`]
#[derive(Error, Debug)]
pub enum RoundHandleError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("round task is no longer running")]
    Closed,
}

/// Everything the runtime needs from the outside world.
#[derive(Clone)]
pub struct RoundDeps {
    pub generator: Arc<dyn TextGenerator>,
    pub guesser: Arc<dyn LocationGuesser>,
    pub statistics: Arc<dyn StatisticsSink>,
    pub store: Arc<dyn RoundStore>,
    pub notifier: Arc<dyn GameNotifier>,
}

type Reply = oneshot::Sender<Result<(), GameError>>;

enum Command {
    // External actions
    AddPlayer { player: Box<Player>, reply: Reply },
    RemovePlayer { id: PlayerId, reply: Reply },
    StartRound { starting_player: Option<PlayerId>, reply: Reply },
    AskQuestion { asker: PlayerId, target: PlayerId, text: String, reply: Reply },
    SubmitAnswer { answerer: PlayerId, text: String, reply: Reply },
    RequestVoting { requester: PlayerId, reply: Reply },
    CastVote { voter: PlayerId, ballot: Ballot, reply: Reply },
    Reset { message: String, reply: Reply },
    Snapshot { reply: oneshot::Sender<RoundSnapshot> },

    // Deferred AI work re-entering the queue
    AiQuestionReady { epoch: u64, asker: PlayerId, target: PlayerId, text: String },
    AiAnswerReady { epoch: u64, answerer: PlayerId, text: String },
    AiVoteDue { epoch: u64, voter: PlayerId },
    GuessReady { epoch: u64, guess: LocationGuess },
}

/// Clonable handle to a running round actor.
#[derive(Clone)]
pub struct RoundHandle {
    tx: mpsc::Sender<Command>,
    cancel: CancellationToken,
}

impl RoundHandle {
    async fn send_action(
        &self,
        build: impl FnOnce(Reply) -> Command,
    ) -> Result<(), RoundHandleError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| RoundHandleError::Closed)?;
        rx.await
            .map_err(|_| RoundHandleError::Closed)?
            .map_err(RoundHandleError::Game)
    }

    pub async fn add_player(&self, player: Player) -> Result<(), RoundHandleError> {
        self.send_action(|reply| Command::AddPlayer {
            player: Box::new(player),
            reply,
        })
        .await
    }

    pub async fn remove_player(&self, id: PlayerId) -> Result<(), RoundHandleError> {
        self.send_action(|reply| Command::RemovePlayer { id, reply }).await
    }

    pub async fn start_round(
        &self,
        starting_player: Option<PlayerId>,
    ) -> Result<(), RoundHandleError> {
        self.send_action(|reply| Command::StartRound {
            starting_player,
            reply,
        })
        .await
    }

    pub async fn ask_question(
        &self,
        asker: PlayerId,
        target: PlayerId,
        text: impl Into<String>,
    ) -> Result<(), RoundHandleError> {
        let text = text.into();
        self.send_action(|reply| Command::AskQuestion {
            asker,
            target,
            text,
            reply,
        })
        .await
    }

    pub async fn submit_answer(
        &self,
        answerer: PlayerId,
        text: impl Into<String>,
    ) -> Result<(), RoundHandleError> {
        let text = text.into();
        self.send_action(|reply| Command::SubmitAnswer {
            answerer,
            text,
            reply,
        })
        .await
    }

    pub async fn request_voting(&self, requester: PlayerId) -> Result<(), RoundHandleError> {
        self.send_action(|reply| Command::RequestVoting { requester, reply })
            .await
    }

    pub async fn cast_vote(
        &self,
        voter: PlayerId,
        ballot: Ballot,
    ) -> Result<(), RoundHandleError> {
        self.send_action(|reply| Command::CastVote { voter, ballot, reply })
            .await
    }

    pub async fn reset(&self, message: impl Into<String>) -> Result<(), RoundHandleError> {
        let message = message.into();
        self.send_action(|reply| Command::Reset { message, reply }).await
    }

    pub async fn snapshot(&self) -> Result<RoundSnapshot, RoundHandleError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| RoundHandleError::Closed)?;
        rx.await.map_err(|_| RoundHandleError::Closed)
    }

    /// Stops the actor. In-flight AI tasks die with it.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

enum DeadlineKind {
    InactivityWarning,
    InactivityReset,
    VotingDeadline,
}

/// The actor that owns one round.
pub struct RoundRuntime {
    session: RoundSession,
    deps: RoundDeps,
    tx: mpsc::Sender<Command>,
    rx: mpsc::Receiver<Command>,
    cancel: CancellationToken,
    last_activity: Instant,
    warning_sent: bool,
    voting_deadline: Option<Instant>,
    /// Generation/guess calls in flight; the watchdog holds off while
    /// this is non-zero.
    inflight_generations: usize,
}

impl RoundRuntime {
    /// Spawns the actor and returns its handle.
    pub fn spawn(session: RoundSession, deps: RoundDeps) -> RoundHandle {
        let (tx, rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let handle = RoundHandle {
            tx: tx.clone(),
            cancel: cancel.clone(),
        };
        let runtime = Self {
            session,
            deps,
            tx,
            rx,
            cancel,
            last_activity: Instant::now(),
            warning_sent: false,
            voting_deadline: None,
            inflight_generations: 0,
        };
        tokio::spawn(runtime.run());
        handle
    }

    async fn run(mut self) {
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                _ = sleep_until_opt(deadline.as_ref().map(|d| d.0)) => {
                    if let Some((_, kind)) = deadline {
                        self.handle_deadline(kind).await;
                    }
                }
            }
        }
        debug!("round actor stopped");
    }

    fn next_deadline(&self) -> Option<(Instant, DeadlineKind)> {
        let mut best: Option<(Instant, DeadlineKind)> = None;
        let mut consider = |when: Instant, kind: DeadlineKind| {
            if best.as_ref().is_none_or(|(b, _)| when < *b) {
                best = Some((when, kind));
            }
        };

        if self.session.phase() == RoundPhase::Voting
            && let Some(deadline) = self.voting_deadline
        {
            consider(deadline, DeadlineKind::VotingDeadline);
        }

        // The watchdog pauses while external generation is in flight.
        if self.session.phase().is_active() && self.inflight_generations == 0 {
            let params = self.session.params();
            if let Some(timeout) = params.inactivity_timeout {
                if !self.warning_sent
                    && let Some(after) = params.inactivity_warning_after()
                {
                    consider(self.last_activity + after, DeadlineKind::InactivityWarning);
                }
                consider(self.last_activity + timeout, DeadlineKind::InactivityReset);
            }
        }
        best
    }

    fn touch_activity(&mut self) {
        self.last_activity = Instant::now();
        self.warning_sent = false;
    }

    async fn handle_deadline(&mut self, kind: DeadlineKind) {
        match kind {
            DeadlineKind::InactivityWarning => {
                self.warning_sent = true;
                let reset_in = self
                    .session
                    .params()
                    .inactivity_timeout
                    .map(|t| t.saturating_sub(self.last_activity.elapsed()).as_secs())
                    .unwrap_or(0);
                self.deps
                    .notifier
                    .notify(GameEvent::InactivityWarning(InactivityWarningEvent {
                        reset_in_secs: reset_in,
                    }));
            }
            DeadlineKind::InactivityReset => {
                warn!("inactivity timeout, resetting round");
                let effects = self
                    .session
                    .reset("Game reset due to inactivity. Ready for new players!");
                self.touch_activity();
                self.interpret(effects).await;
            }
            DeadlineKind::VotingDeadline => {
                self.voting_deadline = None;
                match self.session.close_voting() {
                    Ok(effects) => {
                        self.touch_activity();
                        self.interpret(effects).await;
                    }
                    Err(err) => debug!(%err, "voting deadline fired out of phase"),
                }
            }
        }
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::AddPlayer { player, reply } => {
                let result = self.session.add_player(*player);
                self.apply_external(result, reply).await;
            }
            Command::RemovePlayer { id, reply } => {
                let result = self.session.remove_player(&id);
                self.apply_external(result, reply).await;
            }
            Command::StartRound {
                starting_player,
                reply,
            } => {
                let result = self.session.start_round(starting_player.as_ref());
                self.apply_external(result, reply).await;
            }
            Command::AskQuestion {
                asker,
                target,
                text,
                reply,
            } => {
                let result = self.session.ask_question(&asker, &target, &text);
                self.apply_external(result, reply).await;
            }
            Command::SubmitAnswer {
                answerer,
                text,
                reply,
            } => {
                let result = self.session.submit_answer(&answerer, &text);
                self.apply_external(result, reply).await;
            }
            Command::RequestVoting { requester, reply } => {
                let result = self.session.request_voting(&requester);
                self.apply_external(result, reply).await;
            }
            Command::CastVote {
                voter,
                ballot,
                reply,
            } => {
                let result = self.session.cast_vote(&voter, ballot);
                self.apply_external(result, reply).await;
            }
            Command::Reset { message, reply } => {
                let effects = self.session.reset(message);
                self.touch_activity();
                self.interpret(effects).await;
                let _ = reply.send(Ok(()));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }

            Command::AiQuestionReady {
                epoch,
                asker,
                target,
                text,
            } => {
                self.inflight_generations = self.inflight_generations.saturating_sub(1);
                if !self.epoch_current(epoch) {
                    return;
                }
                let text =
                    clamp_text(&text, self.session.params().max_question_len, FALLBACK_QUESTION);
                let result = self.session.ask_question(&asker, &target, &text);
                self.apply_internal(result).await;
            }
            Command::AiAnswerReady {
                epoch,
                answerer,
                text,
            } => {
                self.inflight_generations = self.inflight_generations.saturating_sub(1);
                if !self.epoch_current(epoch) {
                    return;
                }
                let text = clamp_text(&text, self.session.params().max_answer_len, FALLBACK_ANSWER);
                let result = self.session.submit_answer(&answerer, &text);
                self.apply_internal(result).await;
            }
            Command::AiVoteDue { epoch, voter } => {
                if !self.epoch_current(epoch) {
                    return;
                }
                let result = self.session.cast_ai_vote(&voter);
                self.apply_internal(result).await;
            }
            Command::GuessReady { epoch, guess } => {
                self.inflight_generations = self.inflight_generations.saturating_sub(1);
                if !self.epoch_current(epoch) {
                    return;
                }
                let result = self.session.apply_guess(guess);
                self.apply_internal(result).await;
            }
        }
    }

    async fn apply_external(&mut self, result: Result<Vec<Effect>, GameError>, reply: Reply) {
        match result {
            Ok(effects) => {
                self.touch_activity();
                self.interpret(effects).await;
                let _ = reply.send(Ok(()));
            }
            Err(err) => {
                debug!(%err, "action rejected");
                let _ = reply.send(Err(err));
            }
        }
    }

    /// Deferred AI work has nobody to report failures to; a rejection
    /// here usually means the round moved on while the task slept.
    async fn apply_internal(&mut self, result: Result<Vec<Effect>, GameError>) {
        match result {
            Ok(effects) => {
                self.touch_activity();
                self.interpret(effects).await;
            }
            Err(err) => debug!(%err, "deferred AI action discarded"),
        }
    }

    fn epoch_current(&self, epoch: u64) -> bool {
        if epoch != self.session.epoch() {
            debug!(stale = epoch, current = self.session.epoch(), "discarding stale AI result");
            return false;
        }
        true
    }

    async fn interpret(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Emit(event) => self.deps.notifier.notify(event),
                Effect::Persist => self.persist().await,
                Effect::RoundFinished { winner, reason } => {
                    self.finish_round(winner, reason).await;
                }
                Effect::ScheduleAiQuestion {
                    epoch,
                    asker,
                    target,
                    prompt,
                } => self.spawn_ai_question(epoch, asker, target, prompt),
                Effect::ScheduleAiAnswer {
                    epoch,
                    answerer,
                    prompt,
                } => self.spawn_ai_answer(epoch, answerer, prompt),
                Effect::ScheduleAiVote { epoch, voter } => self.spawn_ai_vote(epoch, voter),
                Effect::CheckLocationGuess { epoch, request } => {
                    self.spawn_guess(epoch, request);
                }
            }
        }

        // Keep the voting deadline in step with the phase.
        match self.session.phase() {
            RoundPhase::Voting => {
                if self.voting_deadline.is_none()
                    && let Some(timeout) = self.session.params().voting_timeout
                {
                    self.voting_deadline = Some(Instant::now() + timeout);
                }
            }
            _ => self.voting_deadline = None,
        }
    }

    async fn persist(&self) {
        let snapshot = self.session.snapshot();
        if let Err(err) = self.deps.store.save(&snapshot).await {
            warn!(%err, "failed to persist round snapshot");
        }
    }

    async fn finish_round(&mut self, winner: Winner, reason: String) {
        self.deps.statistics.record_win(winner).await;
        let tally = self.deps.statistics.tally().await;
        self.deps
            .notifier
            .notify(GameEvent::RoundEnded(RoundEndedEvent {
                winner,
                reason,
                outsider: self.session.roster().outsider().map(|p| p.id.clone()),
                location: self.session.round().location.clone(),
                tally,
            }));
        self.persist().await;
    }

    fn spawn_ai_question(
        &mut self,
        epoch: u64,
        asker: PlayerId,
        target: PlayerId,
        prompt: QuestionPrompt,
    ) {
        self.inflight_generations += 1;
        let tx = self.tx.clone();
        let generator = Arc::clone(&self.deps.generator);
        let delay = self.session.params().ai_question_delay;
        let timeout = self.session.params().generation_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let text =
                match tokio::time::timeout(timeout, generator.generate_question(prompt)).await {
                    Ok(Ok(text)) => text,
                    Ok(Err(err)) => {
                        warn!(%err, "question generation failed, using fallback");
                        FALLBACK_QUESTION.to_string()
                    }
                    Err(_) => {
                        warn!("question generation timed out, using fallback");
                        FALLBACK_QUESTION.to_string()
                    }
                };
            let _ = tx
                .send(Command::AiQuestionReady {
                    epoch,
                    asker,
                    target,
                    text,
                })
                .await;
        });
    }

    fn spawn_ai_answer(&mut self, epoch: u64, answerer: PlayerId, prompt: AnswerPrompt) {
        self.inflight_generations += 1;
        let tx = self.tx.clone();
        let generator = Arc::clone(&self.deps.generator);
        let delay = self.session.params().ai_answer_delay;
        let timeout = self.session.params().generation_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let text = match tokio::time::timeout(timeout, generator.generate_answer(prompt)).await
            {
                Ok(Ok(text)) => text,
                Ok(Err(err)) => {
                    warn!(%err, "answer generation failed, using fallback");
                    FALLBACK_ANSWER.to_string()
                }
                Err(_) => {
                    warn!("answer generation timed out, using fallback");
                    FALLBACK_ANSWER.to_string()
                }
            };
            let _ = tx
                .send(Command::AiAnswerReady {
                    epoch,
                    answerer,
                    text,
                })
                .await;
        });
    }

    fn spawn_ai_vote(&self, epoch: u64, voter: PlayerId) {
        let tx = self.tx.clone();
        let delay = self.session.params().ai_vote_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Command::AiVoteDue { epoch, voter }).await;
        });
    }

    fn spawn_guess(&mut self, epoch: u64, request: GuessRequest) {
        self.inflight_generations += 1;
        let tx = self.tx.clone();
        let guesser = Arc::clone(&self.deps.guesser);
        let timeout = self.session.params().generation_timeout;
        tokio::spawn(async move {
            let guess = match tokio::time::timeout(timeout, guesser.guess(request)).await {
                Ok(Ok(guess)) => guess,
                Ok(Err(err)) => {
                    warn!(%err, "location guess failed, treating as no guess");
                    LocationGuess::none()
                }
                Err(_) => {
                    warn!("location guess timed out, treating as no guess");
                    LocationGuess::none()
                }
            };
            let _ = tx.send(Command::GuessReady { epoch, guess }).await;
        });
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(when) => tokio::time::sleep_until(when).await,
        None => std::future::pending().await,
    }
}

/// Keeps generated text inside the validation bounds so a verbose
/// backend can't wedge its own turn.
fn clamp_text(text: &str, max_len: usize, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }
    trimmed.chars().take(max_len).collect()
}
