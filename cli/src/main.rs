//! CLI entrypoint for outsider
//!
//! Wires the layers together with dependency injection and runs one
//! scripted exhibition round: human seats play from a small script, AI
//! seats act through the round runtime.

use anyhow::Result;
use clap::Parser;
use outsider_application::ports::notifier::{GameEvent, GameNotifier};
use outsider_application::{FanoutNotifier, RoundDeps, RoundHandle, RoundRegistry};
use outsider_domain::{Ballot, Personality, Player, PlayerId, RoundId};
use outsider_infrastructure::{
    CannedTextGenerator, ConfigLoader, InMemoryRoundStore, InMemoryStatistics, JsonlEventLog,
    KeywordLocationGuesser,
};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const HUMAN_NAMES: [&str; 6] = ["Dana", "Robin", "Sam", "Jo", "Mel", "Ash"];

const SCRIPTED_QUESTIONS: [&str; 5] = [
    "What do people usually wear around here?",
    "How crowded does it get at peak times?",
    "What's the strangest thing you've seen here?",
    "Would you come here alone?",
    "What do you hear in the background?",
];

const SCRIPTED_ANSWERS: [&str; 5] = [
    "Nothing fancy, it depends on the day.",
    "Busier than you'd think, honestly.",
    "I try not to stare, but there's always something.",
    "Sure, though it's better with company.",
    "Mostly people talking over each other.",
];

#[derive(Parser)]
#[command(name = "outsider", about = "Social-deduction party game with an AI outsider")]
struct Cli {
    /// Human seats in the exhibition round
    #[arg(long, default_value_t = 2)]
    humans: usize,

    /// AI seats in the exhibition round
    #[arg(long, default_value_t = 1)]
    ai: usize,

    /// Seed for a reproducible round
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSONL event transcript to this path
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Explicit config file (overrides outsider.toml discovery)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the play-by-play output
    #[arg(short, long)]
    quiet: bool,
}

/// Forwards events into the exhibition driver's channel.
struct ChannelNotifier(mpsc::UnboundedSender<GameEvent>);

impl GameNotifier for ChannelNotifier {
    fn notify(&self, event: GameEvent) {
        let _ = self.0.send(event);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting outsider");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // Exhibition pacing: keep the AI snappy regardless of configured
    // thinking delays.
    let params = config.to_params().with_ai_delays(
        Duration::from_millis(800),
        Duration::from_millis(600),
        Duration::from_millis(400),
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut sinks: Vec<Arc<dyn GameNotifier>> = vec![Arc::new(ChannelNotifier(event_tx))];
    if let Some(path) = &cli.transcript
        && let Some(log) = JsonlEventLog::new(path)
    {
        println!("Writing event transcript to {}", log.path().display());
        sinks.push(Arc::new(log));
    }

    let deps = RoundDeps {
        generator: Arc::new(CannedTextGenerator::new()),
        guesser: Arc::new(KeywordLocationGuesser::default()),
        statistics: Arc::new(InMemoryStatistics::new()),
        store: Arc::new(InMemoryRoundStore::new()),
        notifier: Arc::new(FanoutNotifier::new(sinks)),
    };

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let registry = RoundRegistry::new();
    let round_id = RoundId::generate();
    let handle = registry.create(
        round_id.clone(),
        params,
        config.locations(),
        Some(seed),
        deps,
    );

    // Seat the table.
    let mut humans = Vec::new();
    for i in 0..cli.humans.max(1) {
        let name = HUMAN_NAMES[i % HUMAN_NAMES.len()];
        let id = PlayerId::new(format!("human-{i}"));
        humans.push(id.clone());
        handle.add_player(Player::human(id, name)).await?;
    }
    let mut ai_names = config.ai_names();
    ai_names.shuffle(&mut rng);
    for i in 0..cli.ai.max(1) {
        let name = ai_names[i % ai_names.len()].clone();
        let personality = *Personality::ALL.choose(&mut rng).expect("non-empty");
        handle
            .add_player(Player::ai(PlayerId::new(format!("ai-{i}")), name, personality))
            .await?;
    }

    if !cli.quiet {
        println!();
        println!("+------------------------------------------------------------+");
        println!("|            outsider - exhibition round                     |");
        println!("+------------------------------------------------------------+");
        println!();
        println!("Seats: {} humans, {} AI (seed {seed})", cli.humans.max(1), cli.ai.max(1));
        println!();
    }

    handle.start_round(None).await?;
    drive_round(&handle, &mut event_rx, &humans, &mut rng, cli.quiet).await;

    registry.remove(round_id.as_str());
    Ok(())
}

/// Plays the human seats from the script, reacting to round events
/// until the round ends.
async fn drive_round(
    handle: &RoundHandle,
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
    humans: &[PlayerId],
    rng: &mut ChaCha8Rng,
    quiet: bool,
) {
    let mut exchanges = 0usize;
    let mut voting_requested = false;

    while let Some(event) = events.recv().await {
        match &event {
            GameEvent::RoundStarted(e) => {
                if !quiet {
                    println!("Round started. The location (hidden from the outsider): {}", e.location);
                }
            }
            GameEvent::TurnStarted(e) => {
                if humans.contains(&e.asker) {
                    // Look up the engine-chosen target for this turn.
                    if let Ok(snapshot) = handle.snapshot().await
                        && let Some(target) = snapshot.current_target
                    {
                        let question = SCRIPTED_QUESTIONS[exchanges % SCRIPTED_QUESTIONS.len()];
                        if let Err(err) = handle
                            .ask_question(e.asker.clone(), target, question)
                            .await
                        {
                            debug!(%err, "scripted question rejected");
                        }
                    }
                }
            }
            GameEvent::QuestionAsked(e) => {
                if !quiet {
                    println!("  {} asks {}: {}", e.asker_name, e.target_name, e.question);
                }
                if humans.contains(&e.target) {
                    let answer = SCRIPTED_ANSWERS[exchanges % SCRIPTED_ANSWERS.len()];
                    if let Err(err) = handle.submit_answer(e.target.clone(), answer).await {
                        debug!(%err, "scripted answer rejected");
                    }
                }
            }
            GameEvent::AnswerGiven(e) => {
                if !quiet {
                    println!("  {} answers: {}", e.target_name, e.answer);
                }
                exchanges += 1;
            }
            GameEvent::QuestionCountUpdate(e) => {
                if e.can_vote && !voting_requested {
                    voting_requested = true;
                    let requester = humans[0].clone();
                    if let Err(err) = handle.request_voting(requester).await {
                        debug!(%err, "voting request rejected");
                        voting_requested = false;
                    }
                }
            }
            GameEvent::LocationGuessMade(e) => {
                if !quiet {
                    println!("  >> {}", e.message);
                }
            }
            GameEvent::VotingStarted(e) => {
                if !quiet {
                    println!("Voting begins with {} players.", e.players.len());
                }
                // Each human votes for a random other active player.
                for voter in humans {
                    let candidates: Vec<PlayerId> = e
                        .players
                        .iter()
                        .map(|p| p.id.clone())
                        .filter(|id| id != voter)
                        .collect();
                    if let Some(target) = candidates.choose(rng)
                        && let Err(err) = handle
                            .cast_vote(voter.clone(), Ballot::For(target.clone()))
                            .await
                    {
                        debug!(%err, "scripted vote rejected");
                    }
                }
            }
            GameEvent::VotingResolved(e) => {
                if !quiet {
                    println!("  {}", e.message);
                }
                if e.continues {
                    voting_requested = false;
                }
            }
            GameEvent::RoundEnded(e) => {
                if !quiet {
                    println!();
                    println!("{}", e.reason);
                    println!("Winner: {}", e.winner);
                    println!("The location was: {}", e.location);
                    println!(
                        "Score so far - humans {}, AI {}",
                        e.tally.human_wins, e.tally.ai_wins
                    );
                }
                handle.shutdown();
                return;
            }
            _ => {}
        }
    }
}
