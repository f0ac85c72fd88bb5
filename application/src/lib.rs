//! Application layer for outsider
//!
//! This crate contains the round coordinator, port definitions, and
//! game parameters. It depends only on the domain layer.
//!
//! The coordinator is split in two:
//!
//! - [`RoundSession`] — the synchronous state machine: validates every
//!   action and returns the follow-up effects
//! - [`RoundRuntime`] — the per-round actor that owns a session,
//!   schedules AI work with timeouts and fallbacks, and runs the
//!   inactivity watchdog

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::GameParams;
pub use ports::{
    location_guess::{GuessRequest, LocationGuess, LocationGuesser, QaPair},
    notifier::{FanoutNotifier, GameEvent, GameNotifier, NoNotifier},
    round_store::{PlayerView, RoundSnapshot, RoundStore, StoreError},
    statistics::{StatisticsSink, WinTally},
    text_generation::{AnswerPrompt, GenerationError, QuestionPrompt, TextGenerator},
};
pub use registry::RoundRegistry;
pub use use_cases::round_runtime::{RoundDeps, RoundHandle, RoundHandleError, RoundRuntime};
pub use use_cases::round_session::{Effect, RoundSession};
