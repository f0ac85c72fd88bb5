//! Domain layer for outsider
//!
//! This crate contains the core game state and rules: the player
//! roster, the fixed-per-round turn order, question/answer exchanges,
//! and the voting machinery. It has no dependencies on infrastructure
//! or presentation concerns.
//!
//! # Core Concepts
//!
//! ## The Outsider
//!
//! Every round has one secret location known to all players except a
//! single **outsider** (always an AI player) who must avoid
//! detection across rounds of question/answer exchanges before a vote.
//!
//! ## Round lifecycle
//!
//! `waiting → playing → voting → finished`, with a `voting → playing`
//! rollback when a vote resolves without a winner (everyone passed, or
//! a tie left enough survivors).

pub mod core;
pub mod exchange;
pub mod player;
pub mod round;
pub mod vote;

// Re-export commonly used types
pub use crate::core::{
    catalog::{AI_NAMES, DEFAULT_LOCATIONS, default_locations},
    error::GameError,
    ids::{PlayerId, RoundId},
};
pub use exchange::{Exchange, Transcript, TranscriptEntry};
pub use player::{Player, Personality, Roster};
pub use round::{Round, RoundPhase, TurnOrder, Winner, pick_target};
pub use vote::{Ballot, VoteOutcome, VoteState, VoteTally, VotingSession, resolve};
