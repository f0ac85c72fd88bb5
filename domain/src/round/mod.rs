//! Round subdomain: the per-round state machine and turn engine.

pub mod entities;
pub mod turn;

pub use entities::{Round, RoundPhase, Winner};
pub use turn::{TurnOrder, pick_target};
