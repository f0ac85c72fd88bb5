//! Player subdomain: the participants of a round and their registry.

pub mod entities;
pub mod personality;

pub use entities::{Player, Roster};
pub use personality::Personality;
