//! Vote subdomain: ballots, the voting session, and resolution rules.

pub mod ballot;
pub mod outcome;
pub mod session;
pub mod tally;

pub use ballot::Ballot;
pub use outcome::{VoteOutcome, resolve};
pub use session::{VoteState, VotingSession};
pub use tally::VoteTally;
