//! Exchange subdomain: question/answer pairs and the round transcript.

pub mod entities;

pub use entities::{Exchange, Transcript, TranscriptEntry};
