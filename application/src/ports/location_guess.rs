//! Location guess port.
//!
//! The outsider's only way to win outright: deduce the secret location
//! from the conversation. The heuristic behind this port is external;
//! the core only compares its output against the secret.

use crate::ports::text_generation::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One completed question/answer pair from the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Input to a guess attempt.
#[derive(Debug, Clone)]
pub struct GuessRequest {
    /// Conversation so far, oldest first.
    pub qa_pairs: Vec<QaPair>,
    /// The location set the outsider knows the secret was drawn from.
    pub candidate_locations: Vec<String>,
    /// Completed exchanges so far; heuristics get more aggressive as
    /// this grows.
    pub questions_asked: u32,
}

/// A guess, or a decline to guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGuess {
    pub location: Option<String>,
    pub confidence: f64,
}

impl LocationGuess {
    pub fn none() -> Self {
        Self {
            location: None,
            confidence: 0.0,
        }
    }

    pub fn new(location: impl Into<String>, confidence: f64) -> Self {
        Self {
            location: Some(location.into()),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Gateway to the location-guess heuristic.
#[async_trait]
pub trait LocationGuesser: Send + Sync {
    async fn guess(&self, request: GuessRequest) -> Result<LocationGuess, GenerationError>;
}
