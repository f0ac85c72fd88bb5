//! Text generation port.
//!
//! Defines the interface to the external capability that writes AI
//! questions and answers. The round runtime wraps every call in a
//! timeout and falls back to canned text on any failure, so a flaky
//! backend can never end a round.

use async_trait::async_trait;
use outsider_domain::Personality;
use thiserror::Error;

/// Errors that can occur during generation calls
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("generation request failed: {0}")]
    RequestFailed(String),

    #[error("generation timed out")]
    Timeout,
}

/// Everything the generator needs to write a question.
#[derive(Debug, Clone)]
pub struct QuestionPrompt {
    /// Display name of the player being asked.
    pub target_name: String,
    /// Whether the asking AI is the outsider (it then probes for the
    /// location without revealing its ignorance).
    pub is_outsider: bool,
    /// The secret location, for an asker who knows it.
    pub location_hint: Option<String>,
    /// Recent questions, so the generator avoids repeating them.
    pub previous_questions: Vec<String>,
    pub personality: Option<Personality>,
}

/// Everything the generator needs to write an answer.
#[derive(Debug, Clone)]
pub struct AnswerPrompt {
    pub question: String,
    /// Display name of the player who asked.
    pub asker_name: String,
    /// An outsider answers vaguely-but-confidently; an insider answers
    /// from knowledge of the location.
    pub is_outsider: bool,
    /// The secret location, `None` for the outsider.
    pub location: Option<String>,
    pub personality: Option<Personality>,
    /// Completed Q/A lines for conversational context.
    pub previous_context: Vec<String>,
}

/// Gateway to the question/answer writing capability.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_question(&self, prompt: QuestionPrompt) -> Result<String, GenerationError>;

    async fn generate_answer(&self, prompt: AnswerPrompt) -> Result<String, GenerationError>;
}
