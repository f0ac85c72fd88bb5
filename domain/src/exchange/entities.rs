//! Exchanges and the round transcript.

use crate::core::ids::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One question-and-answer pair between an asker and a target (Entity).
///
/// Created when the question is asked; completed when the target
/// answers. Immutable once completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub asker: PlayerId,
    pub target: PlayerId,
    pub question: String,
    pub answer: Option<String>,
    pub asked_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl Exchange {
    pub fn new(asker: PlayerId, target: PlayerId, question: impl Into<String>) -> Self {
        Self {
            asker,
            target,
            question: question.into(),
            answer: None,
            asked_at: Utc::now(),
            answered_at: None,
        }
    }

    pub fn complete(&mut self, answer: impl Into<String>) {
        self.answer = Some(answer.into());
        self.answered_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.answer.is_some()
    }
}

/// A line in the shared round transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TranscriptEntry {
    Exchange(Exchange),
    /// Announcements such as anonymous location guesses and vote results.
    System(String),
}

/// Append-only message log for one round.
///
/// Read by the location-guess heuristic and by prompt assembly for AI
/// responders; never mutated by readers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn push_exchange(&mut self, exchange: Exchange) {
        self.entries.push(TranscriptEntry::Exchange(exchange));
    }

    pub fn push_system(&mut self, message: impl Into<String>) {
        self.entries.push(TranscriptEntry::System(message.into()));
    }

    /// Whether a question is still waiting for its answer.
    pub fn has_open_exchange(&self) -> bool {
        matches!(
            self.entries.last(),
            Some(TranscriptEntry::Exchange(ex)) if !ex.is_complete()
        )
    }

    /// The exchange waiting for its answer, if any.
    pub fn open_exchange_mut(&mut self) -> Option<&mut Exchange> {
        match self.entries.last_mut() {
            Some(TranscriptEntry::Exchange(ex)) if !ex.is_complete() => Some(ex),
            _ => None,
        }
    }

    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.entries.iter().filter_map(|e| match e {
            TranscriptEntry::Exchange(ex) => Some(ex),
            TranscriptEntry::System(_) => None,
        })
    }

    /// Completed question/answer pairs, oldest first.
    pub fn completed_pairs(&self) -> Vec<(String, String)> {
        self.exchanges()
            .filter_map(|ex| {
                ex.answer
                    .as_ref()
                    .map(|a| (ex.question.clone(), a.clone()))
            })
            .collect()
    }

    /// The most recent `limit` questions, for prompt assembly.
    pub fn recent_questions(&self, limit: usize) -> Vec<String> {
        let questions: Vec<String> = self.exchanges().map(|ex| ex.question.clone()).collect();
        let skip = questions.len().saturating_sub(limit);
        questions.into_iter().skip(skip).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
