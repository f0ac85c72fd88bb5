//! Keyword-scan location guesser.
//!
//! A deterministic stand-in for the language-model guess heuristic:
//! scans the conversation for candidate-location words and guesses when
//! the evidence clears a confidence bar. Once the forced-guess
//! threshold is reached it always commits to its best candidate, so a
//! cornered outsider takes its shot rather than stalling.

use async_trait::async_trait;
use outsider_application::ports::location_guess::{
    GuessRequest, LocationGuess, LocationGuesser,
};
use outsider_application::ports::text_generation::GenerationError;

/// Confidence assigned to a verbatim location mention.
const DIRECT_MENTION_CONFIDENCE: f64 = 0.9;
/// Confidence assigned to a forced best-effort guess.
const FORCED_GUESS_CONFIDENCE: f64 = 0.35;

pub struct KeywordLocationGuesser {
    /// Minimum confidence before volunteering a guess.
    confidence_threshold: f64,
    /// Question count after which a guess is always made.
    forced_threshold: u32,
}

impl Default for KeywordLocationGuesser {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            forced_threshold: 3,
        }
    }
}

impl KeywordLocationGuesser {
    pub fn new(confidence_threshold: f64, forced_threshold: u32) -> Self {
        Self {
            confidence_threshold,
            forced_threshold,
        }
    }

    /// Fraction of a candidate's words that appear in the conversation.
    fn overlap_score(candidate: &str, conversation: &str) -> f64 {
        let words: Vec<String> = candidate
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() {
            return 0.0;
        }
        let hits = words.iter().filter(|w| conversation.contains(*w)).count();
        hits as f64 / words.len() as f64
    }
}

#[async_trait]
impl LocationGuesser for KeywordLocationGuesser {
    async fn guess(&self, request: GuessRequest) -> Result<LocationGuess, GenerationError> {
        let conversation = request
            .qa_pairs
            .iter()
            .flat_map(|qa| [qa.question.as_str(), qa.answer.as_str()])
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let mut best: Option<(&String, f64)> = None;
        for candidate in &request.candidate_locations {
            let score = if conversation.contains(&candidate.to_lowercase()) {
                DIRECT_MENTION_CONFIDENCE
            } else {
                Self::overlap_score(candidate, &conversation)
                    * DIRECT_MENTION_CONFIDENCE
            };
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((candidate, score));
            }
        }

        let Some((candidate, score)) = best else {
            return Ok(LocationGuess::none());
        };

        if score >= self.confidence_threshold {
            return Ok(LocationGuess::new(candidate.clone(), score));
        }
        if request.questions_asked >= self.forced_threshold {
            // Out of patience: commit to the best candidate, weak as it is.
            let pick = if score > 0.0 {
                candidate.clone()
            } else {
                let idx = request.qa_pairs.len() % request.candidate_locations.len();
                request.candidate_locations[idx].clone()
            };
            return Ok(LocationGuess::new(pick, FORCED_GUESS_CONFIDENCE));
        }
        Ok(LocationGuess {
            location: None,
            confidence: score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outsider_application::ports::location_guess::QaPair;

    fn request(pairs: &[(&str, &str)], questions_asked: u32) -> GuessRequest {
        GuessRequest {
            qa_pairs: pairs
                .iter()
                .map(|(q, a)| QaPair {
                    question: q.to_string(),
                    answer: a.to_string(),
                })
                .collect(),
            candidate_locations: vec![
                "Beach".to_string(),
                "Police Station".to_string(),
                "Museum".to_string(),
            ],
            questions_asked,
        }
    }

    #[tokio::test]
    async fn test_direct_mention_is_guessed_immediately() {
        let guesser = KeywordLocationGuesser::default();
        let guess = guesser
            .guess(request(
                &[("What do you hear?", "Mostly waves, it is a beach after all.")],
                1,
            ))
            .await
            .unwrap();
        assert_eq!(guess.location.as_deref(), Some("Beach"));
        assert!(guess.confidence >= 0.6);
    }

    #[tokio::test]
    async fn test_weak_evidence_stays_quiet_before_the_threshold() {
        let guesser = KeywordLocationGuesser::default();
        let guess = guesser
            .guess(request(&[("Anything odd?", "Not really.")], 2))
            .await
            .unwrap();
        assert!(guess.location.is_none());
    }

    #[tokio::test]
    async fn test_forced_guess_after_the_threshold() {
        let guesser = KeywordLocationGuesser::default();
        let guess = guesser
            .guess(request(&[("Anything odd?", "Not really.")], 3))
            .await
            .unwrap();
        assert!(guess.location.is_some());
        assert!(guess.confidence < 0.6);
    }

    #[tokio::test]
    async fn test_partial_overlap_feeds_the_forced_pick() {
        let guesser = KeywordLocationGuesser::default();
        let guess = guesser
            .guess(request(
                &[("Who works here?", "Officers at the station, mostly.")],
                4,
            ))
            .await
            .unwrap();
        assert_eq!(guess.location.as_deref(), Some("Police Station"));
    }
}
