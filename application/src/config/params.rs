//! Game parameters — round control knobs.
//!
//! [`GameParams`] groups the static parameters that control a round:
//! question quota, input bounds, AI pacing, and timeouts. These are
//! application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round control parameters.
///
/// The question quota and the guess threshold are deliberately
/// independent knobs: the quota gates when voting may start, the
/// threshold gates when the outsider may start guessing the location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParams {
    /// Completed exchanges required before voting may be requested.
    pub question_quota: u32,
    /// Exchanges after which the outsider may attempt location guesses.
    pub guess_threshold: u32,
    /// Maximum question length in characters.
    pub max_question_len: usize,
    /// Maximum answer length in characters.
    pub max_answer_len: usize,
    /// Minimum active players to start a round.
    pub min_players: usize,
    /// Maximum players in a round.
    pub max_players: usize,
    /// Timeout for a single external generation or guess call.
    pub generation_timeout: Duration,
    /// Simulated thinking time before an AI asks.
    pub ai_question_delay: Duration,
    /// Simulated thinking time before an AI answers.
    pub ai_answer_delay: Duration,
    /// Simulated thinking time before an AI votes.
    pub ai_vote_delay: Duration,
    /// Voting phase deadline; `None` waits indefinitely.
    pub voting_timeout: Option<Duration>,
    /// Idle time before the round is defensively reset; a warning is
    /// emitted one minute earlier. `None` disables the watchdog.
    pub inactivity_timeout: Option<Duration>,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            question_quota: 5,
            guess_threshold: 3,
            max_question_len: 200,
            max_answer_len: 300,
            min_players: 2,
            max_players: 8,
            generation_timeout: Duration::from_secs(15),
            ai_question_delay: Duration::from_secs(4),
            ai_answer_delay: Duration::from_secs(3),
            ai_vote_delay: Duration::from_secs(2),
            voting_timeout: Some(Duration::from_secs(120)),
            inactivity_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl GameParams {
    // ==================== Builder Methods ====================

    pub fn with_question_quota(mut self, quota: u32) -> Self {
        self.question_quota = quota;
        self
    }

    pub fn with_guess_threshold(mut self, threshold: u32) -> Self {
        self.guess_threshold = threshold;
        self
    }

    pub fn with_input_limits(mut self, question: usize, answer: usize) -> Self {
        self.max_question_len = question;
        self.max_answer_len = answer;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_ai_delays(mut self, question: Duration, answer: Duration, vote: Duration) -> Self {
        self.ai_question_delay = question;
        self.ai_answer_delay = answer;
        self.ai_vote_delay = vote;
        self
    }

    /// Zero AI pacing, for tests and scripted exhibitions.
    pub fn without_ai_delays(self) -> Self {
        self.with_ai_delays(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_voting_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.voting_timeout = timeout;
        self
    }

    pub fn with_inactivity_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    /// When the inactivity warning should fire, if the watchdog is on.
    ///
    /// One minute before the reset, clamped to half the timeout for
    /// very short configurations.
    pub fn inactivity_warning_after(&self) -> Option<Duration> {
        let timeout = self.inactivity_timeout?;
        let lead = Duration::from_secs(60).min(timeout / 2);
        Some(timeout - lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = GameParams::default();
        assert_eq!(params.question_quota, 5);
        assert_eq!(params.guess_threshold, 3);
        assert_eq!(params.max_question_len, 200);
        assert_eq!(params.max_answer_len, 300);
        assert_eq!(params.min_players, 2);
        assert!(params.inactivity_timeout.is_some());
    }

    #[test]
    fn test_builder() {
        let params = GameParams::default()
            .with_question_quota(3)
            .with_input_limits(100, 150)
            .without_ai_delays();
        assert_eq!(params.question_quota, 3);
        assert_eq!(params.max_question_len, 100);
        assert_eq!(params.ai_vote_delay, Duration::ZERO);
    }

    #[test]
    fn test_warning_fires_a_minute_before_reset() {
        let params =
            GameParams::default().with_inactivity_timeout(Some(Duration::from_secs(120)));
        assert_eq!(
            params.inactivity_warning_after(),
            Some(Duration::from_secs(60))
        );

        // Short timeout: warning lead is clamped to half.
        let short = GameParams::default().with_inactivity_timeout(Some(Duration::from_secs(40)));
        assert_eq!(
            short.inactivity_warning_after(),
            Some(Duration::from_secs(20))
        );

        let off = GameParams::default().with_inactivity_timeout(None);
        assert_eq!(off.inactivity_warning_after(), None);
    }
}
