//! File-backed configuration schema.
//!
//! Maps the `[game]` and `[catalog]` tables of `outsider.toml` onto
//! [`GameParams`] and the location/name catalogs.

use outsider_application::GameParams;
use outsider_domain::{AI_NAMES, default_locations};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub game: GameSection,
    pub catalog: CatalogSection,
}

/// `[game]` — round control knobs. Every field is optional; unset
/// fields keep their built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSection {
    pub question_quota: Option<u32>,
    pub guess_threshold: Option<u32>,
    pub max_question_len: Option<usize>,
    pub max_answer_len: Option<usize>,
    pub min_players: Option<usize>,
    pub max_players: Option<usize>,
    pub generation_timeout_secs: Option<u64>,
    pub ai_question_delay_secs: Option<u64>,
    pub ai_answer_delay_secs: Option<u64>,
    pub ai_vote_delay_secs: Option<u64>,
    /// 0 disables the voting deadline.
    pub voting_timeout_secs: Option<u64>,
    /// 0 disables the inactivity watchdog.
    pub inactivity_timeout_secs: Option<u64>,
}

/// `[catalog]` — location and AI-name overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub locations: Vec<String>,
    pub ai_names: Vec<String>,
}

impl FileConfig {
    /// Resolves the file values over the built-in defaults.
    pub fn to_params(&self) -> GameParams {
        let mut params = GameParams::default();
        let game = &self.game;

        if let Some(quota) = game.question_quota {
            params.question_quota = quota;
        }
        if let Some(threshold) = game.guess_threshold {
            params.guess_threshold = threshold;
        }
        if let Some(len) = game.max_question_len {
            params.max_question_len = len;
        }
        if let Some(len) = game.max_answer_len {
            params.max_answer_len = len;
        }
        if let Some(min) = game.min_players {
            params.min_players = min;
        }
        if let Some(max) = game.max_players {
            params.max_players = max;
        }
        if let Some(secs) = game.generation_timeout_secs {
            params.generation_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = game.ai_question_delay_secs {
            params.ai_question_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = game.ai_answer_delay_secs {
            params.ai_answer_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = game.ai_vote_delay_secs {
            params.ai_vote_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = game.voting_timeout_secs {
            params.voting_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = game.inactivity_timeout_secs {
            params.inactivity_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        params
    }

    /// Configured locations, or the built-in catalog when none are set.
    pub fn locations(&self) -> Vec<String> {
        if self.catalog.locations.is_empty() {
            default_locations()
        } else {
            self.catalog.locations.clone()
        }
    }

    /// Configured AI names, or the built-in list when none are set.
    pub fn ai_names(&self) -> Vec<String> {
        if self.catalog.ai_names.is_empty() {
            AI_NAMES.iter().map(|s| s.to_string()).collect()
        } else {
            self.catalog.ai_names.clone()
        }
    }
}
