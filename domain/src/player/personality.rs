//! AI personality value object.

use serde::{Deserialize, Serialize};

/// Conversational flavor assigned to an AI player at creation.
///
/// Passed through to the text-generation capability so questions and
/// answers from different AI players don't all sound the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Curious,
    Analytical,
    Social,
    Cautious,
    Direct,
    Creative,
}

impl Personality {
    pub const ALL: [Personality; 6] = [
        Personality::Curious,
        Personality::Analytical,
        Personality::Social,
        Personality::Cautious,
        Personality::Direct,
        Personality::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Curious => "curious",
            Personality::Analytical => "analytical",
            Personality::Social => "social",
            Personality::Cautious => "cautious",
            Personality::Direct => "direct",
            Personality::Creative => "creative",
        }
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
