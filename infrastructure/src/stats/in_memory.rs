//! In-memory win counters.

use async_trait::async_trait;
use outsider_application::ports::statistics::{StatisticsSink, WinTally};
use outsider_domain::Winner;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local statistics sink. Counters survive round resets but not
/// the process.
#[derive(Debug, Default)]
pub struct InMemoryStatistics {
    human_wins: AtomicU64,
    ai_wins: AtomicU64,
}

impl InMemoryStatistics {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatisticsSink for InMemoryStatistics {
    async fn record_win(&self, winner: Winner) {
        match winner {
            Winner::Humans => self.human_wins.fetch_add(1, Ordering::SeqCst),
            Winner::Ai => self.ai_wins.fetch_add(1, Ordering::SeqCst),
        };
    }

    async fn tally(&self) -> WinTally {
        WinTally {
            human_wins: self.human_wins.load(Ordering::SeqCst),
            ai_wins: self.ai_wins.load(Ordering::SeqCst),
        }
    }
}
