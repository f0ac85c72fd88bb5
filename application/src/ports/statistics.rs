//! Statistics port.

use async_trait::async_trait;
use outsider_domain::Winner;
use serde::{Deserialize, Serialize};

/// Running score across rounds. Survives round resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTally {
    pub human_wins: u64,
    pub ai_wins: u64,
}

/// Sink for finished-round results.
#[async_trait]
pub trait StatisticsSink: Send + Sync {
    async fn record_win(&self, winner: Winner);

    async fn tally(&self) -> WinTally;
}
