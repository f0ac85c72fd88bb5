//! Registry of active rounds.
//!
//! The process-wide map from round id to its running actor handle, with
//! an explicit lifecycle: create on start, drop on finish + reset.

use crate::config::GameParams;
use crate::use_cases::round_runtime::{RoundDeps, RoundHandle, RoundRuntime};
use crate::use_cases::round_session::RoundSession;
use outsider_domain::RoundId;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// Owns the handles of every live round.
#[derive(Default)]
pub struct RoundRegistry {
    rounds: Mutex<HashMap<String, RoundHandle>>,
}

impl RoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new round actor and registers its handle. An existing
    /// round under the same id is shut down first.
    pub fn create(
        &self,
        round_id: RoundId,
        params: GameParams,
        locations: Vec<String>,
        seed: Option<u64>,
        deps: RoundDeps,
    ) -> RoundHandle {
        let mut session = RoundSession::new(round_id.clone(), params).with_locations(locations);
        if let Some(seed) = seed {
            session = session.with_seed(seed);
        }
        let handle = RoundRuntime::spawn(session, deps);

        let mut rounds = self.rounds.lock().expect("registry lock poisoned");
        if let Some(previous) = rounds.insert(round_id.to_string(), handle.clone()) {
            info!(round = %round_id, "replacing existing round");
            previous.shutdown();
        }
        handle
    }

    pub fn get(&self, round_id: &str) -> Option<RoundHandle> {
        self.rounds
            .lock()
            .expect("registry lock poisoned")
            .get(round_id)
            .cloned()
    }

    /// Drops a finished round and stops its actor.
    pub fn remove(&self, round_id: &str) -> bool {
        let removed = self
            .rounds
            .lock()
            .expect("registry lock poisoned")
            .remove(round_id);
        if let Some(handle) = removed {
            handle.shutdown();
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.rounds.lock().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
