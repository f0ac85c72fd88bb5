//! In-memory round store.

use async_trait::async_trait;
use outsider_application::ports::round_store::{RoundSnapshot, RoundStore, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Keeps the latest snapshot per round id in process memory. Useful as
/// the default store and in tests; a database adapter would replace it
/// in a deployment that needs durability.
#[derive(Debug, Default)]
pub struct InMemoryRoundStore {
    rounds: Mutex<HashMap<String, RoundSnapshot>>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rounds.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RoundStore for InMemoryRoundStore {
    async fn save(&self, snapshot: &RoundSnapshot) -> Result<(), StoreError> {
        self.rounds
            .lock()
            .expect("store lock poisoned")
            .insert(snapshot.round_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn load(&self, round_id: &str) -> Result<Option<RoundSnapshot>, StoreError> {
        Ok(self
            .rounds
            .lock()
            .expect("store lock poisoned")
            .get(round_id)
            .cloned())
    }

    async fn delete(&self, round_id: &str) -> Result<(), StoreError> {
        self.rounds
            .lock()
            .expect("store lock poisoned")
            .remove(round_id);
        Ok(())
    }
}
