//! Best score across sessions
//!
//! Persisted under `highScore` as a plain JSON integer.

use crate::persistence::{KeyValueStore, keys, load_json, save_json};

/// Best score ever recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// Load from the store, 0 when missing or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best = load_json::<u32>(store, keys::HIGH_SCORE).unwrap_or(0);
        log::info!("High score: {}", best);
        Self { best }
    }

    /// Record a score; returns true (and persists) only when it beats the best.
    /// A failed write keeps the in-memory value.
    pub fn submit(&mut self, score: u32, store: &mut dyn KeyValueStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        save_json(store, keys::HIGH_SCORE, &self.best);
        true
    }
}
