//! Key-value persistence
//!
//! The game only ever needs `get`/`set` of small JSON strings, so storage is
//! an opaque [`KeyValueStore`]. Backends:
//! - [`MemoryStore`]: tests and the native demo
//! - [`FileStore`]: one JSON object on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Every write is best-effort. Callers go through [`load_json`] and
//! [`save_json`], which log failures and never propagate them into the tick.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage keys
pub mod keys {
    pub const HIGH_SCORE: &str = "highScore";
    pub const UNLOCKED_COSMETICS: &str = "unlockedCosmetics";
    pub const SETTINGS: &str = "settings";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Opaque string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and decode a value. Missing, unreadable or malformed entries give `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring malformed '{}' in storage: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read '{}': {}", key, e);
            None
        }
    }
}

/// Encode and write a value. Returns whether the write succeeded.
pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(StoreError::from)
        .and_then(|json| store.set(key, &json));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to persist '{}': {}", key, e);
            false
        }
    }
}

/// Store double whose reads and writes always fail
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    pub writes_attempted: usize,
}

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("read refused".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        self.writes_attempted += 1;
        Err(StoreError::Unavailable("write refused".into()))
    }
}
