//! Browser LocalStorage backend

use super::{KeyValueStore, StoreError};

/// Keys are namespaced so several games can share an origin
pub struct LocalStorageStore {
    storage: web_sys::Storage,
    prefix: String,
}

impl LocalStorageStore {
    pub fn open(prefix: &str) -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".into()))?;
        Ok(Self {
            storage,
            prefix: prefix.to_string(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(&self.full_key(key))
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(&self.full_key(key), value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}
