//! `localStorage`-backed key-value store.

use picto_core::{KeyValueStore, StoreError};
use web_sys::Storage;

/// The browser's `localStorage`, or nothing when the page may not use it
/// (private mode, sandboxed iframe). Without storage, reads find nothing
/// and writes fail.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; saved scenes are disabled");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let Some(storage) = &self.storage else {
            return Err(StoreError::Write("localStorage unavailable".into()));
        };
        storage
            .set_item(key, value)
            .map_err(|err| StoreError::Write(format!("{err:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let Some(storage) = &self.storage else {
            return Err(StoreError::Write("localStorage unavailable".into()));
        };
        storage.remove_item(key).map_err(|err| {
            log::warn!("localStorage removal of '{key}' failed: {err:?}");
            StoreError::Write(format!("{err:?}"))
        })
    }

    fn keys(&self) -> Vec<String> {
        let Some(storage) = &self.storage else {
            return Vec::new();
        };
        let len = storage.length().unwrap_or(0);
        (0..len)
            .filter_map(|i| storage.key(i).ok().flatten())
            .collect()
    }
}
