//! Persistence adapter: named scene snapshots in a host key-value store.
//!
//! The host supplies the store (browser `localStorage`, a file, memory).
//! Saved scenes live under a namespace prefix; foreign keys sharing the
//! store are ignored.

use crate::model::SceneSnapshot;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while saving or loading a named scene.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Scene names must contain something other than whitespace.
    #[error("scene name is empty")]
    EmptyName,

    /// No saved scene under this name.
    #[error("no saved scene named '{0}'")]
    Missing(String),

    /// The stored record is not a valid scene snapshot.
    #[error("saved scene '{name}' is corrupt: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be encoded.
    #[error("failed to encode scene: {0}")]
    Encode(#[from] serde_json::Error),

    /// The host store refused a write or removal (quota, permissions, ...).
    #[error("store write failed: {0}")]
    Write(String),
}

/// Minimal string key → string value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every key currently in the store, including foreign ones.
    fn keys(&self) -> Vec<String>;
}

/// In-memory store for tests and native hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Named scene snapshots stored under `namespace + name`.
pub struct SceneLibrary<S> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> SceneLibrary<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Store key for `name`. Names are trimmed, so every operation agrees
    /// on which record a padded name refers to.
    fn key(&self, name: &str) -> String {
        format!("{}{}", self.namespace, name.trim())
    }

    /// Save `snapshot` under `name` (trimmed), replacing any previous record.
    pub fn save(&mut self, name: &str, snapshot: &SceneSnapshot) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let json = serde_json::to_string(snapshot)?;
        let key = self.key(name);
        self.store.set(&key, &json)?;
        log::info!(
            "saved scene '{name}' ({} nodes, {} connections)",
            snapshot.nodes.len(),
            snapshot.connections.len()
        );
        Ok(())
    }

    /// Names of every saved scene in this namespace, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.namespace).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Read and decode the scene saved under `name`.
    pub fn load(&self, name: &str) -> Result<SceneSnapshot, StoreError> {
        let raw = self
            .store
            .get(&self.key(name))
            .ok_or_else(|| StoreError::Missing(name.to_string()))?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            name: name.to_string(),
            source,
        })
    }

    pub fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let key = self.key(name);
        self.store.remove(&key)?;
        log::info!("deleted saved scene '{}'", name.trim());
        Ok(())
    }
}
