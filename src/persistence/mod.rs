//! Key/value preference storage
//!
//! Only UI/settings preferences and the high-score table go through here;
//! simulation state is never persisted. Values are JSON encoded and stored
//! under namespaced keys (`sp_<key>`).

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

/// Prefix applied to every key
pub const KEY_PREFIX: &str = "sp_";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("failed to encode/decode value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Raw string storage backend
pub trait KeyValueStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Namespaced storage key
pub fn storage_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// Decode a stored value, falling back to `default` on absence or failure
pub fn load<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match try_load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            log::warn!("Failed to load '{key}': {err}");
            default
        }
    }
}

/// Decode a stored value, surfacing errors
pub fn try_load<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.load_raw(&storage_key(key))? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and store a value
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.save_raw(&storage_key(key), &json)
}

/// In-memory store (native runs and tests)
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
    fn load_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
