//! Read access to the farmer's persisted activity log.

use crate::{ActivityRecord, StoreError};
use async_trait::async_trait;
use std::{collections::HashMap, path::PathBuf, sync::Mutex};

/// Key the activity log is stored under, as a JSON array.
pub const ACTIVITY_LOGS_KEY: &str = "activityLogs";

/// A string key-value store in the shape of browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON file holding one object of `key -> string` entries. A missing file
/// is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_entries(&self) -> Result<HashMap<String, String>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: self.path.display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        let raw = serde_json::to_string_pretty(&entries).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

/// Source of the activity history the chat prompt draws on.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// All stored records, oldest first.
    async fn load_activities(&self) -> Result<Vec<ActivityRecord>, StoreError>;
}

/// Reads the JSON array stored under [`ACTIVITY_LOGS_KEY`].
#[derive(Debug)]
pub struct KeyValueActivityStore<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueActivityStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Append `record` to the stored log.
    pub async fn append(&self, record: ActivityRecord) -> Result<(), StoreError> {
        let mut records = self.load_activities().await?;
        records.push(record);
        let raw = serde_json::to_string(&records).map_err(|source| StoreError::Corrupt {
            key: ACTIVITY_LOGS_KEY.to_string(),
            source,
        })?;
        self.store.set(ACTIVITY_LOGS_KEY, raw).await
    }
}

#[async_trait]
impl<S: KeyValueStore> ActivityStore for KeyValueActivityStore<S> {
    async fn load_activities(&self) -> Result<Vec<ActivityRecord>, StoreError> {
        let Some(raw) = self.store.get(ACTIVITY_LOGS_KEY).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: ACTIVITY_LOGS_KEY.to_string(),
            source,
        })
    }
}

/// An activity store that never has anything in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActivityStore;

#[async_trait]
impl ActivityStore for NoActivityStore {
    async fn load_activities(&self) -> Result<Vec<ActivityRecord>, StoreError> {
        Ok(Vec::new())
    }
}
