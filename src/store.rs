//! Persistent preference store.
//!
//! A small fjall keyspace holding postcard-encoded entries for the unit
//! preference, the recent-city list, and the last displayed location. Reads
//! return `Result` so the caller decides the fallback value; writes are
//! best-effort and report success as a flag. Storage is never load-bearing:
//! a refresh cycle works identically with no store at all.

use std::path::Path;

use fjall::Keyspace;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::task;
use tracing::warn;

use crate::models::{StoredLocation, UnitPreference};

const KEY_UNIT: &str = "unit";
const KEY_RECENT_CITIES: &str = "recent_cities";
const KEY_LAST_LOCATION: &str = "last_location";

/// Preference storage errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("failed to open preference store: {message}")]
    Open { message: String },

    #[error("corrupt entry for key \"{key}\"")]
    Corrupt { key: String },

    #[error("storage backend error: {message}")]
    Backend { message: String },
}

impl StorageError {
    fn backend<E: std::fmt::Display>(error: E) -> Self {
        Self::Backend {
            message: error.to_string(),
        }
    }
}

pub struct PreferenceStore {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>, StorageError> {
    Ok(store
        .get(key)
        .map_err(StorageError::backend)?
        .map(|v| v.to_vec()))
}

impl PreferenceStore {
    /// Open (or create) the store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = fjall::Database::builder(&path)
            .open()
            .map_err(|e| StorageError::Open {
                message: e.to_string(),
            })?;
        let items = db
            .keyspace("prefs", fjall::KeyspaceCreateOptions::default)
            .map_err(|e| StorageError::Open {
                message: e.to_string(),
            })?;
        Ok(PreferenceStore { store: items })
    }

    async fn load<T: DeserializeOwned + Send + 'static>(
        &self,
        key: &'static str,
    ) -> Result<Option<T>, StorageError> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(StorageError::backend)??;

        match maybe_bytes {
            Some(bytes) => postcard::from_bytes(&bytes)
                .map(Some)
                .map_err(|_| StorageError::Corrupt {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Store a value, reporting success. Failures are logged and swallowed.
    async fn save<T: Serialize>(&self, key: &'static str, value: &T) -> bool {
        let bytes = match postcard::to_stdvec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("failed to encode preference \"{key}\": {e}");
                return false;
            }
        };

        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();
        let result = task::spawn_blocking(move || store.insert(key_bytes, bytes)).await;
        match result {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!("failed to write preference \"{key}\": {e}");
                false
            }
            Err(e) => {
                warn!("preference write task failed for \"{key}\": {e}");
                false
            }
        }
    }

    pub async fn load_unit(&self) -> Result<Option<UnitPreference>, StorageError> {
        self.load(KEY_UNIT).await
    }

    pub async fn save_unit(&self, unit: UnitPreference) -> bool {
        self.save(KEY_UNIT, &unit).await
    }

    pub async fn load_recent_cities(&self) -> Result<Option<Vec<String>>, StorageError> {
        self.load(KEY_RECENT_CITIES).await
    }

    pub async fn save_recent_cities(&self, cities: &[String]) -> bool {
        self.save(KEY_RECENT_CITIES, &cities.to_vec()).await
    }

    pub async fn load_last_location(&self) -> Result<Option<StoredLocation>, StorageError> {
        self.load(KEY_LAST_LOCATION).await
    }

    pub async fn save_last_location(&self, location: &StoredLocation) -> bool {
        self.save(KEY_LAST_LOCATION, location).await
    }
}
