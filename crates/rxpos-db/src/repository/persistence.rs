//! # Persist-on-Change
//!
//! Shared load/save plumbing for the stores, including degrade mode.
//!
//! ## Degrade Mode
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load_list(key)                                                         │
//! │   ├── Ok(Some(json)) ──► array? ──► decode each record                  │
//! │   │                    │            └─ bad record: warn!, skip it       │
//! │   │                    └─ not an array: warn!, DEGRADED, use defaults   │
//! │   ├── Ok(None) ────────► use defaults                                   │
//! │   └── Err(storage) ────► warn!, DEGRADED, use defaults                  │
//! │                                                                         │
//! │  save(key, value)                                                       │
//! │   ├── DEGRADED ────────► skip (in-memory only for this session)         │
//! │   └── Err(storage) ────► warn!, DEGRADED                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A degraded store keeps serving from memory; nothing is surfaced to the
//! caller. A document that cannot be read is never overwritten.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::storage::Storage;

pub(crate) struct Persistence {
    storage: Arc<dyn Storage>,
    store: &'static str,
    degraded: AtomicBool,
}

impl Persistence {
    pub(crate) fn new(storage: Arc<dyn Storage>, store: &'static str) -> Self {
        Persistence {
            storage,
            store,
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether this store has stopped writing to durable storage.
    pub(crate) fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Decoded value under `key`; `None` when absent, undecodable or unreadable.
    pub(crate) async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.load_text(key).await?;

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    store = self.store,
                    key,
                    error = %err,
                    "Stored value could not be decoded, using defaults"
                );
                None
            }
        }
    }

    /// Decoded records of the list under `key`, skipping any that fail to decode.
    ///
    /// `None` when absent or unreadable. A document that is not a JSON array
    /// degrades the store so the next write cannot replace it.
    pub(crate) async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let text = self.load_text(key).await?;

        let records = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                let err = StorageError::Serialization("stored list is not an array".to_string());
                self.degrade(key, &err);
                return None;
            }
            Err(err) => {
                self.degrade(key, &StorageError::from(err));
                return None;
            }
        };

        let total = records.len();
        let decoded: Vec<T> = records
            .into_iter()
            .enumerate()
            .filter_map(|(ordinal, record)| match serde_json::from_value(record) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(
                        store = self.store,
                        key,
                        ordinal,
                        error = %err,
                        "Stored record could not be decoded, skipping it"
                    );
                    None
                }
            })
            .collect();

        if decoded.len() < total {
            warn!(
                store = self.store,
                key,
                kept = decoded.len(),
                skipped = total - decoded.len(),
                "Loaded stored list with undecodable records"
            );
        }

        Some(decoded)
    }

    async fn load_text(&self, key: &str) -> Option<String> {
        if self.is_degraded() {
            return None;
        }

        match self.storage.load(key).await {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                debug!(store = self.store, key, "No stored value, using defaults");
                None
            }
            Err(err) => {
                self.degrade(key, &err);
                None
            }
        }
    }

    /// Writes the whole of `value` under `key`.
    pub(crate) async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if self.is_degraded() {
            return;
        }

        if let Err(err) = self.try_save(key, value).await {
            self.degrade(key, &err);
        }
    }

    /// Removes `key`.
    pub(crate) async fn remove(&self, key: &str) {
        if self.is_degraded() {
            return;
        }

        if let Err(err) = self.storage.remove(key).await {
            self.degrade(key, &err);
        }
    }

    async fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string(value)?;
        self.storage.save(key, &json).await?;
        debug!(store = self.store, key, bytes = json.len(), "Persisted");
        Ok(())
    }

    fn degrade(&self, key: &str, err: &StorageError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            warn!(
                store = self.store,
                key,
                error = %err,
                "Durable storage unavailable, continuing in memory only"
            );
        }
    }
}
