//! # Storage Backends
//!
//! Opaque key/value storage that the stores persist into.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key                    value (JSON)                                    │
//! │  ─────────────────────  ─────────────────────────────────────────────   │
//! │  pharmacy-locations     [Pharmacy, ...]       ordered                   │
//! │  active-pharmacy        Pharmacy              absent when none          │
//! │  pharmacy-products      [Product, ...]        ordered                   │
//! │  pharmacy-sales         [Sale, ...]           append-only               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backends
//! - [`MemoryStorage`] - HashMap, for tests and sessions without a disk
//! - [`SqliteStorage`] - `kv_store` table in SQLite
//! - [`UnavailableStorage`] - every call fails; stores run in memory only

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::{DbConfig, SqliteStorage};

// =============================================================================
// Keys
// =============================================================================

pub const PHARMACIES_KEY: &str = "pharmacy-locations";
pub const ACTIVE_PHARMACY_KEY: &str = "active-pharmacy";
pub const PRODUCTS_KEY: &str = "pharmacy-products";
pub const SALES_KEY: &str = "pharmacy-sales";

// =============================================================================
// Storage Trait
// =============================================================================

/// Key/value storage injected into every store.
///
/// Each `save` replaces the whole value under `key`; a store never writes
/// part of a collection.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Value under `key`, or `None` if it was never written (or was removed).
    async fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

// =============================================================================
// Unavailable Storage
// =============================================================================

/// Storage for a context with no durable storage at all.
#[derive(Debug, Default, Clone)]
pub struct UnavailableStorage;

#[async_trait]
impl Storage for UnavailableStorage {
    async fn load(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("no durable storage".to_string()))
    }

    async fn save(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("no durable storage".to_string()))
    }

    async fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("no durable storage".to_string()))
    }
}
