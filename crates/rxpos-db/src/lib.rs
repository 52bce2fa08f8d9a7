//! # rxpos-db: Storage Layer for RxPOS
//!
//! Key/value storage backends and the pharmacy, product and sale stores
//! that persist into them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RxPOS Data Flow                                  │
//! │                                                                         │
//! │  rxpos-app command (checkout, import_products, ...)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     rxpos-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Stores     │    │    Storage    │    │  Migrations  │  │   │
//! │  │   │ (repository)  │    │   (trait)     │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ PharmacyStore │───►│ MemoryStorage │    │ 001_kv_store │  │   │
//! │  │   │ ProductStore  │    │ SqliteStorage │───►│              │  │   │
//! │  │   │ SaleStore     │    │ Unavailable   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite file (platform data dir) or nothing (in-memory session) │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - `Storage` trait, backends, key layout
//! - [`repository`] - The three stores
//! - [`migrations`] - Embedded SQLite migrations
//! - [`seed`] - Sample pharmacies and products
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rxpos_db::{seed, DbConfig, ProductStore, SqliteStorage, Storage};
//!
//! let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open(DbConfig::new("rxpos.db")).await?);
//! let products = ProductStore::open(storage.clone(), seed::sample_products()).await;
//!
//! let report = products.import(csv_text, chrono::Utc::now()).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod repository;
pub mod seed;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use storage::{DbConfig, MemoryStorage, SqliteStorage, Storage, UnavailableStorage};

// Store re-exports for convenience
pub use repository::pharmacy::PharmacyStore;
pub use repository::product::ProductStore;
pub use repository::sale::SaleStore;
