//! # Store State
//!
//! The storage backend and the three stores opened on it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use rxpos_core::{Pharmacy, Product};
use rxpos_db::{
    seed, DbConfig, MemoryStorage, PharmacyStore, ProductStore, SaleStore, SqliteStorage, Storage,
    UnavailableStorage,
};

use crate::config::AppConfig;
use crate::error::StartupError;

/// Which backend the session ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
    /// Durable storage could not be opened; stores run memory-only.
    Unavailable,
}

/// Shared handles to the session's stores.
#[derive(Clone)]
pub struct Stores {
    pub storage: Arc<dyn Storage>,
    pub backend: StorageBackend,
    pub pharmacies: Arc<PharmacyStore>,
    pub products: Arc<ProductStore>,
    pub sales: Arc<SaleStore>,
}

impl Stores {
    /// Opens the backend named by `config`, falling back to memory-only
    /// stores when the storage file cannot be used.
    pub async fn connect(config: &AppConfig) -> Self {
        if config.in_memory {
            info!("Using in-memory storage");
            let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
            return Stores::open(storage, StorageBackend::Memory, config.seed_sample_data).await;
        }

        match open_sqlite(config).await {
            Ok(storage) => {
                Stores::open(Arc::new(storage), StorageBackend::Sqlite, config.seed_sample_data)
                    .await
            }
            Err(e) => {
                warn!(error = %e, "Durable storage unavailable, continuing in memory only");
                Stores::open(
                    Arc::new(UnavailableStorage),
                    StorageBackend::Unavailable,
                    config.seed_sample_data,
                )
                .await
            }
        }
    }

    /// Opens the three stores on an existing backend.
    pub async fn open(
        storage: Arc<dyn Storage>,
        backend: StorageBackend,
        seed_sample_data: bool,
    ) -> Self {
        let (pharmacy_defaults, product_defaults): (Vec<Pharmacy>, Vec<Product>) =
            if seed_sample_data {
                (seed::sample_pharmacies(), seed::sample_products())
            } else {
                (Vec::new(), Vec::new())
            };

        let pharmacies = PharmacyStore::open(storage.clone(), pharmacy_defaults).await;
        let products = ProductStore::open(storage.clone(), product_defaults).await;
        let sales = SaleStore::open(storage.clone()).await;

        Stores {
            storage,
            backend,
            pharmacies: Arc::new(pharmacies),
            products: Arc::new(products),
            sales: Arc::new(sales),
        }
    }

    /// Whether any store has stopped persisting.
    pub fn is_degraded(&self) -> bool {
        self.pharmacies.is_degraded() || self.products.is_degraded() || self.sales.is_degraded()
    }
}

async fn open_sqlite(config: &AppConfig) -> Result<SqliteStorage, StartupError> {
    let path = config.resolve_database_path()?;
    info!(?path, "Opening storage file");
    Ok(SqliteStorage::open(DbConfig::new(path)).await?)
}
