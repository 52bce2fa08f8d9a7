//! # Config Commands
//!
//! Configuration retrieval and storage health.

use serde::Serialize;
use tracing::debug;

use rxpos_db::storage::ACTIVE_PHARMACY_KEY;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::{StorageBackend, Stores};

/// Gets the session configuration.
///
/// ## When Used
/// - Startup (currency display)
/// - Receipt printing (paper width)
pub fn get_config(config: &AppConfig) -> AppConfig {
    debug!("get_config command");
    config.clone()
}

/// Storage health as shown in the status bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub backend: StorageBackend,
    /// At least one store has stopped persisting for this session.
    pub degraded: bool,
}

/// Checks the storage backend with a read.
///
/// Fails with `STORAGE_ERROR` when the backend cannot be read right now.
pub async fn get_storage_status(stores: &Stores) -> Result<StorageStatus, ApiError> {
    debug!("get_storage_status command");

    stores.storage.load(ACTIVE_PHARMACY_KEY).await?;

    Ok(StorageStatus {
        backend: stores.backend,
        degraded: stores.is_degraded(),
    })
}
