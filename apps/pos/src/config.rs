//! # Session Configuration
//!
//! Settings loaded once at session start.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`RXPOS_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! | Variable                  | Effect                                        |
//! |---------------------------|-----------------------------------------------|
//! | `RXPOS_DB_PATH`           | SQLite file backing the key/value store       |
//! | `RXPOS_IN_MEMORY`         | `1`/`true`: keep everything in memory         |
//! | `RXPOS_CURRENCY_SYMBOL`   | Symbol used on receipts and dashboard figures |
//! | `RXPOS_SEED_SAMPLE_DATA`  | `0`/`false`: start empty stores empty         |
//! | `RXPOS_RECEIPT_WIDTH`     | Characters per printed receipt line           |
//!
//! Read-only after start, so no lock.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use rxpos_core::receipt::MIN_RECEIPT_WIDTH;
use rxpos_core::CurrencyFormatter;

use crate::error::StartupError;

/// File name of the key/value store inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "rxpos.db";

/// Default printed receipt width (80mm thermal paper).
pub const DEFAULT_RECEIPT_WIDTH: usize = 42;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Explicit storage file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Skip durable storage entirely.
    pub in_memory: bool,

    /// Fill never-written stores with the sample pharmacies and catalog.
    pub seed_sample_data: bool,

    /// Characters per line of the printed receipt.
    pub receipt_width: usize,

    /// Fixed currency display.
    pub currency: CurrencyFormatter,
}

impl Default for AppConfig {
    /// Durable storage in the data directory, sample data, `$` with 2 decimals.
    fn default() -> Self {
        AppConfig {
            database_path: None,
            in_memory: false,
            seed_sample_data: true,
            receipt_width: DEFAULT_RECEIPT_WIDTH,
            currency: CurrencyFormatter::default(),
        }
    }
}

impl AppConfig {
    /// Creates a config from process environment variables and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("RXPOS_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("RXPOS_IN_MEMORY") {
            config.in_memory = parse_flag("RXPOS_IN_MEMORY", &value, config.in_memory);
        }

        if let Some(symbol) = lookup("RXPOS_CURRENCY_SYMBOL") {
            config.currency.symbol = symbol;
        }

        if let Some(value) = lookup("RXPOS_SEED_SAMPLE_DATA") {
            config.seed_sample_data =
                parse_flag("RXPOS_SEED_SAMPLE_DATA", &value, config.seed_sample_data);
        }

        if let Some(value) = lookup("RXPOS_RECEIPT_WIDTH") {
            match value.trim().parse::<usize>() {
                Ok(width) => config.receipt_width = width.max(MIN_RECEIPT_WIDTH),
                Err(_) => warn!(value = %value, "Ignoring invalid RXPOS_RECEIPT_WIDTH"),
            }
        }

        config
    }

    /// In-memory configuration for tests and throwaway sessions.
    pub fn in_memory() -> Self {
        AppConfig {
            in_memory: true,
            ..AppConfig::default()
        }
    }

    /// Resolves the storage file and makes sure its directory exists.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.rxpos.pos/rxpos.db`
    /// - **Windows**: `%APPDATA%\rxpos\pos\data\rxpos.db`
    /// - **Linux**: `~/.local/share/pos/rxpos.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, StartupError> {
        let path = match &self.database_path {
            Some(path) => path.clone(),
            None => {
                let dirs =
                    ProjectDirs::from("com", "rxpos", "pos").ok_or(StartupError::NoDataDir)?;
                dirs.data_dir().join(DATABASE_FILE_NAME)
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(path)
    }
}

fn parse_flag(var: &str, value: &str, fallback: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(var, value, "Ignoring invalid boolean setting");
            fallback
        }
    }
}
