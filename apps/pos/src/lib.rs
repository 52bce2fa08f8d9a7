//! # RxPOS App Library
//!
//! Session and command layer of the RxPOS pharmacy point of sale. The UI
//! shell starts one [`PosSession`] and calls the functions in [`commands`].
//!
//! ## Module Organization
//! ```text
//! rxpos_app/
//! ├── lib.rs          ◄─── You are here (session setup, logging)
//! ├── config.rs       ◄─── AppConfig from RXPOS_* variables
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── stores.rs   ◄─── Storage backend + the three stores
//! │   └── cart.rs     ◄─── Cart state management
//! ├── commands/
//! │   ├── pharmacy.rs ◄─── Locations, active selection
//! │   ├── product.rs  ◄─── Catalog, import/export
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── sale.rs     ◄─── Checkout, receipts
//! │   ├── dashboard.rs◄─── Reporting, sales export
//! │   └── config.rs   ◄─── Config, storage status
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use rxpos_app::{commands, init_tracing, AppConfig, PosSession};
//!
//! init_tracing();
//! let session = PosSession::start(AppConfig::from_env()).await;
//!
//! commands::cart::add_to_cart(&session.stores.products, &session.cart, "med-1".into()).await?;
//! let receipt = commands::sale::checkout(
//!     &session.stores.pharmacies,
//!     &session.stores.sales,
//!     &session.cart,
//! )
//! .await?;
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::AppConfig;
pub use error::{ApiError, ErrorCode};
pub use state::{CartState, StorageBackend, Stores};

/// Everything one POS session holds.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Session Startup                                   │
/// │                                                                         │
/// │  1. Resolve Storage ──────────────────────────────────────────────────► │
/// │     • RXPOS_IN_MEMORY: MemoryStorage                                    │
/// │     • otherwise SQLite file (WAL, migrations applied)                   │
/// │     • file unusable: warn, UnavailableStorage (memory only)             │
/// │                                                                         │
/// │  2. Open Stores ──────────────────────────────────────────────────────► │
/// │     • Pharmacies, products, sales loaded from their keys                │
/// │     • Never-written keys get the sample data (if enabled)               │
/// │                                                                         │
/// │  3. Empty Cart ───────────────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone)]
pub struct PosSession {
    pub config: AppConfig,
    pub stores: Stores,
    pub cart: CartState,
}

impl PosSession {
    /// Starts a session on the backend named by `config`.
    ///
    /// Never fails: storage problems leave the stores running in memory.
    pub async fn start(config: AppConfig) -> Self {
        info!("Starting RxPOS session");
        let stores = Stores::connect(&config).await;
        Self::with_stores(config, stores).await
    }

    /// Starts a session on stores opened by the caller.
    pub async fn with_stores(config: AppConfig, stores: Stores) -> Self {
        let active = stores.pharmacies.active().await;
        info!(
            backend = ?stores.backend,
            degraded = stores.is_degraded(),
            active_pharmacy = active.as_ref().map(|p| p.name.as_str()).unwrap_or("none"),
            "Session ready"
        );

        PosSession {
            config,
            stores,
            cart: CartState::new(),
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rxpos_db=trace` - Trace the storage layer only
/// - Default: INFO, DEBUG for RxPOS crates
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rxpos=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
