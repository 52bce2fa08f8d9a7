//! # rxpos-core: Pure Business Logic for RxPOS
//!
//! Catalog, cart, checkout and dashboard rules for a multi-pharmacy
//! point-of-sale, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          RxPOS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI shell (external)                          │   │
//! │  │    POS screen ──► Receipt ──► Products ──► Dashboard            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rxpos-app commands                           │   │
//! │  │    add_to_cart, checkout, import_products, dashboard, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rxpos-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  cart   │ │ catalog │ │dashboard │ │transfer│  │   │
//! │  │   │ Product │ │  Cart   │ │ search  │ │ totals   │ │ import │  │   │
//! │  │   │  Sale   │ │ receipt │ │categorie│ │ top-N    │ │ export │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rxpos-db (Storage Layer)                     │   │
//! │  │          key/value backends, pharmacy/product/sale stores        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Pharmacy, Product, Sale, SaleItem)
//! - [`money`] - Tax rate, line arithmetic, currency formatter
//! - [`cart`] - Cart lifecycle and checkout
//! - [`receipt`] - Detached receipt view and its text rendering
//! - [`catalog`] - Category derivation and product search
//! - [`dashboard`] - Date-range filtering and sales aggregation
//! - [`transfer`] - Bulk product import and CSV export
//! - [`ids`] - Identifier generation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: time and randomness are passed in, never read here
//! 2. **No I/O**: storage lives in rxpos-db
//! 3. **Recorded Arithmetic**: amounts are f64, rounded only for display
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use rxpos_core::cart::Cart;
//! use rxpos_core::types::{Pharmacy, Product};
//!
//! let product = Product {
//!     id: "med-1".to_string(),
//!     name: "Paracetamol 500mg".to_string(),
//!     description: String::new(),
//!     price: 10.0,
//!     category: "pain relief".to_string(),
//!     stock: 5,
//!     requires_prescription: false,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&product);
//! cart.add_item(&product);
//!
//! let pharmacy = Pharmacy::new("ph-1", "Main Street Pharmacy", "123 Main St", "");
//! let checkout = cart
//!     .checkout(Some(&pharmacy), "RX-123456".to_string(), chrono::Utc::now())
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(checkout.sale.subtotal, 20.0);
//! assert!((checkout.sale.tax - 1.40).abs() < 1e-9);
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod ids;
pub mod money;
pub mod receipt;
pub mod transfer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartPhase, CartTotals, Checkout};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormatter, TaxRate, SALES_TAX};
pub use receipt::Receipt;
pub use transfer::ImportReport;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Pharmacy filter sentinel meaning "every pharmacy".
///
/// Also used as the category filter value on the POS screen.
pub const ALL_FILTER: &str = "all";

/// Payment method recorded on every sale. Real payment processing is out of scope.
pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

/// Category given to imported products that carry none.
pub const DEFAULT_CATEGORY: &str = "other";

/// Pharmacy label in the sales export when the id no longer resolves.
pub const UNKNOWN_PHARMACY: &str = "Unknown";

/// Number of products listed in the dashboard's top products table.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Number of sales listed in the dashboard's recent sales table.
pub const RECENT_SALES_LIMIT: usize = 10;

/// Width of the dashboard's default date range, ending today.
pub const DEFAULT_DASHBOARD_DAYS: i64 = 30;
