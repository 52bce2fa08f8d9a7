//! # Domain Types
//!
//! Core domain types used throughout RxPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Pharmacy     │   │    Product      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id (RX-NNNNNN) │       │
//! │  │  name           │   │  name           │   │  pharmacy_id    │       │
//! │  │  address        │   │  price          │   │  items[]        │       │
//! │  │  phone          │   │  category       │   │  subtotal/tax   │       │
//! │  └─────────────────┘   │  stock          │   │  total, date    │       │
//! │                        └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                 │
//! │                                              ┌────────▼────────┐       │
//! │                                              │    SaleItem     │       │
//! │                                              │  product_id     │       │
//! │                                              │  product_name   │ frozen│
//! │                                              │  unit_price     │ frozen│
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Shape
//! Field names serialize in camelCase (`requiresPrescription`, `pharmacyId`,
//! `unitPrice`, ...) to match the stored documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Pharmacy
// =============================================================================

/// A pharmacy location. Sales are attributed to the active one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Pharmacy {
    /// Creates a pharmacy record.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Pharmacy {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (e.g. `med-101`).
    pub id: String,

    /// Display name shown in the catalog and on the receipt.
    pub name: String,

    pub description: String,

    /// Unit price, never negative.
    pub price: f64,

    /// Free-text category. The category list is derived from these values.
    pub category: String,

    /// Units on hand.
    pub stock: u32,

    /// Descriptive flag only; nothing enforces it.
    pub requires_prescription: bool,
}

impl Product {
    /// Whether the product can be offered for sale at the POS screen.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: u32,
    /// Unit price at time of sale (frozen).
    pub unit_price: f64,
    /// Line total (unit_price × quantity).
    pub total: f64,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    /// Transaction id, `RX-` followed by six digits.
    pub id: String,
    pub pharmacy_id: String,
    pub items: Vec<SaleItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub payment_method: String,
}

impl Sale {
    /// Total number of units sold across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity as u64).sum()
    }
}

// =============================================================================
// Pharmacy Filter
// =============================================================================

/// Pharmacy selector used by the dashboard.
///
/// The UI shell sends the literal `"all"` for "every pharmacy".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PharmacyFilter {
    #[default]
    All,
    Only(String),
}

impl PharmacyFilter {
    /// Whether a sale recorded at `pharmacy_id` passes the filter.
    pub fn matches(&self, pharmacy_id: &str) -> bool {
        match self {
            PharmacyFilter::All => true,
            PharmacyFilter::Only(id) => id == pharmacy_id,
        }
    }
}

impl From<&str> for PharmacyFilter {
    fn from(value: &str) -> Self {
        if value == crate::ALL_FILTER {
            PharmacyFilter::All
        } else {
            PharmacyFilter::Only(value.to_string())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
