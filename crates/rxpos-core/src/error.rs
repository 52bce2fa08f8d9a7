//! # Error Types
//!
//! Domain-specific error types for rxpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rxpos-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rxpos-db errors (separate crate)                                      │
//! │  └── StorageError     - Durable storage failures                       │
//! │                                                                         │
//! │  rxpos-app errors                                                      │
//! │  └── ApiError         - What the UI shell sees (serialized)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: every failure is reported at the point of the
//! user action and the session keeps running.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout attempted while no pharmacy is selected.
    ///
    /// ## When This Occurs
    /// - The pharmacy store is empty
    /// - The active pharmacy was deleted and nothing remained
    ///
    /// No sale is recorded and the cart is left untouched.
    #[error("No active pharmacy selected")]
    NoActivePharmacy,

    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product cannot be added to the cart because it has no stock.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: String },

    /// Bulk import text is neither JSON nor a parseable CSV table.
    #[error("Import payload is malformed: {reason}")]
    MalformedImportPayload { reason: String },

    /// A CSV export could not be written.
    #[error("Export failed: {0}")]
    Export(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::Export(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by manual add/edit forms and by the second stage of bulk import,
/// where each one turns into a skipped record rather than an aborted batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is not a usable number (NaN, infinite, or unparseable text).
    #[error("{field} is not a valid number: {value}")]
    InvalidNumber { field: String, value: String },

    /// Value has the wrong shape (e.g. an import record that is not an object).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
