//! # API Error Type
//!
//! Unified error type for session commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in RxPOS                                  │
//! │                                                                         │
//! │  UI shell                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  checkout()                                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  No pharmacy? ─── CoreError::NoActivePharmacy ──┐               │  │
//! │  │         │                                       │               │  │
//! │  │         ▼                                       ▼               │  │
//! │  │  Bad input? ─── ValidationError::Required ─── ApiError ────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code    = "NO_ACTIVE_PHARMACY"                                       │
//! │  e.message = "No active pharmacy selected"                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is recoverable: the command fails, the session carries on.

use serde::Serialize;
use thiserror::Error;

use rxpos_core::{CoreError, ValidationError};
use rxpos_db::StorageError;

/// API error returned from session commands.
///
/// ## Serialization
/// This is what the UI shell receives when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: med-404"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Pharmacy or product id does not resolve
    NotFound,

    /// Form input failed validation
    ValidationError,

    /// Checkout attempted with no pharmacy selected
    NoActivePharmacy,

    /// Product has no stock to add to the cart
    OutOfStock,

    /// Bulk import payload could not be read
    ImportError,

    /// Durable storage failed
    StorageError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts validation errors from the manual add/edit forms.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoActivePharmacy => {
                ApiError::new(ErrorCode::NoActivePharmacy, err.to_string())
            }
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::OutOfStock { .. } => ApiError::new(ErrorCode::OutOfStock, err.to_string()),
            CoreError::MalformedImportPayload { .. } => {
                ApiError::new(ErrorCode::ImportError, err.to_string())
            }
            CoreError::Export(reason) => {
                tracing::error!("CSV export failed: {}", reason);
                ApiError::internal("Export could not be written")
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

/// Converts storage errors to API errors.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(_) => {
                ApiError::new(ErrorCode::StorageError, "Storage is unavailable")
            }
            StorageError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Storage connection failed")
            }
            StorageError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Storage migration failed")
            }
            StorageError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Storage query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            StorageError::UniqueViolation { .. } => {
                tracing::error!("{}", err);
                ApiError::internal("Could not allocate a transaction id")
            }
            StorageError::Serialization(e) => {
                tracing::error!("Stored document could not be encoded: {}", e);
                ApiError::internal("Stored data could not be processed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Error
// =============================================================================

/// Failures while locating the storage file at session start.
///
/// Never fatal: the session falls back to memory-only stores.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not determine the app data directory")]
    NoDataDir,

    #[error("could not create data directory: {0}")]
    CreateDir(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
