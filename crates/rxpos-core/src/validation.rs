//! # Validation Module
//!
//! Input validation for manual product/pharmacy forms and bulk import.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell                                                     │
//! │  ├── Required inputs, disabled buttons                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command layer / import pipeline                              │
//! │  └── THIS MODULE: name/price/stock rules                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores                                                       │
//! │  └── No checks: stores trust their callers                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use rxpos_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Aspirin 100mg").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }

    Ok(())
}

/// Validates the fields required to register a pharmacy.
///
/// Name and address are mandatory; phone may be blank.
pub fn validate_pharmacy_details(name: &str, address: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }

    if address.trim().is_empty() {
        return Err(ValidationError::required("address"));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be a finite number
/// - Zero is allowed (free items), negatives are not
///
/// ## Example
/// ```rust
/// use rxpos_core::validation::validate_price;
///
/// assert!(validate_price(5.99).is_ok());
/// assert!(validate_price(0.0).is_ok());
/// assert!(validate_price(-1.0).is_err());
/// assert!(validate_price(f64::NAN).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field: "price".to_string(),
            value: price.to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level and narrows it to the stored integer type.
pub fn validate_stock(stock: i64) -> ValidationResult<u32> {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }

    u32::try_from(stock).map_err(|_| ValidationError::InvalidNumber {
        field: "stock".to_string(),
        value: stock.to_string(),
    })
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a complete product record before it reaches the store.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price(product.price)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
