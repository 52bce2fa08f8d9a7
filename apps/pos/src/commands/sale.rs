//! # Sale Commands
//!
//! Checkout and receipts.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout                                             │
//! │                                                                         │
//! │  1. Read the active pharmacy                                           │
//! │       none ──► NO_ACTIVE_PHARMACY (cart untouched, no id drawn)        │
//! │  2. Under the sale store lock:                                         │
//! │       draw a transaction id not yet used by any recorded sale          │
//! │       under the cart lock:                                             │
//! │         empty cart ──► nothing happens                                 │
//! │         otherwise  ──► build sale + receipt, empty the cart            │
//! │       append the sale (persisted)                                      │
//! │  3. Return the receipt for display                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};

use rxpos_core::ids::generate_transaction_id;
use rxpos_core::{CoreError, Receipt, Sale};
use rxpos_db::{PharmacyStore, SaleStore};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::CartState;

/// Draws from the 900,000 possible ids before giving up.
pub const MAX_TRANSACTION_ID_ATTEMPTS: usize = 32;

/// Checks out the cart at the active pharmacy.
///
/// ## Returns
/// - `Ok(Some(receipt))` - one sale recorded, cart now empty
/// - `Ok(None)` - the cart was empty, nothing recorded
/// - `Err(NO_ACTIVE_PHARMACY)` - nothing recorded, cart unchanged
pub async fn checkout(
    pharmacies: &PharmacyStore,
    sales: &SaleStore,
    cart: &CartState,
) -> Result<Option<Receipt>, ApiError> {
    debug!("checkout command");

    let Some(pharmacy) = pharmacies.active().await else {
        return Err(CoreError::NoActivePharmacy.into());
    };

    let receipt = sales
        .add_with_fresh_id(
            MAX_TRANSACTION_ID_ATTEMPTS,
            || generate_transaction_id(&mut rand::thread_rng()),
            |transaction_id| {
                let completed = cart
                    .with_cart_mut(|c| c.checkout(Some(&pharmacy), transaction_id, Utc::now()))?;
                Ok::<_, ApiError>(completed.map(|c| (c.sale, c.receipt)))
            },
        )
        .await?;

    match &receipt {
        Some(receipt) => info!(
            transaction_id = %receipt.transaction_id,
            pharmacy_id = %receipt.pharmacy_id,
            total = receipt.total,
            "Sale completed"
        ),
        None => debug!("Checkout ignored, cart is empty"),
    }

    Ok(receipt)
}

/// Fixed-width text of a receipt, ready for the printer.
pub fn print_receipt(config: &AppConfig, receipt: &Receipt) -> String {
    debug!(transaction_id = %receipt.transaction_id, "print_receipt command");
    receipt.render_text(config.receipt_width, &config.currency)
}

/// All recorded sales, oldest first.
pub async fn get_sales(sales: &SaleStore) -> Vec<Sale> {
    debug!("get_sales command");
    sales.list().await
}

/// Sales recorded at one pharmacy.
pub async fn get_sales_by_pharmacy(sales: &SaleStore, pharmacy_id: String) -> Vec<Sale> {
    debug!(pharmacy_id = %pharmacy_id, "get_sales_by_pharmacy command");
    sales.list_by_pharmacy(&pharmacy_id).await
}
