//! # Cart Commands
//!
//! Cart manipulation on the POS screen.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐   add_to_cart   ┌──────────┐    checkout     ┌────────┐  │
//! │  │  Empty   │────────────────►│ Building │────────────────►│  Sale  │  │
//! │  │          │◄────────────────│          │                 │ + Rcpt │  │
//! │  └──────────┘  last line      └──────────┘                 └───┬────┘  │
//! │       ▲        removed /        │   ▲                          │       │
//! │       │        clear_cart       └───┘ add / decrement          │       │
//! │       │                               / remove                 │       │
//! │       └────────────────────────────────────────────────────────┘       │
//! │                          (cart emptied)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use rxpos_core::{Cart, CartItem, CartPhase, CartTotals, CoreError};
use rxpos_db::ProductStore;

use crate::error::ApiError;
use crate::state::CartState;

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    pub phase: CartPhase,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
            phase: cart.phase(),
        }
    }
}

/// Gets the current cart contents and totals.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds one unit of a product to the cart.
///
/// ## Behavior
/// - Already in the cart: quantity + 1
/// - Not in the cart: new line with quantity 1 and a snapshot of the product
/// - Out of stock (stock 0): rejected with `OUT_OF_STOCK`
///
/// Stock is only checked here; the quantity in the cart may exceed it.
pub async fn add_to_cart(
    products: &ProductStore,
    cart: &CartState,
    product_id: String,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");

    let product = products
        .get(&product_id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", &product_id))?;

    if !product.is_in_stock() {
        return Err(CoreError::OutOfStock { product_id }.into());
    }

    Ok(cart.with_cart_mut(|c| {
        c.add_item(&product);
        CartResponse::from(&*c)
    }))
}

/// Takes one unit off a line; a line at one unit is removed.
pub fn decrement_cart_item(cart: &CartState, product_id: String) -> CartResponse {
    debug!(product_id = %product_id, "decrement_cart_item command");
    cart.with_cart_mut(|c| {
        c.decrement_item(&product_id);
        CartResponse::from(&*c)
    })
}

/// Removes a line regardless of its quantity.
pub fn remove_from_cart(cart: &CartState, product_id: String) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");
    cart.with_cart_mut(|c| {
        c.remove_item(&product_id);
        CartResponse::from(&*c)
    })
}

/// Empties the cart.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}
