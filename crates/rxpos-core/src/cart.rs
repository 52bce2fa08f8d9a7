//! # Cart Module
//!
//! The transient cart of one checkout session and the checkout transition.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart State Machine                               │
//! │                                                                         │
//! │             add_item                      add_item / decrement_item     │
//! │   ┌───────┐ ────────► ┌──────────┐ ◄───────────────────────────┐       │
//! │   │ Empty │           │ Building │ ────────────────────────────┘       │
//! │   └───────┘ ◄──────── └────┬─────┘                                      │
//! │       ▲   last line removed │                                           │
//! │       │                     │ checkout(active pharmacy)                 │
//! │       │                     ▼                                           │
//! │       │          ┌─────────────────────┐                                │
//! │       │          │ 1. totals           │                                │
//! │       │          │ 2. Sale snapshot    │                                │
//! │       │          │ 3. Receipt (copy)   │                                │
//! │       └───────── │ 4. clear cart       │                                │
//! │                  └─────────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The receipt is built before the cart is cleared and owns its own copy of
//! every line, so it stays valid after the cart is empty.
//!
//! ## Stock
//! The cart does not check stock. Gating on `stock > 0` happens where the
//! product is offered (see the `add_to_cart` command).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{line_total, SALES_TAX};
use crate::receipt::Receipt;
use crate::types::{Pharmacy, Product, Sale, SaleItem};
use crate::DEFAULT_PAYMENT_METHOD;

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// Holds a snapshot of the product taken when it was first added; later
/// catalog edits do not reach lines already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    /// Always at least 1; a line at zero is removed instead.
    pub quantity: u32,
}

impl CartItem {
    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> f64 {
        line_total(self.product.price, self.quantity)
    }

    fn to_sale_item(&self) -> SaleItem {
        SaleItem {
            product_id: self.product.id.clone(),
            product_name: self.product.name.clone(),
            quantity: self.quantity,
            unit_price: self.product.price,
            total: self.line_total(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Observable phase of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartPhase {
    Empty,
    Building,
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product bumps quantity)
/// - Every line has quantity ≥ 1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    /// The sale to append to the sale store.
    pub sale: Sale,
    /// Detached receipt view for display and printing.
    pub receipt: Receipt,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds one unit of `product`, returning the line's new quantity.
    ///
    /// An existing line keeps its original snapshot; only the quantity moves.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Removes one unit; a line at quantity 1 is removed entirely.
    ///
    /// Unknown ids are ignored. Returns the remaining quantity (0 if gone).
    pub fn decrement_item(&mut self, product_id: &str) -> u32 {
        let Some(index) = self.items.iter().position(|i| i.product.id == product_id) else {
            return 0;
        };

        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
            self.items[index].quantity
        } else {
            self.items.remove(index);
            0
        }
    }

    /// Removes a line regardless of quantity. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> CartPhase {
        if self.is_empty() {
            CartPhase::Empty
        } else {
            CartPhase::Building
        }
    }

    /// Total quantity of all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| i.quantity as u64).sum()
    }

    /// Σ(unit price × quantity), summed in line order.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Fixed 7% of the subtotal.
    pub fn tax(&self) -> f64 {
        SALES_TAX.apply(self.subtotal())
    }

    /// Calculates the grand total (subtotal + tax).
    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax()
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Completes the session: builds the sale and receipt, then empties the cart.
    ///
    /// ## Returns
    /// - `Err(NoActivePharmacy)` when `pharmacy` is `None`; the cart is untouched
    /// - `Ok(None)` when the cart is empty (nothing to record)
    /// - `Ok(Some(Checkout))` otherwise; the cart is now empty
    ///
    /// The caller appends `sale` to the sale store.
    pub fn checkout(
        &mut self,
        pharmacy: Option<&Pharmacy>,
        transaction_id: String,
        now: DateTime<Utc>,
    ) -> CoreResult<Option<Checkout>> {
        let pharmacy = pharmacy.ok_or(CoreError::NoActivePharmacy)?;

        if self.is_empty() {
            return Ok(None);
        }

        let subtotal = self.subtotal();
        let tax = SALES_TAX.apply(subtotal);

        let sale = Sale {
            id: transaction_id,
            pharmacy_id: pharmacy.id.clone(),
            items: self.items.iter().map(CartItem::to_sale_item).collect(),
            subtotal,
            tax,
            total: subtotal + tax,
            date: now,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        };

        let receipt = Receipt::new(&sale, pharmacy);
        self.clear();

        Ok(Some(Checkout { sale, receipt }))
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        let tax = SALES_TAX.apply(subtotal);
        CartTotals {
            item_count: cart.items.len(),
            total_quantity: cart.total_quantity(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            price,
            category: "general".to_string(),
            stock: 5,
            requires_prescription: false,
        }
    }

    fn test_pharmacy() -> Pharmacy {
        Pharmacy::new("ph-1", "Main Street Pharmacy", "123 Main St", "020-123-4567")
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let product = test_product("med-1", 10.0);

        assert_eq!(cart.add_item(&product), 1);
        assert_eq!(cart.add_item(&product), 2);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.phase(), CartPhase::Building);
    }

    #[test]
    fn test_cart_keeps_first_snapshot() {
        let mut cart = Cart::new();
        let mut product = test_product("med-1", 10.0);
        cart.add_item(&product);

        product.price = 99.0;
        cart.add_item(&product);

        assert_eq!(cart.items()[0].product.price, 10.0);
        assert_eq!(cart.subtotal(), 20.0);
    }

    #[test]
    fn test_cart_decrement_removes_at_one() {
        let mut cart = Cart::new();
        let product = test_product("med-1", 10.0);
        cart.add_item(&product);
        cart.add_item(&product);

        assert_eq!(cart.decrement_item("med-1"), 1);
        assert_eq!(cart.decrement_item("med-1"), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.phase(), CartPhase::Empty);

        // Unknown ids are no-ops.
        assert_eq!(cart.decrement_item("missing"), 0);
    }

    #[test]
    fn test_cart_remove_ignores_quantity() {
        let mut cart = Cart::new();
        let product = test_product("med-1", 10.0);
        for _ in 0..4 {
            cart.add_item(&product);
        }
        cart.add_item(&test_product("med-2", 3.0));

        assert!(cart.remove_item("med-1"));
        assert!(!cart.remove_item("med-1"));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_cart_totals_formula() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("med-1", 5.99));
        cart.add_item(&test_product("med-2", 12.5));
        cart.add_item(&test_product("med-2", 12.5));

        let expected_subtotal = 5.99 * 1.0 + 12.5 * 2.0;
        assert!((cart.subtotal() - expected_subtotal).abs() < 1e-9);
        assert!((cart.tax() - cart.subtotal() * 0.07).abs() < 1e-9);
        assert_eq!(cart.total(), cart.subtotal() + cart.tax());

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total, cart.total());
    }

    #[test]
    fn test_checkout_builds_sale_and_clears_cart() {
        let mut cart = Cart::new();
        let product = test_product("med-1", 10.0);
        cart.add_item(&product);
        cart.add_item(&product);
        let expected_total = cart.total();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let checkout = cart
            .checkout(Some(&test_pharmacy()), "RX-123456".to_string(), now)
            .unwrap()
            .unwrap();

        let sale = &checkout.sale;
        assert_eq!(sale.id, "RX-123456");
        assert_eq!(sale.pharmacy_id, "ph-1");
        assert_eq!(sale.subtotal, 20.0);
        assert!((sale.tax - 1.40).abs() < 1e-9);
        assert!((sale.total - 21.40).abs() < 1e-9);
        assert_eq!(sale.total, expected_total);
        assert_eq!(sale.payment_method, "cash");
        assert_eq!(sale.items[0].quantity, 2);
        assert_eq!(sale.items[0].total, 20.0);

        assert!(cart.is_empty());

        // Receipt is a detached copy.
        assert_eq!(checkout.receipt.lines.len(), 1);
        assert_eq!(checkout.receipt.pharmacy_name, "Main Street Pharmacy");
    }

    #[test]
    fn test_checkout_without_pharmacy_leaves_cart() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("med-1", 10.0));
        let before = cart.clone();

        let result = cart.checkout(None, "RX-123456".to_string(), Utc::now());

        assert!(matches!(result, Err(CoreError::NoActivePharmacy)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_checkout_empty_cart_is_noop() {
        let mut cart = Cart::new();
        let result = cart
            .checkout(Some(&test_pharmacy()), "RX-123456".to_string(), Utc::now())
            .unwrap();
        assert!(result.is_none());
    }
}
