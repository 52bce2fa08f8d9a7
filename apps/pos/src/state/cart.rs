//! # Cart State
//!
//! The cart of the current session.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because commands may run
//! concurrently and only one of them may change the cart at a time.
//! It is a `std` mutex: no command holds it across an `.await`.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action                Command                 Cart State Change     │
//! │  ─────────                ───────                 ─────────────────     │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► qty + 1 / new line   │
//! │                                                                         │
//! │  Click "−" ──────────────► decrement_cart_item() ► qty − 1 / drop line │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► drop line            │
//! │                                                                         │
//! │  Click Clear ────────────► clear_cart() ────────► items.clear()        │
//! │                                                                         │
//! │  Click Checkout ─────────► checkout() ──────────► sale + receipt,      │
//! │                                                   items.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use rxpos_core::Cart;

/// Thread-safe cart state.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| CartTotals::from(cart));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}
