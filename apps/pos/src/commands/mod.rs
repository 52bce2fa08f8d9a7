//! # Commands Module
//!
//! Every operation the UI shell can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── pharmacy.rs   ◄─── Locations and the active selection
//! ├── product.rs    ◄─── Catalog CRUD, search, import/export
//! ├── cart.rs       ◄─── Cart manipulation
//! ├── sale.rs       ◄─── Checkout and receipts
//! ├── dashboard.rs  ◄─── Sales summary and export
//! └── config.rs     ◄─── Configuration and storage status
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the catalog
//! async fn search_products(products: &ProductStore, ...)
//!
//! // Only needs the cart
//! fn get_cart(cart: &CartState)
//!
//! // Needs several
//! async fn checkout(pharmacies: &PharmacyStore, sales: &SaleStore, cart: &CartState)
//! ```
//!
//! The shell passes the fields of [`PosSession`](crate::PosSession).

use serde::Serialize;

pub mod cart;
pub mod config;
pub mod dashboard;
pub mod pharmacy;
pub mod product;
pub mod sale;

/// A generated file handed to the shell for download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}
