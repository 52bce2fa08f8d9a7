//! # Store Module
//!
//! The three stores of RxPOS, each following the same pattern.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open(storage, defaults)                                               │
//! │       │  load key ──► decode ──► in-memory Vec (defaults if absent)     │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────┐                                     │
//! │  │ tokio::sync::Mutex<state>     │  one lock per store                  │
//! │  └───────────────┬───────────────┘                                     │
//! │                  │ mutate, then persist the WHOLE collection            │
//! │                  │ before the lock is released                          │
//! │                  ▼                                                      │
//! │  Arc<dyn Storage>::save(key, json)                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No operation spans two stores, so there are no cross-store locks.
//!
//! ## Available Stores
//!
//! - [`PharmacyStore`](pharmacy::PharmacyStore) - Locations and the active selection
//! - [`ProductStore`](product::ProductStore) - Catalog, upsert, import/export
//! - [`SaleStore`](sale::SaleStore) - Append-only sales log

mod persistence;

pub mod pharmacy;
pub mod product;
pub mod sale;
