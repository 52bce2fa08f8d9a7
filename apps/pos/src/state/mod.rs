//! # State Module
//!
//! Session state, split into focused types so every command declares
//! exactly the state it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │     Stores       │  │    CartState     │  │    AppConfig     │      │
//! │  │                  │  │                  │  │                  │      │
//! │  │  PharmacyStore   │  │  Arc<Mutex<      │  │  receipt width   │      │
//! │  │  ProductStore    │  │    Cart          │  │  currency        │      │
//! │  │  SaleStore       │  │  >>              │  │  storage path    │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Stores: one tokio Mutex per store, held across mutate + persist     │
//! │  • CartState: std Mutex, never held across an await                    │
//! │  • AppConfig: read-only after start                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod stores;

pub use cart::CartState;
pub use stores::{StorageBackend, Stores};
