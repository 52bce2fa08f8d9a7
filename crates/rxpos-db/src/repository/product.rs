//! # Product Store
//!
//! Ordered product catalog with upsert-by-id semantics.
//!
//! ## Key Operations
//! - `add` / `add_many`: replace the record with the same id, else append
//! - `update`: replace only; unknown ids are ignored
//! - `categories`: derived from the current list on every call
//! - `import` / `export_csv`: bulk transfer (see `rxpos_core::transfer`)
//!
//! Deleting a product never touches recorded sales; they keep their own
//! copies of name and price.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use rxpos_core::catalog::{distinct_categories, filter_for_management, search_products};
use rxpos_core::transfer::{self, ImportReport};
use rxpos_core::{CoreResult, Product};

use super::persistence::Persistence;
use crate::storage::{Storage, PRODUCTS_KEY};

/// Store of catalog products.
pub struct ProductStore {
    persistence: Persistence,
    products: Mutex<Vec<Product>>,
}

impl ProductStore {
    /// Loads the store, falling back to `defaults` when nothing is stored.
    pub async fn open(storage: Arc<dyn Storage>, defaults: Vec<Product>) -> Self {
        let persistence = Persistence::new(storage, "products");
        let products: Vec<Product> = persistence
            .load_list(PRODUCTS_KEY)
            .await
            .unwrap_or(defaults);

        debug!(count = products.len(), "Product store opened");

        ProductStore {
            persistence,
            products: Mutex::new(products),
        }
    }

    /// All products in list order.
    pub async fn list(&self) -> Vec<Product> {
        self.products.lock().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Product> {
        let products = self.products.lock().await;
        products.iter().find(|p| p.id == id).cloned()
    }

    /// Distinct categories of the current list, in order of first appearance.
    pub async fn categories(&self) -> Vec<String> {
        distinct_categories(&self.products.lock().await)
    }

    /// Upserts one product.
    pub async fn add(&self, product: Product) {
        let mut products = self.products.lock().await;
        debug!(id = %product.id, "Adding product");

        upsert(&mut products, product);
        self.persistence.save(PRODUCTS_KEY, &*products).await;
    }

    /// Upserts every product in input order; later duplicates win.
    ///
    /// The list is persisted once, after the whole batch.
    pub async fn add_many(&self, batch: Vec<Product>) {
        let mut products = self.products.lock().await;
        debug!(count = batch.len(), "Adding products");

        for product in batch {
            upsert(&mut products, product);
        }
        self.persistence.save(PRODUCTS_KEY, &*products).await;
    }

    /// Replaces the product with the same id. Unknown ids are a no-op.
    pub async fn update(&self, product: Product) -> bool {
        let mut products = self.products.lock().await;

        let Some(slot) = products.iter_mut().find(|p| p.id == product.id) else {
            debug!(id = %product.id, "Update ignored, product not found");
            return false;
        };
        *slot = product;
        self.persistence.save(PRODUCTS_KEY, &*products).await;
        true
    }

    /// Removes the product with `id`. Unknown ids are a no-op.
    pub async fn delete(&self, id: &str) -> bool {
        let mut products = self.products.lock().await;

        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            debug!(id, "Delete ignored, product not found");
            return false;
        }

        debug!(id, "Product deleted");
        self.persistence.save(PRODUCTS_KEY, &*products).await;
        true
    }

    /// POS screen search (name/description, optional category).
    pub async fn search(&self, term: &str, category: &str) -> Vec<Product> {
        let products = self.products.lock().await;
        search_products(&products, term, category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Product management search (name/description/category text).
    pub async fn search_for_management(&self, term: &str) -> Vec<Product> {
        let products = self.products.lock().await;
        filter_for_management(&products, term)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Bulk import from pasted JSON or CSV text.
    ///
    /// Accepted records are upserted; rejected ones are counted. A payload
    /// that cannot be parsed at all reports zero imported and one failure.
    pub async fn import(&self, text: &str, now: DateTime<Utc>) -> ImportReport {
        let batch = match transfer::parse_products(text, now.timestamp_millis()) {
            Ok(batch) => batch,
            Err(err) => {
                warn!(error = %err, "Import payload rejected");
                return ImportReport::malformed(err.to_string());
            }
        };

        let report = batch.report();
        self.add_many(batch.products).await;

        info!(
            imported = report.imported,
            failed = report.failed,
            "Product import complete"
        );
        report
    }

    /// Catalog as CSV text.
    pub async fn export_csv(&self) -> CoreResult<String> {
        transfer::export_products_csv(&self.products.lock().await)
    }

    /// Whether this store has fallen back to in-memory only.
    pub fn is_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }
}

fn upsert(products: &mut Vec<Product>, product: Product) {
    match products.iter_mut().find(|p| p.id == product.id) {
        Some(existing) => *existing = product,
        None => products.push(product),
    }
}
