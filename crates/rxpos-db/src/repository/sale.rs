//! # Sale Store
//!
//! Append-only log of completed sales. There is no update or delete.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use rxpos_core::Sale;

use super::persistence::Persistence;
use crate::error::StorageError;
use crate::storage::{Storage, SALES_KEY};

/// Store of recorded sales.
///
/// `add` trusts the caller's arithmetic; totals are computed at checkout.
pub struct SaleStore {
    persistence: Persistence,
    sales: Mutex<Vec<Sale>>,
}

impl SaleStore {
    /// Loads recorded sales; none when nothing is stored.
    pub async fn open(storage: Arc<dyn Storage>) -> Self {
        let persistence = Persistence::new(storage, "sales");
        let sales: Vec<Sale> = persistence.load_list(SALES_KEY).await.unwrap_or_default();

        debug!(count = sales.len(), "Sale store opened");

        SaleStore {
            persistence,
            sales: Mutex::new(sales),
        }
    }

    /// All sales in recording order.
    pub async fn list(&self) -> Vec<Sale> {
        self.sales.lock().await.clone()
    }

    /// Appends `sale` and persists the full log.
    pub async fn add(&self, sale: Sale) {
        let mut sales = self.sales.lock().await;
        debug!(id = %sale.id, pharmacy_id = %sale.pharmacy_id, total = sale.total, "Recording sale");

        sales.push(sale);
        self.persistence.save(SALES_KEY, &*sales).await;
    }

    /// Appends the sale `build` makes from a transaction id no recorded sale
    /// uses, and returns what `build` returned alongside it.
    ///
    /// `draw` proposes ids, at most `max_attempts` of them. The uniqueness
    /// check and the append happen under one lock. `build` returning
    /// `Ok(None)` records nothing.
    pub async fn add_with_fresh_id<T, E>(
        &self,
        max_attempts: usize,
        mut draw: impl FnMut() -> String,
        build: impl FnOnce(String) -> Result<Option<(Sale, T)>, E>,
    ) -> Result<Option<T>, E>
    where
        E: From<StorageError>,
    {
        let mut sales = self.sales.lock().await;

        let mut id = draw();
        let mut attempts = 1;
        while sales.iter().any(|s| s.id == id) {
            if attempts >= max_attempts {
                return Err(StorageError::UniqueViolation {
                    field: "transaction id".to_string(),
                    value: id,
                }
                .into());
            }
            warn!(id = %id, "Transaction id already used, drawing another");
            id = draw();
            attempts += 1;
        }

        let Some((sale, output)) = build(id)? else {
            return Ok(None);
        };

        debug!(id = %sale.id, pharmacy_id = %sale.pharmacy_id, total = sale.total, "Recording sale");
        sales.push(sale);
        self.persistence.save(SALES_KEY, &*sales).await;
        Ok(Some(output))
    }

    /// Sales recorded at `pharmacy_id`, in recording order.
    pub async fn list_by_pharmacy(&self, pharmacy_id: &str) -> Vec<Sale> {
        let sales = self.sales.lock().await;
        sales
            .iter()
            .filter(|s| s.pharmacy_id == pharmacy_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sales.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sales.lock().await.is_empty()
    }

    /// Whether this store has fallen back to in-memory only.
    pub fn is_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }
}
