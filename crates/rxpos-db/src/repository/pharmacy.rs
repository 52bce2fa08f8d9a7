//! # Pharmacy Store
//!
//! Ordered pharmacy list plus the single active selection.
//!
//! ## Active Selection Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open          stored active (if still listed) else first pharmacy     │
//! │  update(p)     p.id == active.id  →  active refreshed to p              │
//! │  delete(id)    id == active.id    →  first remaining, or none           │
//! │                                                                         │
//! │  active none   →  `active-pharmacy` key is removed                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use rxpos_core::Pharmacy;

use super::persistence::Persistence;
use crate::storage::{Storage, ACTIVE_PHARMACY_KEY, PHARMACIES_KEY};

#[derive(Debug)]
struct PharmacyState {
    pharmacies: Vec<Pharmacy>,
    active: Option<Pharmacy>,
}

/// Store of pharmacy locations.
///
/// ## Usage
/// ```rust,ignore
/// let store = PharmacyStore::open(storage, seed::sample_pharmacies()).await;
/// let active = store.active().await;
/// ```
pub struct PharmacyStore {
    persistence: Persistence,
    state: Mutex<PharmacyState>,
}

impl PharmacyStore {
    /// Loads the store, falling back to `defaults` when nothing is stored.
    pub async fn open(storage: Arc<dyn Storage>, defaults: Vec<Pharmacy>) -> Self {
        let persistence = Persistence::new(storage, "pharmacies");

        let pharmacies: Vec<Pharmacy> = persistence
            .load_list(PHARMACIES_KEY)
            .await
            .unwrap_or(defaults);

        let stored_active: Option<Pharmacy> = persistence.load(ACTIVE_PHARMACY_KEY).await;
        let active = stored_active
            .filter(|a| pharmacies.iter().any(|p| p.id == a.id))
            .or_else(|| pharmacies.first().cloned());

        debug!(
            count = pharmacies.len(),
            active = active.as_ref().map(|p| p.id.as_str()),
            "Pharmacy store opened"
        );

        PharmacyStore {
            persistence,
            state: Mutex::new(PharmacyState { pharmacies, active }),
        }
    }

    /// All pharmacies in list order.
    pub async fn list(&self) -> Vec<Pharmacy> {
        self.state.lock().await.pharmacies.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Pharmacy> {
        let state = self.state.lock().await;
        state.pharmacies.iter().find(|p| p.id == id).cloned()
    }

    /// The active pharmacy, if any.
    pub async fn active(&self) -> Option<Pharmacy> {
        self.state.lock().await.active.clone()
    }

    /// Makes `pharmacy` the active selection.
    pub async fn set_active(&self, pharmacy: Pharmacy) {
        let mut state = self.state.lock().await;
        debug!(id = %pharmacy.id, "Setting active pharmacy");

        state.active = Some(pharmacy);
        self.persist_active(&state.active).await;
    }

    /// Appends `pharmacy`. The caller supplies a fresh id.
    pub async fn add(&self, pharmacy: Pharmacy) {
        let mut state = self.state.lock().await;
        debug!(id = %pharmacy.id, name = %pharmacy.name, "Adding pharmacy");

        state.pharmacies.push(pharmacy);
        self.persistence.save(PHARMACIES_KEY, &state.pharmacies).await;
    }

    /// Replaces the pharmacy with the same id. Unknown ids are a no-op.
    ///
    /// Returns whether a record was replaced.
    pub async fn update(&self, pharmacy: Pharmacy) -> bool {
        let mut state = self.state.lock().await;

        let Some(slot) = state.pharmacies.iter_mut().find(|p| p.id == pharmacy.id) else {
            debug!(id = %pharmacy.id, "Update ignored, pharmacy not found");
            return false;
        };
        *slot = pharmacy.clone();
        self.persistence.save(PHARMACIES_KEY, &state.pharmacies).await;

        if state.active.as_ref().is_some_and(|a| a.id == pharmacy.id) {
            state.active = Some(pharmacy);
            self.persist_active(&state.active).await;
        }

        debug!("Pharmacy updated");
        true
    }

    /// Removes the pharmacy with `id`. Unknown ids are a no-op.
    ///
    /// Deleting the active pharmacy selects the first remaining one, or none.
    pub async fn delete(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;

        let before = state.pharmacies.len();
        state.pharmacies.retain(|p| p.id != id);
        if state.pharmacies.len() == before {
            debug!(id, "Delete ignored, pharmacy not found");
            return false;
        }
        self.persistence.save(PHARMACIES_KEY, &state.pharmacies).await;

        if state.active.as_ref().is_some_and(|a| a.id == id) {
            state.active = state.pharmacies.first().cloned();
            debug!(
                new_active = state.active.as_ref().map(|p| p.id.as_str()),
                "Active pharmacy deleted"
            );
            self.persist_active(&state.active).await;
        }

        true
    }

    /// Whether this store has fallen back to in-memory only.
    pub fn is_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    async fn persist_active(&self, active: &Option<Pharmacy>) {
        match active {
            Some(pharmacy) => self.persistence.save(ACTIVE_PHARMACY_KEY, pharmacy).await,
            None => self.persistence.remove(ACTIVE_PHARMACY_KEY).await,
        }
    }
}
