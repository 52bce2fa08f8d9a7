//! # Pharmacy Commands
//!
//! Pharmacy locations and which one the POS is selling for.
//!
//! ## Active Pharmacy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_pharmacy ──────────► appended, becomes active                     │
//! │  select_pharmacy ───────► becomes active                               │
//! │  update_pharmacy ───────► if it is the active one, active is refreshed │
//! │  delete_pharmacy ───────► if it was active: first remaining, or none   │
//! │                                                                         │
//! │  No active pharmacy ⇒ checkout fails with NO_ACTIVE_PHARMACY           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use rxpos_core::ids::generate_pharmacy_id;
use rxpos_core::validation::validate_pharmacy_details;
use rxpos_core::Pharmacy;
use rxpos_db::PharmacyStore;

use crate::error::ApiError;

/// Form input for a new pharmacy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPharmacy {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Lists all pharmacies in display order.
pub async fn get_pharmacies(pharmacies: &PharmacyStore) -> Vec<Pharmacy> {
    debug!("get_pharmacies command");
    pharmacies.list().await
}

/// Gets the pharmacy sales are currently attributed to.
pub async fn get_active_pharmacy(pharmacies: &PharmacyStore) -> Option<Pharmacy> {
    debug!("get_active_pharmacy command");
    pharmacies.active().await
}

/// Makes the pharmacy with `id` the active one.
pub async fn select_pharmacy(
    pharmacies: &PharmacyStore,
    id: String,
) -> Result<Pharmacy, ApiError> {
    debug!(id = %id, "select_pharmacy command");

    let pharmacy = pharmacies
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Pharmacy", &id))?;

    pharmacies.set_active(pharmacy.clone()).await;
    info!(id = %pharmacy.id, name = %pharmacy.name, "Active pharmacy changed");
    Ok(pharmacy)
}

/// Registers a new pharmacy and makes it active.
///
/// ## Validation
/// Name and address are required; phone defaults to empty.
pub async fn add_pharmacy(
    pharmacies: &PharmacyStore,
    input: NewPharmacy,
) -> Result<Pharmacy, ApiError> {
    debug!(name = %input.name, "add_pharmacy command");

    validate_pharmacy_details(&input.name, &input.address)?;

    let pharmacy = Pharmacy {
        id: generate_pharmacy_id(Utc::now()),
        name: input.name.trim().to_string(),
        address: input.address.trim().to_string(),
        phone: input.phone.unwrap_or_default().trim().to_string(),
    };

    pharmacies.add(pharmacy.clone()).await;
    pharmacies.set_active(pharmacy.clone()).await;

    info!(id = %pharmacy.id, "Pharmacy added");
    Ok(pharmacy)
}

/// Replaces the stored record with the same id.
pub async fn update_pharmacy(
    pharmacies: &PharmacyStore,
    pharmacy: Pharmacy,
) -> Result<Pharmacy, ApiError> {
    debug!(id = %pharmacy.id, "update_pharmacy command");

    validate_pharmacy_details(&pharmacy.name, &pharmacy.address)?;

    if !pharmacies.update(pharmacy.clone()).await {
        return Err(ApiError::not_found("Pharmacy", &pharmacy.id));
    }
    Ok(pharmacy)
}

/// Deletes a pharmacy. Returns the active pharmacy afterwards.
///
/// Recorded sales keep the deleted id; the dashboard export shows them as
/// "Unknown".
pub async fn delete_pharmacy(
    pharmacies: &PharmacyStore,
    id: String,
) -> Result<Option<Pharmacy>, ApiError> {
    debug!(id = %id, "delete_pharmacy command");

    if !pharmacies.delete(&id).await {
        return Err(ApiError::not_found("Pharmacy", &id));
    }

    let active = pharmacies.active().await;
    info!(
        id = %id,
        active = active.as_ref().map(|p| p.id.as_str()).unwrap_or("none"),
        "Pharmacy deleted"
    );
    Ok(active)
}
