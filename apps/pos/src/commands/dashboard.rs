//! # Dashboard Commands
//!
//! Sales reporting across pharmacies.
//!
//! Both commands take the same selection the dashboard screen shows:
//! a pharmacy filter (`"all"` or a pharmacy id) and an inclusive date range
//! defaulting to the last 30 days.

use chrono::{DateTime, Utc};
use tracing::debug;

use rxpos_core::dashboard::{
    export_sales_csv, filter_sales, sales_export_filename, summarize, DashboardSummary, DateRange,
};
use rxpos_core::{PharmacyFilter, ALL_FILTER};
use rxpos_db::{PharmacyStore, SaleStore};

use super::ExportFile;
use crate::error::ApiError;

fn selection(
    pharmacy: Option<String>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> (PharmacyFilter, DateRange) {
    let filter = PharmacyFilter::from(pharmacy.as_deref().unwrap_or(ALL_FILTER));

    let default = DateRange::default_range(Utc::now());
    let range = DateRange::new(from.unwrap_or(default.from), to.unwrap_or(default.to));

    (filter, range)
}

/// Totals, pharmacy ranking, top products and recent sales for a selection.
pub async fn get_dashboard(
    pharmacies: &PharmacyStore,
    sales: &SaleStore,
    pharmacy: Option<String>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> DashboardSummary {
    let (filter, range) = selection(pharmacy, from, to);
    debug!(filter = ?filter, from = %range.from, to = %range.to, "get_dashboard command");

    let sales = sales.list().await;
    let pharmacies = pharmacies.list().await;
    summarize(&sales, &pharmacies, &filter, range)
}

/// Filtered sales as a CSV download named after the date range.
pub async fn export_sales(
    pharmacies: &PharmacyStore,
    sales: &SaleStore,
    pharmacy: Option<String>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<ExportFile, ApiError> {
    let (filter, range) = selection(pharmacy, from, to);
    debug!(filter = ?filter, from = %range.from, to = %range.to, "export_sales command");

    let sales = sales.list().await;
    let pharmacies = pharmacies.list().await;
    let filtered = filter_sales(&sales, &filter, &range);

    Ok(ExportFile {
        file_name: sales_export_filename(&range),
        content: export_sales_csv(&filtered, &pharmacies)?,
    })
}
