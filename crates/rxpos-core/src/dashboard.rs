//! # Dashboard Aggregation
//!
//! Stateless functions over recorded sales for the sales dashboard.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   all sales ──► filter_sales(pharmacy, [from, to]) ──► filtered         │
//! │                                                      │                  │
//! │        ┌───────────────┬──────────────┬──────────────┼──────────────┐   │
//! │        ▼               ▼              ▼              ▼              ▼   │
//! │     totals        by_pharmacy    top_products   recent_sales   export   │
//! │   sum/count/avg   every pharmacy  top 10 by     newest 10      CSV      │
//! │                   + rank by total revenue                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both ends of the date range are inclusive. Sums are taken in sale order
//! so repeated runs give identical results.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::transfer::{finish, unquoted_writer};
use crate::types::{Pharmacy, PharmacyFilter, Sale};
use crate::{DEFAULT_DASHBOARD_DAYS, RECENT_SALES_LIMIT, TOP_PRODUCTS_LIMIT, UNKNOWN_PHARMACY};

/// Header row of the sales export.
pub const SALES_EXPORT_HEADER: &str = "Date,Transaction ID,Pharmacy,Items,Subtotal,Tax,Total";

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive date range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub from: DateTime<Utc>,
    #[ts(as = "String")]
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        DateRange { from, to }
    }

    /// The last 30 days ending at `now`.
    pub fn default_range(now: DateTime<Utc>) -> Self {
        DateRange {
            from: now - Duration::days(DEFAULT_DASHBOARD_DAYS),
            to: now,
        }
    }

    /// Whether `date` falls in the range; equality at either end counts.
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        date >= self.from && date <= self.to
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Sales at the selected pharmacy (or any) dated inside `range`.
pub fn filter_sales<'a>(
    sales: &'a [Sale],
    pharmacy: &PharmacyFilter,
    range: &DateRange,
) -> Vec<&'a Sale> {
    sales
        .iter()
        .filter(|s| pharmacy.matches(&s.pharmacy_id) && range.contains(s.date))
        .collect()
}

// =============================================================================
// Totals
// =============================================================================

/// Headline figures of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesTotals {
    pub total_sales: f64,
    pub transaction_count: usize,
    /// 0 when there are no transactions.
    pub average_ticket: f64,
}

pub fn totals(filtered: &[&Sale]) -> SalesTotals {
    let total_sales: f64 = filtered.iter().map(|s| s.total).sum();
    let transaction_count = filtered.len();
    let average_ticket = if transaction_count > 0 {
        total_sales / transaction_count as f64
    } else {
        0.0
    };

    SalesTotals {
        total_sales,
        transaction_count,
        average_ticket,
    }
}

// =============================================================================
// By Pharmacy
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PharmacySales {
    pub id: String,
    pub name: String,
    pub transaction_count: usize,
    pub total: f64,
    /// Percent of the selection's total sales; 0 when there are none.
    pub share: f64,
}

/// One row per known pharmacy, in pharmacy list order, including pharmacies
/// with no matching sales. `share` is filled in by [`with_shares`].
pub fn by_pharmacy(filtered: &[&Sale], pharmacies: &[Pharmacy]) -> Vec<PharmacySales> {
    pharmacies
        .iter()
        .map(|pharmacy| {
            let (transaction_count, total) = filtered
                .iter()
                .filter(|s| s.pharmacy_id == pharmacy.id)
                .fold((0usize, 0.0f64), |(count, sum), s| (count + 1, sum + s.total));

            PharmacySales {
                id: pharmacy.id.clone(),
                name: pharmacy.name.clone(),
                transaction_count,
                total,
                share: 0.0,
            }
        })
        .collect()
}

/// Display order: total descending, ties keep list order.
pub fn rank_by_total(mut rows: Vec<PharmacySales>) -> Vec<PharmacySales> {
    rows.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    rows
}

/// Sets each row's `share` of `total_sales`.
pub fn with_shares(mut rows: Vec<PharmacySales>, total_sales: f64) -> Vec<PharmacySales> {
    for row in &mut rows {
        row.share = share_of_total(row.total, total_sales);
    }
    rows
}

/// Share of `total_sales` in percent; 0 when there are no sales.
pub fn share_of_total(pharmacy_total: f64, total_sales: f64) -> f64 {
    if total_sales > 0.0 {
        pharmacy_total / total_sales * 100.0
    } else {
        0.0
    }
}

// =============================================================================
// By Product
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSales {
    pub product_id: String,
    /// Name from the first line item encountered for this product.
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Per-product quantity and revenue across every line of every sale.
///
/// Rows come out in order of first encounter.
pub fn by_product(filtered: &[&Sale]) -> Vec<ProductSales> {
    let mut rows: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sale in filtered {
        for item in &sale.items {
            let slot = *index.entry(item.product_id.as_str()).or_insert_with(|| {
                rows.push(ProductSales {
                    product_id: item.product_id.clone(),
                    name: item.product_name.clone(),
                    quantity: 0,
                    revenue: 0.0,
                });
                rows.len() - 1
            });

            rows[slot].quantity += item.quantity as u64;
            rows[slot].revenue += item.total;
        }
    }

    rows
}

/// The top `TOP_PRODUCTS_LIMIT` products by revenue, descending.
///
/// The sort is stable, so equal revenues keep encounter order.
pub fn top_products(filtered: &[&Sale]) -> Vec<ProductSales> {
    let mut rows = by_product(filtered);
    rows.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal));
    rows.truncate(TOP_PRODUCTS_LIMIT);
    rows
}

// =============================================================================
// Recent Sales
// =============================================================================

/// The newest `RECENT_SALES_LIMIT` sales, newest first.
pub fn recent_sales(filtered: &[&Sale]) -> Vec<Sale> {
    let mut sales: Vec<Sale> = filtered.iter().map(|s| (*s).clone()).collect();
    sales.sort_by(|a, b| b.date.cmp(&a.date));
    sales.truncate(RECENT_SALES_LIMIT);
    sales
}

// =============================================================================
// Summary
// =============================================================================

/// Everything the dashboard screen shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    pub range: DateRange,
    pub totals: SalesTotals,
    /// Ranked by total, descending, each with its share of the total.
    pub pharmacies: Vec<PharmacySales>,
    pub top_products: Vec<ProductSales>,
    pub recent_sales: Vec<Sale>,
}

pub fn summarize(
    sales: &[Sale],
    pharmacies: &[Pharmacy],
    pharmacy: &PharmacyFilter,
    range: DateRange,
) -> DashboardSummary {
    let filtered = filter_sales(sales, pharmacy, &range);
    let totals = totals(&filtered);
    let rows = with_shares(by_pharmacy(&filtered, pharmacies), totals.total_sales);

    DashboardSummary {
        range,
        totals,
        pharmacies: rank_by_total(rows),
        top_products: top_products(&filtered),
        recent_sales: recent_sales(&filtered),
    }
}

// =============================================================================
// CSV Export
// =============================================================================

/// Sales export, one row per sale, newline terminated.
///
/// Fields are not quoted. Commas in a pharmacy name are replaced with `;`
/// to keep the columns aligned.
pub fn export_sales_csv(filtered: &[&Sale], pharmacies: &[Pharmacy]) -> CoreResult<String> {
    let mut writer = unquoted_writer();
    writer.write_record(SALES_EXPORT_HEADER.split(','))?;

    for sale in filtered {
        let pharmacy = pharmacies
            .iter()
            .find(|p| p.id == sale.pharmacy_id)
            .map(|p| p.name.replace(',', ";"))
            .unwrap_or_else(|| UNKNOWN_PHARMACY.to_string());

        writer.write_record([
            sale.date.format("%-m/%-d/%Y").to_string(),
            sale.id.clone(),
            pharmacy,
            sale.item_count().to_string(),
            sale.subtotal.to_string(),
            sale.tax.to_string(),
            sale.total.to_string(),
        ])?;
    }

    finish(writer)
}

/// `pharmacy_sales_<from>_to_<to>.csv` with `yyyy-MM-dd` dates.
pub fn sales_export_filename(range: &DateRange) -> String {
    format!(
        "pharmacy_sales_{}_to_{}.csv",
        range.from.format("%Y-%m-%d"),
        range.to.format("%Y-%m-%d")
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleItem;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn item(product_id: &str, name: &str, quantity: u32, total: f64) -> SaleItem {
        SaleItem {
            product_id: product_id.to_string(),
            product_name: name.to_string(),
            quantity,
            unit_price: total / quantity as f64,
            total,
        }
    }

    fn sale(id: &str, pharmacy_id: &str, date: DateTime<Utc>, items: Vec<SaleItem>) -> Sale {
        let subtotal: f64 = items.iter().map(|i| i.total).sum();
        let tax = subtotal * 0.07;
        Sale {
            id: id.to_string(),
            pharmacy_id: pharmacy_id.to_string(),
            items,
            subtotal,
            tax,
            total: subtotal + tax,
            date,
            payment_method: "cash".to_string(),
        }
    }

    fn pharmacies() -> Vec<Pharmacy> {
        vec![
            Pharmacy::new("pharmacy-1", "Main Street Pharmacy", "123 Main St", ""),
            Pharmacy::new("pharmacy-2", "Westlands Health Center", "45 Westlands Rd", ""),
            Pharmacy::new("pharmacy-3", "Mombasa Road Pharmacy", "78 Mombasa Rd", ""),
        ]
    }

    #[test]
    fn test_filter_is_inclusive_at_both_ends() {
        let range = DateRange::new(at(1, 0), at(10, 0));
        let sales = vec![
            sale("RX-100001", "pharmacy-1", at(1, 0), vec![]),
            sale("RX-100002", "pharmacy-1", at(10, 0), vec![]),
            sale("RX-100003", "pharmacy-1", at(10, 1), vec![]),
            sale("RX-100004", "pharmacy-2", at(5, 0), vec![]),
        ];

        let all = filter_sales(&sales, &PharmacyFilter::All, &range);
        let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["RX-100001", "RX-100002", "RX-100004"]);

        let only = filter_sales(&sales, &PharmacyFilter::from("pharmacy-2"), &range);
        assert_eq!(only.len(), 1);
    }

    #[test]
    fn test_default_range_is_thirty_days() {
        let now = at(31, 12);
        let range = DateRange::default_range(now);
        assert_eq!(range.to, now);
        assert_eq!(range.from, at(1, 12));
    }

    #[test]
    fn test_totals_guard_empty() {
        let t = totals(&[]);
        assert_eq!(t.total_sales, 0.0);
        assert_eq!(t.transaction_count, 0);
        assert_eq!(t.average_ticket, 0.0);
    }

    #[test]
    fn test_totals() {
        let sales = vec![
            sale("RX-100001", "pharmacy-1", at(1, 0), vec![item("med-1", "A", 1, 10.0)]),
            sale("RX-100002", "pharmacy-1", at(2, 0), vec![item("med-1", "A", 3, 30.0)]),
        ];
        let refs: Vec<&Sale> = sales.iter().collect();
        let t = totals(&refs);
        assert!((t.total_sales - 42.8).abs() < 1e-9);
        assert_eq!(t.transaction_count, 2);
        assert!((t.average_ticket - 21.4).abs() < 1e-9);
    }

    #[test]
    fn test_by_pharmacy_includes_zero_rows_and_ranks() {
        let sales = vec![
            sale("RX-100001", "pharmacy-2", at(1, 0), vec![item("med-1", "A", 1, 10.0)]),
            sale("RX-100002", "pharmacy-3", at(1, 0), vec![item("med-1", "A", 2, 20.0)]),
            sale("RX-100003", "pharmacy-3", at(2, 0), vec![item("med-1", "A", 1, 10.0)]),
        ];
        let refs: Vec<&Sale> = sales.iter().collect();

        let rows = by_pharmacy(&refs, &pharmacies());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, "pharmacy-1");
        assert_eq!(rows[0].transaction_count, 0);
        assert_eq!(rows[0].total, 0.0);
        assert_eq!(rows[2].transaction_count, 2);

        let ranked = rank_by_total(rows);
        let order: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["pharmacy-3", "pharmacy-2", "pharmacy-1"]);
    }

    #[test]
    fn test_share_of_total() {
        assert!((share_of_total(25.0, 200.0) - 12.5).abs() < 1e-9);
        assert_eq!(share_of_total(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_by_product_accumulates_across_sales() {
        let sales = vec![
            sale("RX-100001", "pharmacy-1", at(1, 0), vec![item("P", "Product P", 2, 10.0)]),
            sale("RX-100002", "pharmacy-1", at(2, 0), vec![item("P", "Renamed P", 3, 15.0)]),
        ];
        let refs: Vec<&Sale> = sales.iter().collect();

        let rows = by_product(&refs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 5);
        assert!((rows[0].revenue - 25.0).abs() < 1e-9);
        assert_eq!(rows[0].name, "Product P");
    }

    #[test]
    fn test_top_products_limit_and_stable_ties() {
        let mut items = Vec::new();
        for n in 0..12 {
            items.push(item(&format!("med-{}", n), "X", 1, 5.0));
        }
        items.push(item("med-big", "Big", 1, 50.0));
        let sales = vec![sale("RX-100001", "pharmacy-1", at(1, 0), items)];
        let refs: Vec<&Sale> = sales.iter().collect();

        let top = top_products(&refs);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].product_id, "med-big");
        assert_eq!(top[1].product_id, "med-0");
        assert_eq!(top[9].product_id, "med-8");
    }

    #[test]
    fn test_recent_sales_newest_first() {
        let sales: Vec<Sale> = (1..=12)
            .map(|d| sale(&format!("RX-1000{:02}", d), "pharmacy-1", at(d, 0), vec![]))
            .collect();
        let refs: Vec<&Sale> = sales.iter().collect();

        let recent = recent_sales(&refs);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].id, "RX-100012");
        assert_eq!(recent[9].id, "RX-100003");
    }

    #[test]
    fn test_export_sales_csv() {
        let sales = vec![
            sale("RX-100001", "pharmacy-1", at(5, 9), vec![item("med-1", "A", 2, 20.0)]),
            sale("RX-100002", "pharmacy-gone", at(6, 9), vec![item("med-1", "A", 1, 10.0)]),
        ];
        let refs: Vec<&Sale> = sales.iter().collect();

        let csv = export_sales_csv(&refs, &pharmacies()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], SALES_EXPORT_HEADER);
        assert_eq!(
            lines[1],
            "3/5/2024,RX-100001,Main Street Pharmacy,2,20,1.4000000000000001,21.4"
        );
        assert!(lines[2].starts_with("3/6/2024,RX-100002,Unknown,1,10,"));
    }

    #[test]
    fn test_export_replaces_commas_in_pharmacy_name() {
        let sales = vec![sale("RX-100001", "p", at(5, 9), vec![])];
        let refs: Vec<&Sale> = sales.iter().collect();
        let pharmacies = vec![Pharmacy::new("p", "Smith, Sons & Co", "x", "")];

        let csv = export_sales_csv(&refs, &pharmacies).unwrap();
        assert!(csv.contains(",Smith; Sons & Co,"));
    }

    #[test]
    fn test_sales_export_filename() {
        let range = DateRange::new(at(1, 0), at(31, 23));
        assert_eq!(
            sales_export_filename(&range),
            "pharmacy_sales_2024-03-01_to_2024-03-31.csv"
        );
    }

    #[test]
    fn test_summarize() {
        let sales = vec![
            sale("RX-100001", "pharmacy-2", at(2, 0), vec![item("med-1", "A", 1, 10.0)]),
            sale("RX-100002", "pharmacy-1", at(3, 0), vec![item("med-2", "B", 1, 30.0)]),
        ];
        let summary = summarize(
            &sales,
            &pharmacies(),
            &PharmacyFilter::All,
            DateRange::new(at(1, 0), at(4, 0)),
        );

        assert_eq!(summary.totals.transaction_count, 2);
        assert_eq!(summary.pharmacies[0].id, "pharmacy-1");
        assert!((summary.pharmacies[0].share - 75.0).abs() < 1e-9);
        assert!((summary.pharmacies[1].share - 25.0).abs() < 1e-9);
        assert_eq!(summary.pharmacies[2].share, 0.0);
        assert_eq!(summary.top_products[0].product_id, "med-2");
        assert_eq!(summary.recent_sales[0].id, "RX-100002");
    }
}
