//! # Receipt
//!
//! Detached receipt view produced at checkout and its plain-text rendering.
//!
//! ## Layout (width 40)
//! ```text
//!           Main Street Pharmacy
//!           123 Main St, Nairobi
//!            Tel: 020-123-4567
//! ----------------------------------------
//! Transaction:                   RX-123456
//! Date:                2024-03-01 09:00:00
//! ----------------------------------------
//! Paracetamol 500mg
//!   2 x $10.00                      $20.00
//! ----------------------------------------
//! Subtotal:                         $20.00
//! Tax (7%):                          $1.40
//! Total:                            $21.40
//! Payment:                            cash
//! ----------------------------------------
//!       Thank you for your purchase!
//! Please keep this receipt for your records.
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{CurrencyFormatter, SALES_TAX};
use crate::types::{Pharmacy, Sale};

/// Narrowest width the renderer will lay out.
pub const MIN_RECEIPT_WIDTH: usize = 24;

const THANK_YOU: &str = "Thank you for your purchase!";
const KEEP_RECEIPT: &str = "Please keep this receipt for your records.";

/// One printed line of the receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

/// Receipt for a completed sale.
///
/// Owns copies of everything it shows, so it outlives the cart it came from
/// and later edits to the pharmacy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Receipt {
    pub transaction_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub pharmacy_address: String,
    pub pharmacy_phone: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub payment_method: String,
}

impl Receipt {
    /// Builds the receipt for `sale` recorded at `pharmacy`.
    pub fn new(sale: &Sale, pharmacy: &Pharmacy) -> Self {
        Receipt {
            transaction_id: sale.id.clone(),
            date: sale.date,
            pharmacy_id: pharmacy.id.clone(),
            pharmacy_name: pharmacy.name.clone(),
            pharmacy_address: pharmacy.address.clone(),
            pharmacy_phone: pharmacy.phone.clone(),
            lines: sale
                .items
                .iter()
                .map(|item| ReceiptLine {
                    name: item.product_name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total: item.total,
                })
                .collect(),
            subtotal: sale.subtotal,
            tax: sale.tax,
            total: sale.total,
            payment_method: sale.payment_method.clone(),
        }
    }

    /// Renders a fixed-width plain-text receipt for printing.
    ///
    /// `width` below [`MIN_RECEIPT_WIDTH`] is raised to it. Text longer than
    /// the width is not wrapped.
    pub fn render_text(&self, width: usize, fmt: &CurrencyFormatter) -> String {
        let width = width.max(MIN_RECEIPT_WIDTH);
        let rule = "-".repeat(width);
        let mut out: Vec<String> = Vec::new();

        out.push(center(&self.pharmacy_name, width));
        if !self.pharmacy_address.is_empty() {
            out.push(center(&self.pharmacy_address, width));
        }
        if !self.pharmacy_phone.is_empty() {
            out.push(center(&format!("Tel: {}", self.pharmacy_phone), width));
        }

        out.push(rule.clone());
        out.push(columns("Transaction:", &self.transaction_id, width));
        out.push(columns(
            "Date:",
            &self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            width,
        ));
        out.push(rule.clone());

        for line in &self.lines {
            out.push(line.name.clone());
            out.push(columns(
                &format!("  {} x {}", line.quantity, fmt.format(line.unit_price)),
                &fmt.format(line.total),
                width,
            ));
        }

        out.push(rule.clone());
        out.push(columns("Subtotal:", &fmt.format(self.subtotal), width));
        out.push(columns(
            &format!("Tax ({}%):", SALES_TAX.percentage()),
            &fmt.format(self.tax),
            width,
        ));
        out.push(columns("Total:", &fmt.format(self.total), width));
        out.push(columns("Payment:", &self.payment_method, width));
        out.push(rule);

        out.push(center(THANK_YOU, width));
        out.push(center(KEEP_RECEIPT, width));

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

fn columns(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = if used < width { width - used } else { 1 };
    format!("{}{}{}", left, " ".repeat(gap), right)
}
