//! # Money Module
//!
//! Tax rate, line arithmetic and the fixed currency formatter.
//!
//! ## Why Floating Point Here?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STORED AMOUNTS ARE IEEE-754 DOUBLES                                    │
//! │                                                                         │
//! │  Existing storage documents hold prices and totals as JSON numbers     │
//! │  produced by double arithmetic:                                         │
//! │    subtotal 20.00 × 0.07 = 1.4000000000000001                          │
//! │                                                                         │
//! │  Recomputing those in integer cents would give 1.40 exactly and the    │
//! │  dashboard sums would drift from the recorded sales. So:               │
//! │    • arithmetic stays in f64, same operation order as recorded         │
//! │    • rounding to cents happens ONLY in CurrencyFormatter               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rxpos_core::money::{CurrencyFormatter, SALES_TAX};
//!
//! let subtotal = 20.0;
//! let tax = SALES_TAX.apply(subtotal);
//! assert!((tax - 1.40).abs() < 1e-9);
//!
//! let fmt = CurrencyFormatter::default();
//! assert_eq!(fmt.format(subtotal + tax), "$21.40");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 700 bps = 7%.
/// `700.0 / 10000.0` is correctly rounded to the same double as the literal
/// `0.07`, so [`TaxRate::apply`] matches `subtotal * 0.07` bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

/// The fixed sales tax applied at checkout. Not configurable.
pub const SALES_TAX: TaxRate = TaxRate::from_bps(700);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (700 bps → 0.07).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Calculates the tax owed on `amount`.
    #[inline]
    pub fn apply(&self, amount: f64) -> f64 {
        amount * self.fraction()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        SALES_TAX
    }
}

// =============================================================================
// Line Arithmetic
// =============================================================================

/// Line total: unit price × quantity.
#[inline]
pub fn line_total(unit_price: f64, quantity: u32) -> f64 {
    unit_price * quantity as f64
}

// =============================================================================
// Currency Formatter
// =============================================================================

/// Most fraction digits [`CurrencyFormatter::format`] will show.
pub const MAX_CURRENCY_DECIMALS: u8 = 6;

/// Fixed currency formatter used for receipts and dashboard figures.
///
/// ## Format
/// Symbol prefix, thousands grouped with commas, `decimals` fraction digits,
/// minus sign before the symbol: `-$1,234.50`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormatter {
    /// Currency symbol (for display)
    pub symbol: String,

    /// Number of decimal places; display stops at `MAX_CURRENCY_DECIMALS`
    pub decimals: u8,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        CurrencyFormatter {
            symbol: "$".to_string(),
            decimals: 2,
        }
    }
}

impl CurrencyFormatter {
    /// Creates a formatter with the given symbol and precision.
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        CurrencyFormatter {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Formats an amount, rounding half away from zero to `decimals` places.
    ///
    /// Non-finite input is shown as zero rather than "NaN".
    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let decimals = self.decimals.min(MAX_CURRENCY_DECIMALS);
        let divisor = 10_i64.pow(decimals as u32);
        let units = (amount * divisor as f64).round() as i64;

        let whole = (units / divisor).abs();
        let frac = (units % divisor).abs();

        let sign = if units < 0 { "-" } else { "" };
        let whole = group_thousands(whole);

        if decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.symbol,
                whole,
                frac,
                width = decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.symbol, whole)
        }
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_tax_fraction_matches_literal() {
        assert_eq!(SALES_TAX.bps(), 700);
        assert_eq!(SALES_TAX.fraction(), 0.07);
        assert!((SALES_TAX.percentage() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_tax_apply_is_plain_multiplication() {
        for subtotal in [0.0, 1.0, 5.99, 20.0, 123.45, 9999.99] {
            assert_eq!(SALES_TAX.apply(subtotal), subtotal * 0.07);
        }
        assert!((SALES_TAX.apply(20.0) - 1.40).abs() < 1e-9);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(10.0, 2), 20.0);
        assert_eq!(line_total(5.99, 0), 0.0);
    }

    #[test]
    fn test_format_currency_positive() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format(12.34), "$12.34");
        assert_eq!(fmt.format(1.0), "$1.00");
        assert_eq!(fmt.format(0.01), "$0.01");
        assert_eq!(fmt.format(0.0), "$0.00");
        assert_eq!(fmt.format(1.4000000000000001), "$1.40");
    }

    #[test]
    fn test_format_currency_negative() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format(-12.34), "-$12.34");
    }

    #[test]
    fn test_format_currency_grouping() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format(1_234_567.891), "$1,234,567.89");
        assert_eq!(fmt.format(999.999), "$1,000.00");
    }

    #[test]
    fn test_format_currency_custom() {
        let fmt = CurrencyFormatter::new("KSh ", 0);
        assert_eq!(fmt.format(1500.4), "KSh 1,500");
    }

    #[test]
    fn test_format_caps_decimals() {
        let fmt = CurrencyFormatter::new("$", 30);
        assert_eq!(fmt.format(1.5), "$1.500000");
    }

    #[test]
    fn test_format_non_finite() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format(f64::NAN), "$0.00");
    }
}
