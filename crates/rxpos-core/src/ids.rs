//! # Identifier Generation
//!
//! Time-based tokens for products and pharmacies, random numerals for
//! transactions. The clock and the random source are passed in.
//!
//! ```text
//! Product      med-lq9x2k1c            (base36 epoch millis)
//! Imported     med-lq9x2k1c-3          (+ record ordinal)
//! Pharmacy     pharmacy-lq9x2k1c
//! Transaction  RX-482913               (six random digits)
//! ```

use chrono::{DateTime, Utc};
use rand::Rng;

const PRODUCT_PREFIX: &str = "med-";
const PHARMACY_PREFIX: &str = "pharmacy-";
const TRANSACTION_PREFIX: &str = "RX-";

/// Inclusive bounds of the six-digit transaction numeral.
const TRANSACTION_MIN: u32 = 100_000;
const TRANSACTION_MAX: u32 = 999_999;

/// Encodes a non-negative integer in lowercase base 36.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    // Only ASCII digits/letters are pushed.
    String::from_utf8_lossy(&out).into_owned()
}

fn millis_token(now: DateTime<Utc>) -> String {
    to_base36(now.timestamp_millis().max(0) as u64)
}

/// Id for a product entered through the manual add form.
pub fn generate_product_id(now: DateTime<Utc>) -> String {
    format!("{}{}", PRODUCT_PREFIX, millis_token(now))
}

/// Id for an imported product record that carried none.
///
/// The ordinal is the record's position in the import batch.
pub fn synthesize_import_id(now_ms: i64, ordinal: usize) -> String {
    format!(
        "{}{}-{}",
        PRODUCT_PREFIX,
        to_base36(now_ms.max(0) as u64),
        ordinal
    )
}

/// Id for a newly registered pharmacy.
pub fn generate_pharmacy_id(now: DateTime<Utc>) -> String {
    format!("{}{}", PHARMACY_PREFIX, millis_token(now))
}

/// Transaction id: `RX-` followed by six random digits.
///
/// Uniqueness is not guaranteed here; see the checkout command.
pub fn generate_transaction_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let numeral = rng.gen_range(TRANSACTION_MIN..=TRANSACTION_MAX);
    format!("{}{}", TRANSACTION_PREFIX, numeral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_product_and_pharmacy_ids() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(generate_product_id(now), "med-loyw3v28");
        assert_eq!(generate_pharmacy_id(now), "pharmacy-loyw3v28");
    }

    #[test]
    fn test_import_ids_differ_by_ordinal() {
        let a = synthesize_import_id(1_700_000_000_000, 0);
        let b = synthesize_import_id(1_700_000_000_000, 1);
        assert_eq!(a, "med-loyw3v28-0");
        assert_ne!(a, b);
    }

    #[test]
    fn test_transaction_id_format() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let id = generate_transaction_id(&mut rng);
            assert!(id.starts_with("RX-"));
            let digits = &id[3..];
            assert_eq!(digits.len(), 6);
            let n: u32 = digits.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }
}
