//! # Bulk Transfer
//!
//! Product import from pasted JSON/CSV text and CSV export of the catalog.
//!
//! ## Import Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  text ──► Stage 1: parse_payload ──► Vec<RawRecord> (untyped)          │
//! │           ├── JSON array  → one record per element                     │
//! │           ├── JSON value  → one record                                 │
//! │           └── otherwise   → CSV: header row + positional values         │
//! │                  │                                                      │
//! │                  │  neither → MalformedImportPayload (whole batch)      │
//! │                  ▼                                                      │
//! │        Stage 2: coerce_record ──► Product  or  ValidationError          │
//! │                  (per record: a bad record is counted, never stored)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## CSV Dialect
//! Plain comma separation with no quoting, read and written with the `csv`
//! crate. A comma inside a value shifts the columns; export substitutes `;`
//! for commas in name and description so that exported files import
//! cleanly. Columns with a blank header name are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::ids::synthesize_import_id;
use crate::types::Product;
use crate::validation::{validate_price, validate_product_name};
use crate::DEFAULT_CATEGORY;

/// Header row of the product export (also the import example).
pub const PRODUCTS_EXPORT_HEADER: &str =
    "id,name,description,price,category,stock,requiresPrescription";

/// File name offered for the product export.
pub const PRODUCTS_EXPORT_FILENAME: &str = "pharmacy_products.csv";

/// Untyped record produced by stage 1.
pub type RawRecord = Value;

// =============================================================================
// Report Types
// =============================================================================

/// A record rejected during stage 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportFailure {
    /// Zero-based position of the record in the batch.
    pub ordinal: usize,
    pub reason: String,
}

/// Outcome of one bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// Report for a payload that could not be parsed at all.
    pub fn malformed(reason: impl Into<String>) -> Self {
        ImportReport {
            imported: 0,
            failed: 1,
            failures: vec![ImportFailure {
                ordinal: 0,
                reason: reason.into(),
            }],
        }
    }
}

/// Stage 2 output: accepted products in input order plus the rejects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub products: Vec<Product>,
    pub failures: Vec<ImportFailure>,
}

impl ImportBatch {
    /// Report for this batch once its products have been stored.
    pub fn report(&self) -> ImportReport {
        ImportReport {
            imported: self.products.len(),
            failed: self.failures.len(),
            failures: self.failures.clone(),
        }
    }
}

// =============================================================================
// Stage 1: Parse
// =============================================================================

/// Parses pasted text into untyped records.
///
/// JSON is tried first; anything that is not JSON is read as CSV.
pub fn parse_payload(text: &str) -> CoreResult<Vec<RawRecord>> {
    if text.trim().is_empty() {
        return Err(CoreError::MalformedImportPayload {
            reason: "payload is empty".to_string(),
        });
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(record) => Ok(vec![record]),
        Err(_) => parse_csv(text),
    }
}

fn parse_csv(text: &str) -> CoreResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(malformed)?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(CoreError::MalformedImportPayload {
            reason: "CSV header row has no column names".to_string(),
        });
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(malformed)?;
        if row.iter().all(str::is_empty) {
            continue;
        }

        // Blank header names are unpaired columns.
        let record: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.to_string(), Value::String(value.to_string())))
            .collect();
        records.push(Value::Object(record));
    }

    Ok(records)
}

fn malformed(err: csv::Error) -> CoreError {
    CoreError::MalformedImportPayload {
        reason: err.to_string(),
    }
}

// =============================================================================
// Stage 2: Coerce
// =============================================================================

/// Coerces one untyped record into a product.
///
/// ## Rules
/// - `name`: required, non-blank
/// - `price`: required; numeric text is parsed, must be finite and ≥ 0
/// - `stock`: defaults to 0, must be finite, ≥ 0 and fit in a `u32`;
///   fraction dropped
/// - `requiresPrescription`: `true`, the text "true" in any case, or a
///   nonzero number
/// - `description` defaults to `""`, `category` to `"other"`
/// - a missing or empty `id` is synthesized from `now_ms` and `ordinal`
pub fn coerce_record(
    record: &RawRecord,
    ordinal: usize,
    now_ms: i64,
) -> Result<Product, ValidationError> {
    let Value::Object(fields) = record else {
        return Err(ValidationError::InvalidFormat {
            field: "record".to_string(),
            reason: "expected an object".to_string(),
        });
    };

    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Null) | None => return Err(ValidationError::required("name")),
        Some(_) => {
            return Err(ValidationError::InvalidFormat {
                field: "name".to_string(),
                reason: "expected text".to_string(),
            })
        }
    };
    validate_product_name(&name)?;

    let price = match fields.get("price") {
        Some(value) => to_number("price", value)?,
        None => return Err(ValidationError::required("price")),
    };
    validate_price(price)?;

    let stock = match fields.get("stock") {
        Some(value) => to_number("stock", value)?,
        None => 0.0,
    };
    if !stock.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field: "stock".to_string(),
            value: stock.to_string(),
        });
    }
    if stock < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }
    if stock > u32::MAX as f64 {
        return Err(ValidationError::InvalidNumber {
            field: "stock".to_string(),
            value: stock.to_string(),
        });
    }

    let id = text_field(fields, "id")
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| synthesize_import_id(now_ms, ordinal));

    Ok(Product {
        id,
        name,
        description: text_field(fields, "description").unwrap_or_default(),
        price,
        category: text_field(fields, "category")
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        // In range; fractional stock is truncated.
        stock: stock as u32,
        requires_prescription: to_flag(fields.get("requiresPrescription")),
    })
}

/// Runs stage 2 over every record, collecting accepted products and rejects.
pub fn coerce_records(records: &[RawRecord], now_ms: i64) -> ImportBatch {
    let mut batch = ImportBatch::default();

    for (ordinal, record) in records.iter().enumerate() {
        match coerce_record(record, ordinal, now_ms) {
            Ok(product) => batch.products.push(product),
            Err(err) => batch.failures.push(ImportFailure {
                ordinal,
                reason: err.to_string(),
            }),
        }
    }

    batch
}

/// Both stages. A malformed payload fails the whole batch.
pub fn parse_products(text: &str, now_ms: i64) -> CoreResult<ImportBatch> {
    let records = parse_payload(text)?;
    Ok(coerce_records(&records, now_ms))
}

fn to_number(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(0.0)
            } else {
                s.parse::<f64>().map_err(|_| invalid())
            }
        }
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Ok(0.0),
        Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

fn to_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// =============================================================================
// Export
// =============================================================================

/// Catalog export, one row per product, newline terminated.
///
/// Commas in name and description become `;`. Other fields are written
/// as-is.
pub fn export_products_csv(products: &[Product]) -> CoreResult<String> {
    let mut writer = unquoted_writer();
    writer.write_record(PRODUCTS_EXPORT_HEADER.split(','))?;

    for p in products {
        writer.write_record([
            p.id.clone(),
            p.name.replace(',', ";"),
            p.description.replace(',', ";"),
            p.price.to_string(),
            p.category.clone(),
            p.stock.to_string(),
            p.requires_prescription.to_string(),
        ])?;
    }

    finish(writer)
}

/// Writer for the export dialect: never quoted, `\n` after every row.
pub(crate) fn unquoted_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

pub(crate) fn finish(writer: csv::Writer<Vec<u8>>) -> CoreResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|err| CoreError::Export(err.error().to_string()))?;
    String::from_utf8(bytes).map_err(|err| CoreError::Export(err.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
