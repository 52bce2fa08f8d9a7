//! # Product Commands
//!
//! Catalog browsing on the POS screen and catalog management.
//!
//! ## Bulk Import Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bulk Import Flow                                     │
//! │                                                                         │
//! │  User pastes text into the import dialog                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  import_products(text)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Stage 1: JSON? ─── no ──► CSV table      │──► neither? {0, 1}      │
//! │  └───────────────────────────────────────────┘                         │
//! │       │ untyped records                                                │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Stage 2: coerce + validate each record   │──► rejects counted      │
//! │  └───────────────────────────────────────────┘                         │
//! │       │ products                                                       │
//! │       ▼                                                                 │
//! │  ProductStore upsert (one persist)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "Imported N products, M failed"                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use rxpos_core::ids::generate_product_id;
use rxpos_core::transfer::PRODUCTS_EXPORT_FILENAME;
use rxpos_core::validation::{
    validate_price, validate_product, validate_product_name, validate_stock,
};
use rxpos_core::{ImportReport, Product, ALL_FILTER, DEFAULT_CATEGORY};
use rxpos_db::ProductStore;

use super::ExportFile;
use crate::error::ApiError;

/// Form input for a new product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    /// Signed so a negative entry is reported rather than rejected by the decoder.
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub requires_prescription: bool,
}

/// Lists the whole catalog in display order.
pub async fn get_products(products: &ProductStore) -> Vec<Product> {
    debug!("get_products command");
    products.list().await
}

/// Gets a single product.
pub async fn get_product(products: &ProductStore, id: String) -> Result<Product, ApiError> {
    debug!(id = %id, "get_product command");
    products
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

/// Distinct categories of the catalog, for the category filter.
pub async fn get_categories(products: &ProductStore) -> Vec<String> {
    debug!("get_categories command");
    products.categories().await
}

/// POS screen search.
///
/// ## Arguments
/// * `term` - Matched case-insensitively against name and description
/// * `category` - Exact category, `"all"` or `None` for every category
pub async fn search_products(
    products: &ProductStore,
    term: String,
    category: Option<String>,
) -> Vec<Product> {
    let category = category.unwrap_or_else(|| ALL_FILTER.to_string());
    debug!(term = %term, category = %category, "search_products command");
    products.search(&term, &category).await
}

/// Product management search; also matches category text.
pub async fn search_inventory(products: &ProductStore, term: String) -> Vec<Product> {
    debug!(term = %term, "search_inventory command");
    products.search_for_management(&term).await
}

/// Adds a product from the manual form with a generated id.
///
/// ## Validation
/// - Name must not be blank
/// - Price must be a finite, non-negative number
/// - Stock must be a non-negative integer
pub async fn add_product(
    products: &ProductStore,
    input: NewProduct,
) -> Result<Product, ApiError> {
    debug!(name = %input.name, "add_product command");

    validate_product_name(&input.name)?;
    validate_price(input.price)?;
    let stock = validate_stock(input.stock)?;

    let category = match input.category.trim() {
        "" => DEFAULT_CATEGORY.to_string(),
        category => category.to_string(),
    };

    let product = Product {
        id: generate_product_id(Utc::now()),
        name: input.name.trim().to_string(),
        description: input.description.trim().to_string(),
        price: input.price,
        category,
        stock,
        requires_prescription: input.requires_prescription,
    };

    products.add(product.clone()).await;
    info!(id = %product.id, "Product added");
    Ok(product)
}

/// Replaces the product with the same id.
pub async fn update_product(
    products: &ProductStore,
    product: Product,
) -> Result<Product, ApiError> {
    debug!(id = %product.id, "update_product command");

    validate_product(&product)?;

    if !products.update(product.clone()).await {
        return Err(ApiError::not_found("Product", &product.id));
    }
    Ok(product)
}

/// Deletes a product. Lines already in the cart keep their snapshot.
pub async fn delete_product(products: &ProductStore, id: String) -> Result<(), ApiError> {
    debug!(id = %id, "delete_product command");

    if !products.delete(&id).await {
        return Err(ApiError::not_found("Product", &id));
    }
    Ok(())
}

/// Bulk import from pasted JSON or CSV text.
///
/// Never fails as a command: unreadable text comes back as a report with
/// zero imported and one failure.
pub async fn import_products(products: &ProductStore, text: String) -> ImportReport {
    debug!(bytes = text.len(), "import_products command");
    products.import(&text, Utc::now()).await
}

/// Catalog as a CSV download.
pub async fn export_products(products: &ProductStore) -> Result<ExportFile, ApiError> {
    debug!("export_products command");
    Ok(ExportFile {
        file_name: PRODUCTS_EXPORT_FILENAME.to_string(),
        content: products.export_csv().await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rxpos_db::{seed, MemoryStorage};
    use std::sync::Arc;

    async fn store() -> ProductStore {
        ProductStore::open(Arc::new(MemoryStorage::new()), seed::sample_products()).await
    }

    fn input(name: &str, price: f64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            category: String::new(),
            stock,
            requires_prescription: false,
        }
    }

    #[tokio::test]
    async fn test_add_product_generates_id_and_default_category() {
        let products = store().await;
        let added = add_product(&products, input("Zinc 20mg", 3.5, 12))
            .await
            .unwrap();

        assert!(added.id.starts_with("med-"));
        assert_eq!(added.category, "other");
        assert_eq!(get_product(&products, added.id.clone()).await.unwrap(), added);
        assert!(get_categories(&products).await.contains(&"other".to_string()));
    }

    #[tokio::test]
    async fn test_add_product_validation() {
        let products = store().await;

        let blank = add_product(&products, input(" ", 1.0, 1)).await.unwrap_err();
        assert_eq!(blank.code, ErrorCode::ValidationError);

        let negative_price = add_product(&products, input("Zinc", -1.0, 1))
            .await
            .unwrap_err();
        assert_eq!(negative_price.code, ErrorCode::ValidationError);

        let negative_stock = add_product(&products, input("Zinc", 1.0, -4))
            .await
            .unwrap_err();
        assert_eq!(negative_stock.message, "stock must not be negative");

        assert_eq!(
            get_products(&products).await.len(),
            seed::sample_products().len()
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_product() {
        let products = store().await;

        let mut ghost = get_product(&products, "med-1".to_string()).await.unwrap();
        ghost.id = "med-404".to_string();
        let err = update_product(&products, ghost).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = delete_product(&products, "med-404".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_search_defaults_to_all_categories() {
        let products = store().await;
        let hits = search_products(&products, "MG".to_string(), None).await;
        assert!(hits.len() > 1);

        let antibiotics =
            search_products(&products, "mg".to_string(), Some("antibiotics".to_string())).await;
        assert!(antibiotics.iter().all(|p| p.category == "antibiotics"));
        assert!(!antibiotics.is_empty());

        let by_category = search_inventory(&products, "vitamins".to_string()).await;
        assert_eq!(by_category.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_import_reports_one_failure() {
        let products = store().await;
        let report = import_products(&products, "   ".to_string()).await;
        assert_eq!(report.imported, 0);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_export_file_name() {
        let products = store().await;
        let file = export_products(&products).await.unwrap();
        assert_eq!(file.file_name, "pharmacy_products.csv");
        assert_eq!(
            file.content.lines().count(),
            seed::sample_products().len() + 1
        );
    }
}
