//! End-to-end session flows through the command layer.

use std::sync::Arc;

use chrono::{Duration, Utc};

use rxpos_app::commands::{cart, config, dashboard, pharmacy, product, sale};
use rxpos_app::{
    ApiError, AppConfig, CartState, ErrorCode, PosSession, StorageBackend, Stores,
};
use rxpos_core::{Pharmacy, Product, Receipt};
use rxpos_db::{DbConfig, MemoryStorage, SqliteStorage, Storage, UnavailableStorage};

const EPSILON: f64 = 1e-9;

fn paracetamol() -> Product {
    Product {
        id: "med-1".to_string(),
        name: "Paracetamol 500mg".to_string(),
        description: "Pain reliever".to_string(),
        price: 10.0,
        category: "pain relief".to_string(),
        stock: 5,
        requires_prescription: false,
    }
}

/// Empty session on `storage` with `med-1` in the catalog and no pharmacy.
async fn bare_session(storage: Arc<dyn Storage>, backend: StorageBackend) -> PosSession {
    let config = AppConfig {
        seed_sample_data: false,
        ..AppConfig::in_memory()
    };
    let stores = Stores::open(storage, backend, false).await;
    stores.products.add(paracetamol()).await;
    PosSession::with_stores(config, stores).await
}

async fn session_at_ph1() -> PosSession {
    let session = bare_session(Arc::new(MemoryStorage::new()), StorageBackend::Memory).await;
    let ph1 = Pharmacy::new(
        "ph-1",
        "Main Street Pharmacy",
        "123 Main St, Nairobi",
        "020-123-4567",
    );
    session.stores.pharmacies.add(ph1.clone()).await;
    session.stores.pharmacies.set_active(ph1).await;
    session
}

async fn add_twice(session: &PosSession) {
    for _ in 0..2 {
        cart::add_to_cart(&session.stores.products, &session.cart, "med-1".to_string())
            .await
            .unwrap();
    }
}

async fn checkout(session: &PosSession) -> Result<Option<Receipt>, ApiError> {
    sale::checkout(&session.stores.pharmacies, &session.stores.sales, &session.cart).await
}

#[tokio::test]
async fn test_checkout_records_one_sale_and_empties_cart() {
    let session = session_at_ph1().await;
    add_twice(&session).await;

    let before = cart::get_cart(&session.cart).totals;
    assert_eq!(before.subtotal, 20.0);
    assert!((before.tax - 1.40).abs() < EPSILON);
    assert!((before.total - 21.40).abs() < EPSILON);

    let receipt = checkout(&session).await.unwrap().unwrap();
    assert!(receipt.transaction_id.starts_with("RX-"));
    assert_eq!(receipt.pharmacy_name, "Main Street Pharmacy");
    assert_eq!(receipt.lines.len(), 1);
    assert_eq!(receipt.lines[0].quantity, 2);

    let sales = sale::get_sales(&session.stores.sales).await;
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].id, receipt.transaction_id);
    assert_eq!(sales[0].pharmacy_id, "ph-1");
    assert_eq!(sales[0].total, before.total);
    assert_eq!(sales[0].items[0].product_name, "Paracetamol 500mg");

    assert!(cart::get_cart(&session.cart).items.is_empty());
}

#[tokio::test]
async fn test_checkout_without_active_pharmacy() {
    let session = bare_session(Arc::new(MemoryStorage::new()), StorageBackend::Memory).await;
    add_twice(&session).await;

    let err = checkout(&session).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoActivePharmacy);

    assert!(session.stores.sales.is_empty().await);
    let cart = cart::get_cart(&session.cart);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
}

#[tokio::test]
async fn test_checkout_of_empty_cart_records_nothing() {
    let session = session_at_ph1().await;

    assert_eq!(checkout(&session).await.unwrap(), None);
    assert!(session.stores.sales.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_checkouts_record_distinct_ids() {
    let session = session_at_ph1().await;
    let other = PosSession {
        cart: CartState::new(),
        ..session.clone()
    };
    add_twice(&session).await;
    add_twice(&other).await;

    let (first, second) = tokio::join!(checkout(&session), checkout(&other));
    let first = first.unwrap().unwrap();
    let second = second.unwrap().unwrap();

    assert_ne!(first.transaction_id, second.transaction_id);
    assert_eq!(session.stores.sales.len().await, 2);
}

#[tokio::test]
async fn test_sale_keeps_price_after_catalog_edit() {
    let session = session_at_ph1().await;
    add_twice(&session).await;

    let mut repriced = paracetamol();
    repriced.price = 99.0;
    product::update_product(&session.stores.products, repriced)
        .await
        .unwrap();

    let receipt = checkout(&session).await.unwrap().unwrap();
    assert_eq!(receipt.subtotal, 20.0);
}

#[tokio::test]
async fn test_deleting_active_pharmacy_activates_first_remaining() {
    let session = PosSession::start(AppConfig::in_memory()).await;
    let pharmacies = &session.stores.pharmacies;

    pharmacy::select_pharmacy(pharmacies, "pharmacy-3".to_string())
        .await
        .unwrap();
    let active = pharmacy::delete_pharmacy(pharmacies, "pharmacy-3".to_string())
        .await
        .unwrap();

    assert_eq!(active.unwrap().id, "pharmacy-1");
}

#[tokio::test]
async fn test_in_memory_session_starts_with_sample_data() {
    let session = PosSession::start(AppConfig::in_memory()).await;

    assert_eq!(session.stores.backend, StorageBackend::Memory);
    assert_eq!(pharmacy::get_pharmacies(&session.stores.pharmacies).await.len(), 3);
    assert_eq!(
        pharmacy::get_active_pharmacy(&session.stores.pharmacies)
            .await
            .unwrap()
            .name,
        "Main Street Pharmacy"
    );
    assert!(!product::get_products(&session.stores.products).await.is_empty());
}

#[tokio::test]
async fn test_import_then_sell_then_report() {
    let session = session_at_ph1().await;
    let text = r#"[
        {"id": "med-101", "name": "Aspirin 100mg", "price": 5.5, "category": "pain relief", "stock": 30},
        {"name": "Zinc 20mg", "price": "2.25", "stock": "10", "requiresPrescription": "TRUE"},
        {"name": "No price"}
    ]"#;

    let report = product::import_products(&session.stores.products, text.to_string()).await;
    assert_eq!(report.imported, 2);
    assert_eq!(report.failed, 1);

    let zinc = product::search_products(&session.stores.products, "zinc".to_string(), None).await;
    assert_eq!(zinc.len(), 1);
    assert!(zinc[0].requires_prescription);
    assert_eq!(zinc[0].category, "other");

    cart::add_to_cart(&session.stores.products, &session.cart, "med-101".to_string())
        .await
        .unwrap();
    add_twice(&session).await;
    checkout(&session).await.unwrap().unwrap();

    let summary = dashboard::get_dashboard(
        &session.stores.pharmacies,
        &session.stores.sales,
        Some("all".to_string()),
        None,
        None,
    )
    .await;

    assert_eq!(summary.totals.transaction_count, 1);
    assert!((summary.totals.total_sales - 25.5 * 1.07).abs() < EPSILON);
    assert_eq!(summary.pharmacies[0].id, "ph-1");
    assert_eq!(summary.top_products[0].product_id, "med-1");
    assert_eq!(summary.top_products[0].quantity, 2);
    assert_eq!(summary.recent_sales.len(), 1);

    let export = dashboard::export_sales(
        &session.stores.pharmacies,
        &session.stores.sales,
        Some("ph-1".to_string()),
        Some(Utc::now() - Duration::days(1)),
        Some(Utc::now() + Duration::days(1)),
    )
    .await
    .unwrap();
    assert!(export.file_name.starts_with("pharmacy_sales_"));
    let rows: Vec<&str> = export.content.lines().collect();
    assert_eq!(rows[0], "Date,Transaction ID,Pharmacy,Items,Subtotal,Tax,Total");
    assert_eq!(rows.len(), 2);
    assert!(rows[1].contains(",Main Street Pharmacy,3,25.5,"));
}

#[tokio::test]
async fn test_dashboard_range_excludes_old_sales() {
    let session = session_at_ph1().await;
    add_twice(&session).await;
    checkout(&session).await.unwrap().unwrap();

    let summary = dashboard::get_dashboard(
        &session.stores.pharmacies,
        &session.stores.sales,
        None,
        Some(Utc::now() - Duration::days(60)),
        Some(Utc::now() - Duration::days(31)),
    )
    .await;

    assert_eq!(summary.totals.transaction_count, 0);
    assert_eq!(summary.totals.average_ticket, 0.0);
    assert_eq!(summary.pharmacies[0].total, 0.0);
}

#[tokio::test]
async fn test_printed_receipt() {
    let session = session_at_ph1().await;
    add_twice(&session).await;
    let receipt = checkout(&session).await.unwrap().unwrap();

    let text = sale::print_receipt(&session.config, &receipt);
    assert!(text.contains("Main Street Pharmacy"));
    assert!(text.contains(&receipt.transaction_id));
    assert!(text.contains("$21.40"));
    assert!(text.contains("Thank you for your purchase!"));
    assert!(text
        .lines()
        .all(|line| line.chars().count() <= session.config.receipt_width));
}

#[tokio::test]
async fn test_sales_survive_session_restart_on_sqlite() {
    let storage: Arc<dyn Storage> =
        Arc::new(SqliteStorage::open(DbConfig::in_memory()).await.unwrap());

    let session = bare_session(storage.clone(), StorageBackend::Sqlite).await;
    let ph1 = Pharmacy::new("ph-1", "Main Street Pharmacy", "123 Main St", "");
    session.stores.pharmacies.add(ph1).await;
    pharmacy::select_pharmacy(&session.stores.pharmacies, "ph-1".to_string())
        .await
        .unwrap();
    add_twice(&session).await;
    let receipt = checkout(&session).await.unwrap().unwrap();

    let restarted = bare_session(storage, StorageBackend::Sqlite).await;
    let sales = sale::get_sales_by_pharmacy(&restarted.stores.sales, "ph-1".to_string()).await;
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].id, receipt.transaction_id);
    assert_eq!(
        pharmacy::get_active_pharmacy(&restarted.stores.pharmacies)
            .await
            .unwrap()
            .id,
        "ph-1"
    );

    let status = config::get_storage_status(&restarted.stores).await.unwrap();
    assert_eq!(status.backend, StorageBackend::Sqlite);
    assert!(!status.degraded);
}

#[tokio::test]
async fn test_unavailable_storage_keeps_session_running() {
    let session = bare_session(Arc::new(UnavailableStorage), StorageBackend::Unavailable).await;
    let ph1 = pharmacy::add_pharmacy(
        &session.stores.pharmacies,
        pharmacy::NewPharmacy {
            name: "Main Street Pharmacy".to_string(),
            address: "123 Main St".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();

    add_twice(&session).await;
    let receipt = checkout(&session).await.unwrap().unwrap();
    assert_eq!(receipt.pharmacy_id, ph1.id);
    assert_eq!(session.stores.sales.len().await, 1);
    assert!(session.stores.is_degraded());

    let err = config::get_storage_status(&session.stores).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
}
