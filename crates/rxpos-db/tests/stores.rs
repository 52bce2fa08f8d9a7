//! Store behavior against real backends: persistence across reopen,
//! degrade mode, and the stored document layout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use rxpos_core::{Pharmacy, Product, Sale, SaleItem};
use rxpos_db::storage::{ACTIVE_PHARMACY_KEY, PHARMACIES_KEY, PRODUCTS_KEY, SALES_KEY};
use rxpos_db::{
    seed, DbConfig, MemoryStorage, PharmacyStore, ProductStore, SaleStore, SqliteStorage,
    Storage, StorageError, StorageResult, UnavailableStorage,
};

/// Loads normally; saves fail once `broken` is set.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    broken: AtomicBool,
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn load(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.save(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key).await
    }
}

fn product(id: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        description: String::new(),
        price,
        category: "general".to_string(),
        stock: 5,
        requires_prescription: false,
    }
}

fn sale(id: &str) -> Sale {
    Sale {
        id: id.to_string(),
        pharmacy_id: "pharmacy-1".to_string(),
        items: vec![SaleItem {
            product_id: "med-1".to_string(),
            product_name: "Product med-1".to_string(),
            quantity: 2,
            unit_price: 10.0,
            total: 20.0,
        }],
        subtotal: 20.0,
        tax: 20.0 * 0.07,
        total: 20.0 + 20.0 * 0.07,
        date: Utc.timestamp_opt(1_709_280_000, 123_000_000).unwrap(),
        payment_method: "cash".to_string(),
    }
}

#[tokio::test]
async fn test_products_survive_reopen() {
    let storage = Arc::new(MemoryStorage::new());

    let store = ProductStore::open(storage.clone(), seed::sample_products()).await;
    store.add(product("med-new", 3.0)).await;
    store.delete("med-1").await;

    let reopened = ProductStore::open(storage.clone(), Vec::new()).await;
    let list = reopened.list().await;
    assert!(list.iter().any(|p| p.id == "med-new"));
    assert!(!list.iter().any(|p| p.id == "med-1"));
    assert_eq!(list.len(), seed::sample_products().len());
}

#[tokio::test]
async fn test_stored_document_uses_camel_case() {
    let storage = Arc::new(MemoryStorage::new());
    let store = ProductStore::open(storage.clone(), Vec::new()).await;
    store.add(product("med-1", 3.0)).await;

    let raw = storage.load(PRODUCTS_KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"requiresPrescription\":false"));
}

#[tokio::test]
async fn test_active_pharmacy_persists_and_key_is_removed_when_none() {
    let storage = Arc::new(MemoryStorage::new());
    let store = PharmacyStore::open(storage.clone(), seed::sample_pharmacies()).await;

    let westlands = store.get("pharmacy-2").await.unwrap();
    store.set_active(westlands).await;

    // The list itself was never mutated, so it still comes from defaults.
    let reopened = PharmacyStore::open(storage.clone(), seed::sample_pharmacies()).await;
    assert_eq!(reopened.active().await.unwrap().id, "pharmacy-2");

    for id in ["pharmacy-1", "pharmacy-2", "pharmacy-3"] {
        reopened.delete(id).await;
    }
    assert!(reopened.active().await.is_none());
    assert_eq!(storage.load(ACTIVE_PHARMACY_KEY).await.unwrap(), None);
    assert_eq!(
        storage.load(PHARMACIES_KEY).await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn test_stale_active_falls_back_to_first() {
    let storage = Arc::new(MemoryStorage::new());
    let ghost = Pharmacy::new("pharmacy-gone", "Gone", "Nowhere", "");
    storage
        .save(ACTIVE_PHARMACY_KEY, &serde_json::to_string(&ghost).unwrap())
        .await
        .unwrap();

    let store = PharmacyStore::open(storage, seed::sample_pharmacies()).await;
    assert_eq!(store.active().await.unwrap().id, "pharmacy-1");
}

#[tokio::test]
async fn test_sales_round_trip_on_sqlite() {
    let storage: Arc<dyn Storage> =
        Arc::new(SqliteStorage::open(DbConfig::in_memory()).await.unwrap());

    let store = SaleStore::open(storage.clone()).await;
    store.add(sale("RX-123456")).await;

    let reopened = SaleStore::open(storage.clone()).await;
    let sales = reopened.list().await;
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0], sale("RX-123456"));
    assert!(storage.load(SALES_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn test_unavailable_storage_degrades_to_memory() {
    let storage: Arc<dyn Storage> = Arc::new(UnavailableStorage);

    let products = ProductStore::open(storage.clone(), seed::sample_products()).await;
    assert!(products.is_degraded());
    assert_eq!(products.list().await.len(), seed::sample_products().len());

    products.add(product("med-new", 1.0)).await;
    assert!(products.get("med-new").await.is_some());

    let sales = SaleStore::open(storage).await;
    sales.add(sale("RX-100001")).await;
    assert_eq!(sales.len().await, 1);
}

#[tokio::test]
async fn test_save_failure_degrades_and_keeps_serving() {
    let storage = Arc::new(FlakyStorage::default());
    let store = ProductStore::open(storage.clone(), Vec::new()).await;

    store.add(product("med-1", 1.0)).await;
    assert!(!store.is_degraded());

    storage.broken.store(true, Ordering::SeqCst);
    store.add(product("med-2", 2.0)).await;
    assert!(store.is_degraded());
    assert_eq!(store.list().await.len(), 2);

    // Later saves are skipped even once storage recovers.
    storage.broken.store(false, Ordering::SeqCst);
    store.add(product("med-3", 3.0)).await;
    let raw = storage.load(PRODUCTS_KEY).await.unwrap().unwrap();
    assert!(!raw.contains("med-3"));
}

#[tokio::test]
async fn test_undecodable_product_is_skipped_and_the_rest_kept() {
    let storage = Arc::new(MemoryStorage::new());
    let mut stored = serde_json::to_value(vec![product("user-1", 4.5), product("user-2", 1.0)])
        .unwrap();
    stored[1]["price"] = serde_json::Value::Null;
    storage
        .save(PRODUCTS_KEY, &stored.to_string())
        .await
        .unwrap();

    let store = ProductStore::open(storage.clone(), seed::sample_products()).await;
    assert!(!store.is_degraded());
    let ids: Vec<String> = store.list().await.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["user-1"]);

    store.add(product("user-3", 2.0)).await;
    let raw = storage.load(PRODUCTS_KEY).await.unwrap().unwrap();
    assert!(raw.contains("user-1"));
    assert!(raw.contains("user-3"));
    assert!(!raw.contains("med-10"));
}

#[tokio::test]
async fn test_undecodable_sale_does_not_empty_the_log() {
    let storage = Arc::new(MemoryStorage::new());
    let mut stored = serde_json::to_value(vec![sale("RX-100001"), sale("RX-100002")]).unwrap();
    stored[1]["total"] = serde_json::Value::Null;
    storage.save(SALES_KEY, &stored.to_string()).await.unwrap();

    let store = SaleStore::open(storage.clone()).await;
    assert_eq!(store.len().await, 1);

    store.add(sale("RX-100003")).await;
    let reopened = SaleStore::open(storage).await;
    let ids: Vec<String> = reopened.list().await.into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["RX-100001", "RX-100003"]);
}

#[tokio::test]
async fn test_unreadable_document_is_never_overwritten() {
    let storage = Arc::new(MemoryStorage::new());
    storage.save(PRODUCTS_KEY, "{not json").await.unwrap();

    let store = ProductStore::open(storage.clone(), seed::sample_products()).await;
    assert!(store.is_degraded());
    assert_eq!(store.list().await.len(), seed::sample_products().len());

    store.add(product("med-new", 1.0)).await;
    assert!(store.get("med-new").await.is_some());
    assert_eq!(
        storage.load(PRODUCTS_KEY).await.unwrap().as_deref(),
        Some("{not json")
    );
}

#[tokio::test]
async fn test_import_example_csv() {
    let storage = Arc::new(MemoryStorage::new());
    let store = ProductStore::open(storage, Vec::new()).await;

    let text = "id,name,description,price,category,stock,requiresPrescription\n\
                med-101,Aspirin 100mg,Pain reliever,5.99,pain relief,30,false\n\
                med-102,Amoxicillin 250mg,Antibiotic,12.99,antibiotics,20,true\n\
                med-103,,Missing name,1.00,other,1,false";

    let report = store.import(text, Utc::now()).await;
    assert_eq!(report.imported, 2);
    assert_eq!(report.failed, 1);

    let amoxicillin = store.get("med-102").await.unwrap();
    assert_eq!(amoxicillin.price, 12.99);
    assert_eq!(amoxicillin.stock, 20);
    assert!(amoxicillin.requires_prescription);
    assert_eq!(store.categories().await, vec!["pain relief", "antibiotics"]);

    let exported = store.export_csv().await.unwrap();
    assert!(exported.starts_with("id,name,description,price,category,stock,requiresPrescription\n"));
    assert!(exported.contains("med-101,Aspirin 100mg,Pain reliever,5.99,pain relief,30,false"));
}
