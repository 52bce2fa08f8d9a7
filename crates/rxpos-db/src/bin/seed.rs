//! # Seed Data Writer
//!
//! Writes the sample pharmacies and product catalog into a SQLite storage
//! file for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./rxpos_dev.db (default)
//! cargo run -p rxpos-db --bin seed
//!
//! # Specify database path
//! cargo run -p rxpos-db --bin seed -- --db ./data/rxpos.db
//!
//! # Overwrite existing data
//! cargo run -p rxpos-db --bin seed -- --force
//! ```

use std::env;

use rxpos_db::seed::{sample_pharmacies, sample_products};
use rxpos_db::storage::{ACTIVE_PHARMACY_KEY, PHARMACIES_KEY, PRODUCTS_KEY};
use rxpos_db::{DbConfig, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./rxpos_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("RxPOS Seed Data Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./rxpos_dev.db)");
                println!("  -f, --force        Overwrite existing pharmacies and products");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 RxPOS Seed Data Writer");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let storage = SqliteStorage::open(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !force && storage.load(PRODUCTS_KEY).await?.is_some() {
        println!("⚠ Database already has a product catalog");
        println!("  Skipping seed to avoid overwriting it.");
        println!("  Pass --force to replace it.");
        return Ok(());
    }

    let pharmacies = sample_pharmacies();
    let products = sample_products();

    storage
        .save(PHARMACIES_KEY, &serde_json::to_string(&pharmacies)?)
        .await?;
    if let Some(first) = pharmacies.first() {
        storage
            .save(ACTIVE_PHARMACY_KEY, &serde_json::to_string(first)?)
            .await?;
    }
    storage
        .save(PRODUCTS_KEY, &serde_json::to_string(&products)?)
        .await?;

    println!("✓ Wrote {} pharmacies", pharmacies.len());
    println!("✓ Wrote {} products", products.len());

    storage.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
