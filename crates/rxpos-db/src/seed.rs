//! # Sample Data
//!
//! Defaults used when a store key has never been written, and by the
//! `seed` binary.

use rxpos_core::{Pharmacy, Product};

/// Three sample pharmacy locations. The first becomes active by default.
pub fn sample_pharmacies() -> Vec<Pharmacy> {
    vec![
        Pharmacy::new(
            "pharmacy-1",
            "Main Street Pharmacy",
            "123 Main St, Nairobi",
            "020-123-4567",
        ),
        Pharmacy::new(
            "pharmacy-2",
            "Westlands Health Center",
            "45 Westlands Rd, Nairobi",
            "020-987-6543",
        ),
        Pharmacy::new(
            "pharmacy-3",
            "Mombasa Road Pharmacy",
            "78 Mombasa Rd, Nairobi",
            "020-555-7890",
        ),
    ]
}

/// (id, name, description, price, category, stock, requires prescription)
const SAMPLE_PRODUCTS: &[(&str, &str, &str, f64, &str, u32, bool)] = &[
    ("med-1", "Paracetamol 500mg", "Pain reliever and fever reducer", 5.99, "pain relief", 100, false),
    ("med-2", "Ibuprofen 200mg", "Anti-inflammatory pain reliever", 7.49, "pain relief", 80, false),
    ("med-3", "Amoxicillin 250mg", "Broad-spectrum antibiotic capsules", 12.99, "antibiotics", 40, true),
    ("med-4", "Ciprofloxacin 500mg", "Antibiotic tablets", 15.5, "antibiotics", 25, true),
    ("med-5", "Cetirizine 10mg", "Antihistamine for allergy relief", 6.25, "allergy", 60, false),
    ("med-6", "Vitamin C 1000mg", "Immune support tablets", 9.99, "vitamins", 120, false),
    ("med-7", "Multivitamin Daily", "Complete daily multivitamin", 14.99, "vitamins", 0, false),
    ("med-8", "Cough Syrup 100ml", "Relief for dry and chesty cough", 8.75, "cold & flu", 35, false),
    ("med-9", "Metformin 500mg", "Blood sugar control tablets", 11.2, "chronic care", 50, true),
    ("med-10", "Oral Rehydration Salts", "Electrolyte replacement sachets", 2.5, "first aid", 200, false),
];

/// A small sample catalog across several categories.
pub fn sample_products() -> Vec<Product> {
    SAMPLE_PRODUCTS
        .iter()
        .map(
            |&(id, name, description, price, category, stock, requires_prescription)| Product {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price,
                category: category.to_string(),
                stock,
                requires_prescription,
            },
        )
        .collect()
}
