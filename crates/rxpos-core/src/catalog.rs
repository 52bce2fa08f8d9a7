//! # Catalog Queries
//!
//! Read-only views over the product list: the derived category set and the
//! two product searches (POS screen and product management).

use crate::types::Product;
use crate::ALL_FILTER;

/// Distinct category values in order of first appearance.
///
/// Recomputed from the list on every call, so a category disappears as soon
/// as its last product is deleted.
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !categories.iter().any(|c| c == &product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// POS screen search.
///
/// Case-insensitive substring match on name or description, AND an exact
/// category match unless `category` is `"all"`.
pub fn search_products<'a>(products: &'a [Product], term: &str, category: &str) -> Vec<&'a Product> {
    let term = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            let matches_term = p.name.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term);
            let matches_category = category == ALL_FILTER || p.category == category;
            matches_term && matches_category
        })
        .collect()
}

/// Product management search: name, description or category text.
pub fn filter_for_management<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let term = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
                || p.category.to_lowercase().contains(&term)
        })
        .collect()
}
