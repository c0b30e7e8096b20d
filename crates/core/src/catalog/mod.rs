//! Catalog products and the title filter used by the product grid.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as listed by the remote catalog.
///
/// Fields the catalog sends beyond these (description, category, rating, ...)
/// are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Image URL.
    pub image: String,
    pub price: Price,
}

/// Products whose title contains `query`, ignoring case.
///
/// Order follows `products`; `products` itself is left untouched. An empty
/// query matches everything.
#[must_use]
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|product| product.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
