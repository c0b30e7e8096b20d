//! The cart store.
//!
//! [`CartStore`] owns the canonical, ordered list of line items and is the only
//! way to change it. Every mutation follows the same contract:
//!
//! 1. build the next cart from the current one
//! 2. encode it and write it to the [`KeyValueStore`] under [`CART_KEY`]
//! 3. only then replace the in-memory cart
//!
//! A failed write therefore leaves memory and storage agreeing on the previous
//! cart, and the failure is returned to the caller as [`CartError::Persist`].
//! Operations on an ID that is not in the cart are no-ops and write nothing.
//!
//! ```
//! use cartline_core::{CartStore, MemoryStore, Price, ProductId};
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::hydrate(MemoryStore::new());
//! cart.add(ProductId::new(1), "Shirt", "img1", Price::from(20)).unwrap();
//! cart.add(ProductId::new(1), "Shirt", "img1", Price::from(20)).unwrap();
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.total(), Decimal::from(40));
//! ```

mod error;
mod event;
mod line_item;

pub use error::CartError;
pub use event::CartEvent;
pub use line_item::CartLineItem;

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::types::{Price, ProductId, Quantity};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Owner of the cart and its persisted mirror.
#[derive(Debug)]
pub struct CartStore<S> {
    store: S,
    items: Vec<CartLineItem>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the cart persisted in `store`.
    ///
    /// Falls back to an empty cart when nothing is stored, the store cannot be
    /// read, or the stored value is malformed (bad JSON, zero quantity,
    /// negative price, duplicate product IDs).
    pub fn hydrate(store: S) -> Self {
        let items = match store.get(CART_KEY) {
            Ok(Some(bytes)) => decode(&bytes).unwrap_or_else(|reason| {
                warn!(%reason, "Discarding malformed persisted cart");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                Vec::new()
            }
        };
        debug!(lines = items.len(), "Cart hydrated");
        Self { store, items }
    }

    /// Add one unit of a product.
    ///
    /// Appends a new line with quantity 1, or increments the existing line for
    /// `id`. An existing line keeps its original title, image and price.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn add(
        &mut self,
        id: ProductId,
        title: impl Into<String>,
        image: impl Into<String>,
        price: Price,
    ) -> Result<CartEvent, CartError> {
        let mut next = self.items.clone();
        let event = if let Some(line) = next.iter_mut().find(|item| item.id() == id) {
            line.set_quantity(line.quantity().increment());
            CartEvent::Added {
                id,
                title: line.title().to_owned(),
                quantity: line.quantity(),
            }
        } else {
            let title = title.into();
            next.push(CartLineItem::new(id, title.clone(), image.into(), price));
            CartEvent::Added {
                id,
                title,
                quantity: Quantity::ONE,
            }
        };
        self.commit(next)?;
        Ok(event)
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn increase(&mut self, id: ProductId) -> Result<CartEvent, CartError> {
        let mut next = self.items.clone();
        let Some(line) = next.iter_mut().find(|item| item.id() == id) else {
            return Ok(CartEvent::Unchanged);
        };
        let quantity = line.quantity().increment();
        line.set_quantity(quantity);
        self.commit(next)?;
        Ok(CartEvent::QuantityChanged { id, quantity })
    }

    /// Remove one unit from an existing line, dropping the line at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn decrease(&mut self, id: ProductId) -> Result<CartEvent, CartError> {
        let mut next = self.items.clone();
        let Some(line) = next.iter_mut().find(|item| item.id() == id) else {
            return Ok(CartEvent::Unchanged);
        };
        let event = if let Some(quantity) = line.quantity().decrement() {
            line.set_quantity(quantity);
            CartEvent::QuantityChanged { id, quantity }
        } else {
            next.retain(|item| item.id() != id);
            CartEvent::Removed { id }
        };
        self.commit(next)?;
        Ok(event)
    }

    /// Remove the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn remove(&mut self, id: ProductId) -> Result<CartEvent, CartError> {
        let mut next = self.items.clone();
        next.retain(|item| item.id() != id);
        if next.len() == self.items.len() {
            return Ok(CartEvent::Unchanged);
        }
        self.commit(next)?;
        Ok(CartEvent::Removed { id })
    }

    /// Remove every line. The stored value becomes an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart could not be persisted.
    pub fn clear(&mut self) -> Result<CartEvent, CartError> {
        self.commit(Vec::new())?;
        Ok(CartEvent::Cleared)
    }

    fn commit(&mut self, next: Vec<CartLineItem>) -> Result<(), CartError> {
        let bytes = serde_json::to_vec(&next)?;
        self.store.put(CART_KEY, &bytes)?;
        self.items = next;
        Ok(())
    }
}

impl<S> CartStore<S> {
    /// Current line items in the order they were first added.
    #[must_use]
    pub fn snapshot(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Sum of `price * quantity` over every line, recomputed on each call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()))
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Decode a persisted cart, rejecting values that break the cart invariants.
fn decode(bytes: &[u8]) -> Result<Vec<CartLineItem>, String> {
    let items: Vec<CartLineItem> = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.id()) {
            return Err(format!("duplicate line for product {}", item.id()));
        }
    }
    Ok(items)
}
