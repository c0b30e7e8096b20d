//! Outcomes of cart operations.

use crate::types::{ProductId, Quantity};

/// What a successful cart operation did.
///
/// The store returns this instead of notifying anyone itself; the caller
/// decides how to confirm an add or refresh a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product was added, either as a new line or by bumping an existing one.
    Added {
        id: ProductId,
        title: String,
        quantity: Quantity,
    },
    /// An existing line's quantity changed.
    QuantityChanged { id: ProductId, quantity: Quantity },
    /// A line was removed, explicitly or by decreasing past one.
    Removed { id: ProductId },
    /// Every line was removed.
    Cleared,
    /// The product was not in the cart; nothing was written.
    Unchanged,
}

impl CartEvent {
    /// Whether the cart contents changed.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}
