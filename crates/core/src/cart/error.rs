use thiserror::Error;

use crate::storage::StoreError;

/// Errors returned by cart operations.
///
/// When any of these is returned the in-memory cart is exactly what it was
/// before the call, and so is the persisted copy.
#[derive(Debug, Error)]
pub enum CartError {
    /// Writing the cart to the durable store failed.
    #[error("failed to persist cart: {0}")]
    Persist(#[from] StoreError),

    /// The cart could not be encoded.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}
