//! Durable key-value storage used to persist the cart.
//!
//! The cart store writes its whole state as one value under a single key, so
//! the trait only needs whole-value `get` and `put`. Implementations:
//!
//! - [`MemoryStore`] - in-process map, used by tests and as a fallback
//! - `FileStore` (storefront crate) - one JSON file per key in a data directory

mod memory;

pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be mapped onto the backing store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Whole-value key-value storage that outlives the process.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be durably written. The
    /// previous value must remain readable in that case.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }
}
