//! Cartline Core - cart state machine and shared types.
//!
//! This crate provides the pieces used by every Cartline component:
//! - `storefront` - HTTP surface, catalog client, file-backed storage
//! - `integration-tests` - cross-crate tests
//!
//! # Architecture
//!
//! The core crate has no network access and no filesystem access. Durable
//! storage is reached through the [`storage::KeyValueStore`] trait, which the
//! storefront implements on top of a data directory.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and quantities
//! - [`catalog`] - Catalog products and title filtering
//! - [`cart`] - The cart store: line items, operations, persistence contract
//! - [`storage`] - Key-value storage trait and an in-memory implementation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod storage;
pub mod types;

pub use cart::{CART_KEY, CartError, CartEvent, CartLineItem, CartStore};
pub use catalog::{Product, filter_products};
pub use storage::{KeyValueStore, MemoryStore, StoreError};
pub use types::*;
