//! Core types for Cartline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::ProductId;
pub use price::{Price, PriceError, format_amount};
pub use quantity::Quantity;
