//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the catalog as JSON numbers (`109.95`) and are stored as
//! decimals so that `price * quantity` sums never accumulate float error. The
//! persisted form is a decimal string, which round-trips exactly.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative unit price.
///
/// ```
/// use cartline_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(10995, 2)).unwrap();
/// assert_eq!(price.to_string(), "$109.95");
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// `price * quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity.get()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.0))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl From<u32> for Price {
    fn from(whole: u32) -> Self {
        Self(Decimal::from(whole))
    }
}

/// Format a decimal amount for display, e.g. `$40.00`.
///
/// Rounds to the nearest cent, halves away from zero.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${cents:.2}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(-5, 1)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_zero_allowed() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::from(20).to_string(), "$20.00");
        assert_eq!("109.95".parse::<Price>().unwrap().to_string(), "$109.95");
        assert_eq!(format_amount(Decimal::new(7, 1)), "$0.70");
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let price: Price = serde_json::from_str("9.999").unwrap();
        assert_eq!(price.to_string(), "$10.00");
        assert_eq!(format_amount(Decimal::new(2675, 3)), "$2.68");
        assert_eq!(format_amount(Decimal::new(2674, 3)), "$2.67");
        assert_eq!(format_amount(Decimal::new(5, 3)), "$0.01");
        assert_eq!(format_amount(Decimal::new(4, 3)), "$0.00");
    }

    #[test]
    fn test_sub_cent_total_rounds() {
        let price: Price = "0.335".parse().unwrap();
        let total = price.times(Quantity::new(3).unwrap());
        assert_eq!(total, Decimal::new(1005, 3));
        assert_eq!(format_amount(total), "$1.01");
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert!(matches!("-3".parse::<Price>(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Price = serde_json::from_str("109.95").unwrap();
        let from_string: Price = serde_json::from_str("\"109.95\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.amount(), Decimal::new(10995, 2));

        let whole: Price = serde_json::from_str("15").unwrap();
        assert_eq!(whole, Price::from(15));
    }

    #[test]
    fn test_deserialize_negative_fails() {
        assert!(serde_json::from_str::<Price>("-1.5").is_err());
    }

    #[test]
    fn test_times() {
        let price: Price = "19.99".parse().unwrap();
        let qty = Quantity::new(3).unwrap();
        assert_eq!(price.times(qty), Decimal::new(5997, 2));
    }
}
