//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, Quantity};

/// One distinct product's entry in the cart.
///
/// Fields are read-only outside the cart module; quantities only change
/// through [`CartStore`](super::CartStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    id: ProductId,
    title: String,
    image: String,
    price: Price,
    quantity: Quantity,
}

impl CartLineItem {
    pub(super) const fn new(id: ProductId, title: String, image: String, price: Price) -> Self {
        Self {
            id,
            title,
            image,
            price,
            quantity: Quantity::ONE,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Image URL.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Unit price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    pub(super) const fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_shape() {
        let item = CartLineItem::new(
            ProductId::new(1),
            "Shirt".to_string(),
            "img1".to_string(),
            Price::from(20),
        );
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "title": "Shirt",
                "image": "img1",
                "price": "20",
                "quantity": 1
            })
        );
    }

    #[test]
    fn test_numeric_price_accepted() {
        let item: CartLineItem = serde_json::from_str(
            r#"{"id":3,"title":"Hat","image":"img3","price":15.5,"quantity":2}"#,
        )
        .unwrap();
        assert_eq!(item.line_total(), Decimal::from(31));
    }
}
