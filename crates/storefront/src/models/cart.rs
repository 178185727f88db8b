//! Shopping cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bazaar_core::{CartItemId, Price, ProductId, ProductImageId};

/// Variant choices submitted with an add-to-cart or buy-now form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSelection {
    pub quantity: u32,
    pub size: String,
    pub color: String,
}

/// One line of a user's cart, holding a snapshot of the product.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: CartItemId,
    /// `None` once the product has been deleted from the catalog.
    pub product_id: Option<ProductId>,
    pub image_id: Option<ProductImageId>,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Price,
    pub mrp: Price,
    pub discount: Decimal,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A user's cart.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, price: &str, quantity: u32) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            product_id: Some(ProductId::new(id)),
            image_id: None,
            name: format!("Item {id}"),
            brand: "Brand".to_string(),
            category: "Category".to_string(),
            price: Price::parse(price).unwrap(),
            mrp: Price::parse(price).unwrap(),
            discount: Decimal::ZERO,
            size: String::new(),
            color: String::new(),
            quantity,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart {
            lines: vec![line(1, "499.00", 2), line(2, "1299.50", 1)],
        };
        assert_eq!(cart.lines[0].line_total(), Price::parse("998").unwrap());
        assert_eq!(cart.total(), Price::parse("2297.50").unwrap());
        assert_eq!(cart.item_count(), 3);
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }
}
