//! Catalog domain types.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use bazaar_core::{Price, ProductId, ProductImageId, ProductStatus, StockLevel};

/// A product as shown in the catalog grid.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Price,
    pub mrp: Price,
    pub discount: Decimal,
    pub main_image_id: Option<ProductImageId>,
}

impl ProductCard {
    /// Discount to advertise, derived from price and MRP when none was entered.
    #[must_use]
    pub fn effective_discount(&self) -> Decimal {
        effective_discount(self.discount, self.price, self.mrp)
    }
}

/// A full product record.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub sku: String,
    pub short_description: String,
    pub full_description: String,
    pub price: Price,
    pub mrp: Price,
    pub discount: Decimal,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub tags: Vec<String>,
    pub key_features: Vec<String>,
    pub material: String,
    pub dimensions: String,
    pub weight: String,
    pub warranty: String,
    pub return_policy: String,
    pub bank_offers: String,
    pub special_offer: String,
    pub delivery_charge: Price,
    pub free_delivery: bool,
    pub launch_date: Option<NaiveDate>,
    pub status: ProductStatus,
    pub main_image_id: Option<ProductImageId>,
    pub additional_image_ids: Vec<ProductImageId>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub fn effective_discount(&self) -> Decimal {
        effective_discount(self.discount, self.price, self.mrp)
    }

    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::from_stock(self.stock)
    }
}

fn effective_discount(entered: Decimal, price: Price, mrp: Price) -> Decimal {
    if entered > Decimal::ZERO {
        entered.normalize()
    } else {
        price.discount_percent(mrp)
    }
}

/// Raw image bytes with their content type. Cloning `data` shares the buffer.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub content_type: String,
    pub data: Bytes,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn card(discount: &str, price: &str, mrp: &str) -> ProductCard {
        ProductCard {
            id: ProductId::new(1),
            name: "Cotton Kurta".to_string(),
            brand: "Handloom Co".to_string(),
            price: Price::parse(price).unwrap(),
            mrp: Price::parse(mrp).unwrap(),
            discount: discount.parse().unwrap(),
            main_image_id: None,
        }
    }

    #[test]
    fn test_entered_discount_wins() {
        assert_eq!(card("15.00", "900", "1000").effective_discount(), Decimal::from(15));
    }

    #[test]
    fn test_missing_discount_is_derived() {
        assert_eq!(card("0", "800", "1000").effective_discount(), Decimal::from(20));
        assert_eq!(card("0", "1000", "1000").effective_discount(), Decimal::ZERO);
    }
}
