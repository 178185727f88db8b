//! Product types for the catalog editor.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use bazaar_core::{Price, ProductId, ProductImageId, ProductStatus, StockLevel};

/// A row in the product list.
#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub sku: String,
    pub price: Price,
    pub stock: i32,
    pub status: ProductStatus,
    pub thumbnail_id: Option<ProductImageId>,
}

impl ProductSummary {
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::from_stock(self.stock)
    }
}

/// Every editable product field, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub sku: String,
    pub product_code: String,
    pub short_description: String,
    pub full_description: String,
    pub price: Price,
    pub mrp: Price,
    pub discount: Decimal,
    pub stock: i32,
    pub low_stock_alert: i32,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub variants: Vec<String>,
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
}

/// A stored product as loaded for the edit form.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: ProductId,
    pub input: ProductInput,
    pub main_image_id: Option<ProductImageId>,
    pub additional_image_ids: Vec<ProductImageId>,
    pub updated_at: DateTime<Utc>,
}

/// An uploaded image waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Image bytes as served back to the browser.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub content_type: String,
    pub data: Vec<u8>,
}
