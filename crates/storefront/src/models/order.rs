//! Order domain types.

use chrono::{DateTime, Utc};

use bazaar_core::{OrderId, OrderItemId, OrderStatus, Price, ProductImageId};

/// A placed order with its snapshotted lines.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Price,
    pub transaction_id: String,
    /// Shipping address rendered at the time of purchase.
    pub ship_to: String,
    pub ordered_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// One purchased line.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub image_id: Option<ProductImageId>,
    pub name: String,
    pub brand: String,
    pub price: Price,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}
