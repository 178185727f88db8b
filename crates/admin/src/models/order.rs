//! Orders and dashboard aggregates.

use chrono::{DateTime, Utc};

use bazaar_core::{OrderId, OrderStatus, Price, ProductImageId, UserId};

/// An order with its customer snapshot and lines.
#[derive(Debug, Clone)]
pub struct AdminOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub email: String,
    pub phone: String,
    pub ship_to: String,
    pub total_amount: Price,
    pub transaction_id: String,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
    pub items: Vec<AdminOrderItem>,
}

impl AdminOrder {
    /// Transaction id, or "N/A" when none was recorded.
    #[must_use]
    pub fn transaction_display(&self) -> &str {
        if self.transaction_id.trim().is_empty() {
            "N/A"
        } else {
            &self.transaction_id
        }
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[derive(Debug, Clone)]
pub struct AdminOrderItem {
    pub image_id: Option<ProductImageId>,
    pub name: String,
    pub brand: String,
    pub price: Price,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl AdminOrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub pending_orders: i64,
    /// Sum of order totals, cancelled orders excluded.
    pub revenue: Price,
    pub recent_orders: Vec<AdminOrder>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(transaction_id: &str) -> AdminOrder {
        AdminOrder {
            id: OrderId::new(7),
            user_id: UserId::new(1),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            ship_to: "Panaji, North Goa, Goa - 403001".to_string(),
            total_amount: Price::parse("598").unwrap(),
            transaction_id: transaction_id.to_string(),
            status: OrderStatus::Pending,
            ordered_at: Utc::now(),
            items: vec![AdminOrderItem {
                image_id: None,
                name: "Kurta".to_string(),
                brand: "Fabindia".to_string(),
                price: Price::parse("299").unwrap(),
                size: "M".to_string(),
                color: String::new(),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn test_transaction_display() {
        assert_eq!(order("").transaction_display(), "N/A");
        assert_eq!(order("asha@upi").transaction_display(), "asha@upi");
    }

    #[test]
    fn test_line_total_and_count() {
        let order = order("x");
        assert_eq!(order.items[0].line_total(), Price::parse("598").unwrap());
        assert_eq!(order.item_count(), 2);
    }
}
