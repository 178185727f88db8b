//! Order listing and status changes for the back office.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{OrderId, OrderStatus, Price, ProductImageId, UserId};

use super::{RepositoryError, quantity_from_db};
use crate::models::{AdminOrder, AdminOrderItem};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    email: String,
    phone: String,
    state: String,
    district: String,
    area_name: String,
    pincode: String,
    total_amount: Price,
    transaction_id: String,
    status: OrderStatus,
    ordered_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    image_id: Option<i32>,
    name: String,
    brand: String,
    price: Price,
    size: String,
    color: String,
    quantity: i32,
}

impl TryFrom<OrderItemRow> for AdminOrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            image_id: row.image_id.map(ProductImageId::new),
            name: row.name,
            brand: row.brand,
            price: row.price,
            size: row.size,
            color: row.color,
            quantity: quantity_from_db(row.quantity)?,
        })
    }
}

const ORDER_SELECT: &str = r#"
    SELECT id, user_id, email, phone, state, district, area_name, pincode,
           total_amount, transaction_id, status, ordered_at
    FROM shop."order"
"#;

/// Repository for orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders, newest first. `limit` of `None` returns everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<AdminOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{ORDER_SELECT} ORDER BY ordered_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.with_items(rows).await
    }

    /// One customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<AdminOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{ORDER_SELECT} WHERE user_id = $1 ORDER BY ordered_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.with_items(rows).await
    }

    /// Set an order's status. Returns `false` when the order does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE shop."order" SET status = $2, updated_at = now() WHERE id = $1"#,
        )
        .bind(id)
        .bind(status)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn with_items(&self, rows: Vec<OrderRow>) -> Result<Vec<AdminOrder>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT order_id, image_id, name, brand, price, size, color, quantity
            FROM shop.order_item
            WHERE order_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<AdminOrderItem>> = HashMap::new();
        for row in items {
            let order_id = row.order_id;
            by_order.entry(order_id).or_default().push(row.try_into()?);
        }

        Ok(rows
            .into_iter()
            .map(|row| AdminOrder {
                id: OrderId::new(row.id),
                user_id: UserId::new(row.user_id),
                email: row.email,
                phone: row.phone,
                ship_to: format!(
                    "{}, {}, {} - {}",
                    row.area_name, row.district, row.state, row.pincode
                ),
                total_amount: row.total_amount,
                transaction_id: row.transaction_id,
                status: row.status,
                ordered_at: row.ordered_at,
                items: by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}
