//! Order placement and history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{OrderId, OrderItemId, OrderStatus, Price, ProductImageId, UserId};

use super::cart::{CART_LINE_COLUMNS, CartLineRow};
use super::{RepositoryError, quantity_from_db};
use crate::models::{CartLine, Order, OrderItem, User};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    status: OrderStatus,
    total_amount: Price,
    transaction_id: String,
    state: String,
    district: String,
    area_name: String,
    pincode: String,
    ordered_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    image_id: Option<i32>,
    name: String,
    brand: String,
    price: Price,
    size: String,
    color: String,
    quantity: i32,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderItemId::new(row.id),
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

/// Copies the locked cart lines into the new order.
const INSERT_ORDER_ITEMS: &str = r"
    INSERT INTO shop.order_item
        (order_id, product_id, image_id, name, brand, category,
         price, mrp, discount, size, color, quantity)
    SELECT $1, product_id, image_id, name, brand, category,
           price, mrp, discount, size, color, quantity
    FROM shop.cart_item
    WHERE id = ANY($2)
    ORDER BY id
    RETURNING id, order_id, image_id, name, brand, price, size, color, quantity
";

/// Decrements stock by the ordered quantities of the locked lines, floored at zero.
const DECREMENT_STOCK: &str = r"
    UPDATE shop.product p
    SET stock = GREATEST(p.stock - c.quantity, 0),
        updated_at = now()
    FROM (
        SELECT product_id, SUM(quantity)::int AS quantity
        FROM shop.cart_item
        WHERE id = ANY($1) AND product_id IS NOT NULL
        GROUP BY product_id
    ) c
    WHERE p.id = c.product_id
";

const DELETE_ORDERED_LINES: &str = "DELETE FROM shop.cart_item WHERE id = ANY($1)";

/// Ids of the lines locked for checkout. Every write after the lock is keyed
/// on these so a line added concurrently stays in the cart.
fn locked_line_ids(lines: &[CartLine]) -> Vec<i32> {
    lines.iter().map(|line| line.id.as_i32()).collect()
}

fn ship_to(area_name: &str, district: &str, state: &str, pincode: &str) -> String {
    format!("{area_name}, {district}, {state} - {pincode}")
}

/// Repository for orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn the user's cart into an order.
    ///
    /// Runs in one transaction: lock the cart lines, insert the order and its
    /// items, decrement stock (never below zero) and remove the ordered lines.
    /// The total, the items and the stock change all come from the same locked
    /// set of lines. Returns
    /// `None` without writing anything when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn place_from_cart(
        &self,
        user: &User,
        transaction_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let lines: Vec<CartLine> = sqlx::query_as::<_, CartLineRow>(&format!(
            "SELECT {CART_LINE_COLUMNS} FROM shop.cart_item WHERE user_id = $1 ORDER BY id FOR UPDATE"
        ))
        .bind(user.id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<_, _>>()?;

        if lines.is_empty() {
            return Ok(None);
        }

        let total: Price = lines.iter().map(CartLine::line_total).sum();
        let address = &user.address;

        let order = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO shop."order"
                (user_id, email, phone, state, district, area_name, pincode,
                 total_amount, transaction_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
            RETURNING id, status, total_amount, transaction_id,
                      state, district, area_name, pincode, ordered_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&address.state)
        .bind(&address.district)
        .bind(&address.area_name)
        .bind(address.pincode.as_str())
        .bind(total)
        .bind(transaction_id)
        .fetch_one(&mut *tx)
        .await?;

        let line_ids = locked_line_ids(&lines);

        let items = sqlx::query_as::<_, OrderItemRow>(INSERT_ORDER_ITEMS)
            .bind(order.id)
            .bind(&line_ids)
            .fetch_all(&mut *tx)
            .await?;

        sqlx::query(DECREMENT_STOCK)
            .bind(&line_ids)
            .execute(&mut *tx)
            .await?;

        sqlx::query(DELETE_ORDERED_LINES)
            .bind(&line_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let mut items = items
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<OrderItem>, _>>()?;
        items.sort_by_key(|item| item.id);

        Ok(Some(Order {
            id: OrderId::new(order.id),
            status: order.status,
            total_amount: order.total_amount,
            transaction_id: order.transaction_id,
            ship_to: ship_to(&order.area_name, &order.district, &order.state, &order.pincode),
            ordered_at: order.ordered_at,
            items,
        }))
    }

    /// A user's orders, newest first, with their items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, status, total_amount, transaction_id,
                   state, district, area_name, pincode, ordered_at
            FROM shop."order"
            WHERE user_id = $1
            ORDER BY ordered_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.image_id, oi.name, oi.brand, oi.price,
                   oi.size, oi.color, oi.quantity
            FROM shop.order_item oi
            JOIN shop."order" o ON o.id = oi.order_id
            WHERE o.user_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in items {
            let order_id = row.order_id;
            by_order.entry(order_id).or_default().push(row.try_into()?);
        }

        Ok(orders
            .into_iter()
            .map(|row| Order {
                id: OrderId::new(row.id),
                status: row.status,
                total_amount: row.total_amount,
                transaction_id: row.transaction_id,
                ship_to: ship_to(&row.area_name, &row.district, &row.state, &row.pincode),
                ordered_at: row.ordered_at,
                items: by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use bazaar_core::{CartItemId, ProductId};
    use rust_decimal::Decimal;

    fn line(id: i32, product_id: Option<i32>, quantity: u32) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            product_id: product_id.map(ProductId::new),
            image_id: None,
            name: format!("Item {id}"),
            brand: "Brand".to_string(),
            category: "Category".to_string(),
            price: Price::parse("250").unwrap(),
            mrp: Price::parse("250").unwrap(),
            discount: Decimal::ZERO,
            size: String::new(),
            color: String::new(),
            quantity,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_locked_line_ids_follow_lines() {
        let lines = vec![line(4, Some(1), 2), line(9, None, 1), line(12, Some(1), 3)];
        assert_eq!(locked_line_ids(&lines), vec![4, 9, 12]);
        assert!(locked_line_ids(&[]).is_empty());
    }

    #[test]
    fn test_checkout_writes_touch_only_locked_lines() {
        // A line added after the lock must not be copied, counted or deleted.
        for sql in [INSERT_ORDER_ITEMS, DECREMENT_STOCK, DELETE_ORDERED_LINES] {
            assert!(sql.contains("id = ANY("), "not scoped to locked ids: {sql}");
            assert!(!sql.contains("user_id"), "scoped to the whole cart: {sql}");
        }
    }

    #[test]
    fn test_ship_to_format() {
        assert_eq!(
            ship_to("MG Road", "Bengaluru Urban", "Karnataka", "560001"),
            "MG Road, Bengaluru Urban, Karnataka - 560001"
        );
    }
}
