//! Cart line persistence.
//!
//! Every statement is scoped by `user_id`, so a line id belonging to another
//! user never matches.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use bazaar_core::{CartItemId, Price, ProductId, ProductImageId, UserId};

use super::{RepositoryError, quantity_from_db};
use crate::models::{CartLine, CartSelection, Product};

/// Largest quantity a single line can hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CartLineRow {
    pub(crate) id: i32,
    pub(crate) product_id: Option<i32>,
    pub(crate) image_id: Option<i32>,
    pub(crate) name: String,
    pub(crate) brand: String,
    pub(crate) category: String,
    pub(crate) price: Price,
    pub(crate) mrp: Price,
    pub(crate) discount: Decimal,
    pub(crate) size: String,
    pub(crate) color: String,
    pub(crate) quantity: i32,
    pub(crate) added_at: DateTime<Utc>,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CartItemId::new(row.id),
            product_id: row.product_id.map(ProductId::new),
            image_id: row.image_id.map(ProductImageId::new),
            name: row.name,
            brand: row.brand,
            category: row.category,
            price: row.price,
            mrp: row.mrp,
            discount: row.discount,
            size: row.size,
            color: row.color,
            quantity: quantity_from_db(row.quantity)?,
            added_at: row.added_at,
        })
    }
}

pub(crate) const CART_LINE_COLUMNS: &str = "id, product_id, image_id, name, brand, category, \
     price, mrp, discount, size, color, quantity, added_at";

fn to_db_quantity(quantity: u32) -> i32 {
    i32::try_from(quantity.min(MAX_LINE_QUANTITY)).unwrap_or(i32::MAX)
}

/// Repository for cart lines.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart lines in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(&format!(
            "SELECT {CART_LINE_COLUMNS} FROM shop.cart_item WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Add a product to the cart, merging into an existing line with the
    /// same size and color.
    ///
    /// A merged line is capped at [`MAX_LINE_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product: &Product,
        selection: &CartSelection,
    ) -> Result<CartLine, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert_or_merge(&mut *conn, user_id, product, selection).await
    }

    /// Replace the whole cart with a single line (buy now).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails; the cart is
    /// left untouched in that case.
    pub async fn replace_with(
        &self,
        user_id: UserId,
        product: &Product,
        selection: &CartSelection,
    ) -> Result<CartLine, RepositoryError> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;

        sqlx::query("DELETE FROM shop.cart_item WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let line = insert_or_merge(&mut *tx, user_id, product, selection).await?;
        tx.commit().await?;
        Ok(line)
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns `false` when the line does not exist in this user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        line_id: CartItemId,
        quantity: u32,
    ) -> Result<bool, RepositoryError> {
        if quantity == 0 {
            return self.remove(user_id, line_id).await;
        }

        let result =
            sqlx::query("UPDATE shop.cart_item SET quantity = $3 WHERE id = $1 AND user_id = $2")
                .bind(line_id)
                .bind(user_id)
                .bind(to_db_quantity(quantity))
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a line from this user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, user_id: UserId, line_id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_item WHERE id = $1 AND user_id = $2")
            .bind(line_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_or_merge(
    conn: &mut sqlx::PgConnection,
    user_id: UserId,
    product: &Product,
    selection: &CartSelection,
) -> Result<CartLine, RepositoryError> {
    let row = sqlx::query_as::<_, CartLineRow>(&format!(
        r"
        INSERT INTO shop.cart_item
            (user_id, product_id, image_id, name, brand, category,
             price, mrp, discount, size, color, quantity)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (user_id, product_id, size, color) DO UPDATE
            SET quantity = LEAST(shop.cart_item.quantity + EXCLUDED.quantity, {MAX_LINE_QUANTITY})
        RETURNING {CART_LINE_COLUMNS}
        "
    ))
    .bind(user_id)
    .bind(product.id)
    .bind(product.main_image_id)
    .bind(&product.name)
    .bind(&product.brand)
    .bind(&product.category)
    .bind(product.price)
    .bind(product.mrp)
    .bind(product.effective_discount())
    .bind(&selection.size)
    .bind(&selection.color)
    .bind(to_db_quantity(selection.quantity))
    .fetch_one(&mut *conn)
    .await?;

    row.try_into()
}
