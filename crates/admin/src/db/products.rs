//! Catalog management: product rows and their images.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgPool, Postgres};

use bazaar_core::{Price, ProductId, ProductImageId, ProductStatus};

use super::RepositoryError;
use crate::models::{NewImage, ProductInput, ProductRecord, ProductSummary};

type PgQueryAs<'q, O> = QueryAs<'q, Postgres, O, PgArguments>;

const PRODUCT_FIELDS: &str = "name, category, brand, sku, product_code, short_description, \
     full_description, price, mrp, discount, stock, low_stock_alert, sizes, colors, variants, \
     tags, key_features, material, dimensions, weight, warranty, return_policy, bank_offers, \
     special_offer, delivery_charge, free_delivery, launch_date, status";

/// Binds every editable field, in `PRODUCT_FIELDS` order, as `$1..$28`.
fn bind_fields<'q, O>(query: PgQueryAs<'q, O>, input: &'q ProductInput) -> PgQueryAs<'q, O> {
    query
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.brand)
        .bind(&input.sku)
        .bind(&input.product_code)
        .bind(&input.short_description)
        .bind(&input.full_description)
        .bind(input.price)
        .bind(input.mrp)
        .bind(input.discount)
        .bind(input.stock)
        .bind(input.low_stock_alert)
        .bind(&input.sizes)
        .bind(&input.colors)
        .bind(&input.variants)
        .bind(&input.tags)
        .bind(&input.key_features)
        .bind(&input.material)
        .bind(&input.dimensions)
        .bind(&input.weight)
        .bind(&input.warranty)
        .bind(&input.return_policy)
        .bind(&input.bank_offers)
        .bind(&input.special_offer)
        .bind(input.delivery_charge)
        .bind(input.free_delivery)
        .bind(input.launch_date)
        .bind(input.status)
}

#[derive(Debug, sqlx::FromRow)]
struct ProductSummaryRow {
    id: i32,
    name: String,
    brand: String,
    category: String,
    sku: String,
    price: Price,
    stock: i32,
    status: ProductStatus,
    thumbnail_id: Option<i32>,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            brand: row.brand,
            category: row.category,
            sku: row.sku,
            price: row.price,
            stock: row.stock,
            status: row.status,
            thumbnail_id: row.thumbnail_id.map(ProductImageId::new),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    category: String,
    brand: String,
    sku: String,
    product_code: String,
    short_description: String,
    full_description: String,
    price: Price,
    mrp: Price,
    discount: Decimal,
    stock: i32,
    low_stock_alert: i32,
    sizes: Vec<String>,
    colors: Vec<String>,
    variants: Vec<String>,
    tags: Vec<String>,
    key_features: Vec<String>,
    material: String,
    dimensions: String,
    weight: String,
    warranty: String,
    return_policy: String,
    bank_offers: String,
    special_offer: String,
    delivery_charge: Price,
    free_delivery: bool,
    launch_date: Option<NaiveDate>,
    status: ProductStatus,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRefRow {
    id: i32,
    is_main: bool,
}

fn into_record(row: ProductRow, images: &[ImageRefRow]) -> ProductRecord {
    ProductRecord {
        id: ProductId::new(row.id),
        input: ProductInput {
            name: row.name,
            category: row.category,
            brand: row.brand,
            sku: row.sku,
            product_code: row.product_code,
            short_description: row.short_description,
            full_description: row.full_description,
            price: row.price,
            mrp: row.mrp,
            discount: row.discount,
            stock: row.stock,
            low_stock_alert: row.low_stock_alert,
            sizes: row.sizes,
            colors: row.colors,
            variants: row.variants,
            tags: row.tags,
            key_features: row.key_features,
            material: row.material,
            dimensions: row.dimensions,
            weight: row.weight,
            warranty: row.warranty,
            return_policy: row.return_policy,
            bank_offers: row.bank_offers,
            special_offer: row.special_offer,
            delivery_charge: row.delivery_charge,
            free_delivery: row.free_delivery,
            launch_date: row.launch_date,
            status: row.status,
        },
        main_image_id: images
            .iter()
            .find(|img| img.is_main)
            .map(|img| ProductImageId::new(img.id)),
        additional_image_ids: images
            .iter()
            .filter(|img| !img.is_main)
            .map(|img| ProductImageId::new(img.id))
            .collect(),
        updated_at: row.updated_at,
    }
}

async fn insert_image(
    conn: &mut PgConnection,
    product_id: i32,
    image: &NewImage,
    is_main: bool,
    position: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO shop.product_image (product_id, is_main, position, content_type, data)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(product_id)
    .bind(is_main)
    .bind(position)
    .bind(&image.content_type)
    .bind(&image.data)
    .execute(conn)
    .await?;
    Ok(())
}

/// Repository for products and product images.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, newest first, with its main image id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ProductSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSummaryRow>(
            r"
            SELECT p.id, p.name, p.brand, p.category, p.sku, p.price, p.stock, p.status,
                   (SELECT i.id FROM shop.product_image i
                    WHERE i.product_id = p.id AND i.is_main) AS thumbnail_id
            FROM shop.product p
            ORDER BY p.created_at DESC, p.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Load a product with its image ids for editing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT id, {PRODUCT_FIELDS}, updated_at FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let images = sqlx::query_as::<_, ImageRefRow>(
            "SELECT id, is_main FROM shop.product_image WHERE product_id = $1 ORDER BY position, id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(into_record(row, &images)))
    }

    /// Insert a product together with its images.
    ///
    /// The admin editor always supplies a main image; catalog seeds may not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU is taken.
    /// Returns `RepositoryError::Database` if a statement fails; nothing is
    /// written in that case.
    pub async fn create(
        &self,
        input: &ProductInput,
        main_image: Option<&NewImage>,
        additional_images: &[NewImage],
    ) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r"
            INSERT INTO shop.product ({PRODUCT_FIELDS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)
            RETURNING id
            "
        );
        let (id,) = bind_fields(sqlx::query_as::<_, (i32,)>(&sql), input)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "SKU"))?;

        if let Some(image) = main_image {
            insert_image(&mut tx, id, image, true, 0).await?;
        }
        for (position, image) in (1..).zip(additional_images) {
            insert_image(&mut tx, id, image, false, position).await?;
        }

        tx.commit().await?;
        Ok(ProductId::new(id))
    }

    /// Overwrite a product's fields.
    ///
    /// A new `main_image` replaces the stored one. `additional_images` are
    /// appended after the existing ones. Returns `false` when no product has
    /// this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU belongs to another
    /// product.
    /// Returns `RepositoryError::Database` if a statement fails; nothing is
    /// written in that case.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
        main_image: Option<&NewImage>,
        additional_images: &[NewImage],
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r"
            UPDATE shop.product SET
                name = $1, category = $2, brand = $3, sku = $4, product_code = $5,
                short_description = $6, full_description = $7, price = $8, mrp = $9,
                discount = $10, stock = $11, low_stock_alert = $12, sizes = $13,
                colors = $14, variants = $15, tags = $16, key_features = $17,
                material = $18, dimensions = $19, weight = $20, warranty = $21,
                return_policy = $22, bank_offers = $23, special_offer = $24,
                delivery_charge = $25, free_delivery = $26, launch_date = $27,
                status = $28, updated_at = now()
            WHERE id = $29
            RETURNING id
            "
        );
        let updated = bind_fields(sqlx::query_as::<_, (i32,)>(&sql), input)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "SKU"))?;

        let Some((product_id,)) = updated else {
            return Ok(false);
        };

        if let Some(image) = main_image {
            sqlx::query("DELETE FROM shop.product_image WHERE product_id = $1 AND is_main")
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
            insert_image(&mut tx, product_id, image, true, 0).await?;
        }

        if !additional_images.is_empty() {
            let (last_position,) = sqlx::query_as::<_, (i32,)>(
                "SELECT COALESCE(MAX(position), 0) FROM shop.product_image WHERE product_id = $1",
            )
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;

            for (position, image) in (last_position + 1..).zip(additional_images) {
                insert_image(&mut tx, product_id, image, false, position).await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a product. Its images cascade; cart lines and order items keep
    /// their snapshots with the references cleared.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
