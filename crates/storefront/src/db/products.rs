//! Read-only catalog queries for the storefront.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bazaar_core::{Price, ProductId, ProductImageId, ProductStatus};

use super::RepositoryError;
use crate::models::{Product, ProductCard};

#[derive(Debug, sqlx::FromRow)]
struct ProductCardRow {
    id: i32,
    name: String,
    brand: String,
    price: Price,
    mrp: Price,
    discount: Decimal,
    main_image_id: Option<i32>,
}

impl From<ProductCardRow> for ProductCard {
    fn from(row: ProductCardRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            brand: row.brand,
            price: row.price,
            mrp: row.mrp,
            discount: row.discount,
            main_image_id: row.main_image_id.map(ProductImageId::new),
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
    short_description: String,
    full_description: String,
    price: Price,
    mrp: Price,
    discount: Decimal,
    stock: i32,
    sizes: Vec<String>,
    colors: Vec<String>,
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
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRefRow {
    id: i32,
    is_main: bool,
}

fn into_product(row: ProductRow, images: Vec<ImageRefRow>) -> Product {
    let main_image_id = images
        .iter()
        .find(|img| img.is_main)
        .map(|img| ProductImageId::new(img.id));
    let additional_image_ids = images
        .iter()
        .filter(|img| !img.is_main)
        .map(|img| ProductImageId::new(img.id))
        .collect();

    Product {
        id: ProductId::new(row.id),
        name: row.name,
        category: row.category,
        brand: row.brand,
        sku: row.sku,
        short_description: row.short_description,
        full_description: row.full_description,
        price: row.price,
        mrp: row.mrp,
        discount: row.discount,
        stock: row.stock,
        sizes: row.sizes,
        colors: row.colors,
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
        main_image_id,
        additional_image_ids,
        created_at: row.created_at,
    }
}

/// Escape `LIKE` metacharacters and wrap the term for a substring match.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, newest first, optionally filtered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ProductCard>, RepositoryError> {
        let pattern = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(contains_pattern);

        let rows = sqlx::query_as::<_, ProductCardRow>(
            r"
            SELECT p.id, p.name, p.brand, p.price, p.mrp, p.discount,
                   (SELECT i.id FROM shop.product_image i
                    WHERE i.product_id = p.id AND i.is_main) AS main_image_id
            FROM shop.product p
            WHERE p.status = 'active'
              AND ($1::text IS NULL OR p.name ILIKE $1 ESCAPE '\')
            ORDER BY p.created_at DESC, p.id DESC
            ",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an active product with its image references.
    ///
    /// Inactive products are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_active(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, category, brand, sku, short_description, full_description,
                   price, mrp, discount, stock, sizes, colors, tags, key_features,
                   material, dimensions, weight, warranty, return_policy, bank_offers,
                   special_offer, delivery_charge, free_delivery, launch_date, status,
                   created_at
            FROM shop.product
            WHERE id = $1 AND status = 'active'
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let images = sqlx::query_as::<_, ImageRefRow>(
            r"
            SELECT id, is_main
            FROM shop.product_image
            WHERE product_id = $1
            ORDER BY is_main DESC, position, id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(into_product(row, images)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_term() {
        assert_eq!(contains_pattern("saree"), "%saree%");
    }

    #[test]
    fn test_contains_pattern_escapes_metacharacters() {
        assert_eq!(contains_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
