//! Product image reads.

use bytes::Bytes;
use sqlx::PgPool;

use bazaar_core::ProductImageId;

use super::RepositoryError;
use crate::models::StoredImage;

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    content_type: String,
    data: Vec<u8>,
}

/// Repository for image bytes.
pub struct ImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ImageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductImageId) -> Result<Option<StoredImage>, RepositoryError> {
        let row = sqlx::query_as::<_, ImageRow>(
            "SELECT content_type, data FROM shop.product_image WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| StoredImage {
            content_type: r.content_type,
            data: Bytes::from(r.data),
        }))
    }
}
