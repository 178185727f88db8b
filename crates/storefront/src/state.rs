//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use bazaar_core::ProductImageId;

use crate::config::StorefrontConfig;
use crate::models::StoredImage;

/// Total image bytes kept in memory.
const IMAGE_CACHE_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// How long an image stays cached after it was loaded.
const IMAGE_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// In-memory cache of image bytes, weighted by size.
pub type ImageCache = Cache<ProductImageId, Arc<StoredImage>>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    images: ImageCache,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images: build_image_cache(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the image cache.
    #[must_use]
    pub fn images(&self) -> &ImageCache {
        &self.inner.images
    }
}

fn build_image_cache() -> ImageCache {
    Cache::builder()
        .weigher(|_id: &ProductImageId, image: &Arc<StoredImage>| {
            u32::try_from(image.data.len()).unwrap_or(u32::MAX)
        })
        .max_capacity(IMAGE_CACHE_MAX_BYTES)
        .time_to_live(IMAGE_CACHE_TTL)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;

    #[tokio::test]
    async fn test_image_cache_round_trip() {
        let cache = build_image_cache();
        let id = ProductImageId::new(3);
        cache
            .insert(
                id,
                Arc::new(StoredImage {
                    content_type: "image/png".to_string(),
                    data: Bytes::from_static(&[0x89, b'P', b'N', b'G']),
                }),
            )
            .await;

        let hit = cache.get(&id).await;
        assert_eq!(hit.map(|img| img.content_type.clone()).as_deref(), Some("image/png"));
        assert!(cache.get(&ProductImageId::new(4)).await.is_none());
    }
}
