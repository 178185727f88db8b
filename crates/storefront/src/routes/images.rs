//! Product image serving.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use bazaar_core::ProductImageId;

use crate::db::ImageRepository;
use crate::error::{AppError, Result};
use crate::models::StoredImage;
use crate::state::AppState;

/// Browser cache lifetime for image bytes.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";

fn image_response(image: &StoredImage) -> Response {
    (
        [
            (CONTENT_TYPE, image.content_type.clone()),
            (CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
        ],
        image.data.clone(),
    )
        .into_response()
}

/// Serve an image, going to the database only on a cache miss.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductImageId>,
) -> Result<Response> {
    if let Some(image) = state.images().get(&id).await {
        return Ok(image_response(&image));
    }

    let image = ImageRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("image {id}")))?;

    let image = Arc::new(image);
    state.images().insert(id, Arc::clone(&image)).await;
    tracing::debug!(image_id = %id, bytes = image.data.len(), "Image cached");

    Ok(image_response(&image))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use bytes::Bytes;

    #[test]
    fn test_image_response_headers() {
        let response = image_response(&StoredImage {
            content_type: "image/webp".to_string(),
            data: Bytes::from_static(&[1, 2, 3]),
        });
        assert_eq!(response.headers()[CONTENT_TYPE], "image/webp");
        assert_eq!(response.headers()[CACHE_CONTROL], IMAGE_CACHE_CONTROL);
    }

    #[tokio::test]
    async fn test_cached_image_served_without_copy() {
        let image = Arc::new(StoredImage {
            content_type: "image/png".to_string(),
            data: Bytes::from(vec![7_u8; 4096]),
        });
        let cached = Arc::clone(&image);

        let body = image_response(&cached).into_body();
        let served = axum::body::to_bytes(body, usize::MAX).await.unwrap();

        assert_eq!(served, image.data);
        assert_eq!(image.data.clone().as_ptr(), image.data.as_ptr());
    }
}
