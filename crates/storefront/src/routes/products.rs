//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::ProductId;

use crate::db::ProductRepository;
use crate::db::cart::MAX_LINE_QUANTITY;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Product};
use crate::state::AppState;

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub current_user: Option<CurrentUser>,
    pub product: Product,
    pub max_quantity: u32,
    pub error: Option<String>,
}

/// Human-readable message for a product page error code.
fn error_message(code: &str) -> String {
    match code {
        "quantity" => format!("Please choose a quantity between 1 and {MAX_LINE_QUANTITY}."),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Display a product.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Query(query): Query<MessageQuery>,
) -> Result<ProductShowTemplate> {
    let product = ProductRepository::new(state.pool())
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductShowTemplate {
        current_user: Some(user),
        product,
        max_quantity: MAX_LINE_QUANTITY,
        error: query.error.as_deref().map(error_message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(error_message("quantity").contains("99"));
        assert!(error_message("nope").starts_with("Something went wrong"));
    }
}
