//! Cart route handlers.
//!
//! Every cart action is a plain form post followed by a redirect, so the
//! page works without JavaScript.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{CartItemId, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Cart, CurrentUser};
use crate::services::cart::{CartError, CartService, parse_quantity, selection_from_form};
use crate::state::AppState;

/// Add-to-cart and buy-now form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub quantity: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Quantity editor form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: Option<String>,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart: Cart,
    pub error: Option<String>,
}

/// Human-readable message for a cart page error code.
fn error_message(code: &str) -> &'static str {
    match code {
        "empty" => "Your cart is empty. Add something before checking out.",
        "quantity" => "Please choose a quantity between 0 and 99.",
        "line" => "That item is no longer in your cart.",
        _ => "Something went wrong. Please try again.",
    }
}

fn product_error_redirect(id: ProductId) -> Response {
    Redirect::to(&format!("/products/{id}?error=quantity")).into_response()
}

/// Display the cart.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<CartTemplate> {
    let cart = CartService::new(state.pool()).cart(user.id).await?;

    Ok(CartTemplate {
        current_user: Some(user),
        cart,
        error: query.error.as_deref().map(|c| error_message(c).to_string()),
    })
}

/// Add a product to the cart.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    let selection = match selection_from_form(
        form.quantity.as_deref(),
        form.size.as_deref(),
        form.color.as_deref(),
    ) {
        Ok(selection) => selection,
        Err(_) => return Ok(product_error_redirect(id)),
    };

    let line = CartService::new(state.pool())
        .add(user.id, id, &selection)
        .await?;

    let product_id = id.to_string();
    let quantity = line.quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", product_id.as_str()),
            ("quantity", quantity.as_str()),
        ]),
    );

    Ok(Redirect::to("/cart").into_response())
}

/// Replace the cart with a single product and go straight to checkout.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn buy_now(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    let selection = match selection_from_form(
        form.quantity.as_deref(),
        form.size.as_deref(),
        form.color.as_deref(),
    ) {
        Ok(selection) => selection,
        Err(_) => return Ok(product_error_redirect(id)),
    };

    CartService::new(state.pool())
        .buy_now(user.id, id, &selection)
        .await?;

    let product_id = id.to_string();
    add_breadcrumb("cart", "Buy now", Some(&[("product_id", product_id.as_str())]));

    Ok(Redirect::to("/checkout").into_response())
}

/// Set a line's quantity. Zero removes the line.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(line_id): Path<CartItemId>,
    Form(form): Form<QuantityForm>,
) -> Result<Redirect> {
    let Ok(quantity) = parse_quantity(form.quantity.as_deref(), true) else {
        return Ok(Redirect::to("/cart?error=quantity"));
    };

    match CartService::new(state.pool())
        .set_quantity(user.id, line_id, quantity)
        .await
    {
        Ok(()) => Ok(Redirect::to("/cart")),
        Err(CartError::LineNotFound) => Ok(Redirect::to("/cart?error=line")),
        Err(e) => Err(AppError::from(e)),
    }
}

/// Remove a line from the cart.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(line_id): Path<CartItemId>,
) -> Result<Redirect> {
    match CartService::new(state.pool()).remove(user.id, line_id).await {
        Ok(()) => Ok(Redirect::to("/cart")),
        Err(CartError::LineNotFound) => Ok(Redirect::to("/cart?error=line")),
        Err(e) => Err(AppError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(error_message("empty").contains("empty"));
        assert!(error_message("line").contains("no longer"));
        assert!(error_message("unknown").starts_with("Something"));
    }

    #[test]
    fn test_invalid_quantity_redirects_back_to_product() {
        let response = product_error_redirect(ProductId::new(7));
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/products/7?error=quantity")
        );
    }
}
