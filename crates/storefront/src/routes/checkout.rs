//! Checkout and order confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Cart, CurrentUser, Order, User};
use crate::services::checkout::MAX_TRANSACTION_ID_LENGTH;
use crate::services::{CartService, CheckoutError, CheckoutService};
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub upi_id: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart: Cart,
    pub user: User,
    pub max_transaction_id_length: usize,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "confirmation.html")]
pub struct ConfirmationTemplate {
    pub current_user: Option<CurrentUser>,
    pub order: Order,
}

fn error_message(code: &str) -> String {
    match code {
        "transaction_id" => format!(
            "Enter the UPI transaction ID from your payment app (up to {MAX_TRANSACTION_ID_LENGTH} characters)."
        ),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Display the checkout page.
#[instrument(skip(state, current))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let cart = CartService::new(state.pool()).cart(current.id).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart?error=empty").into_response());
    }

    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or(AppError::Checkout(CheckoutError::UserNotFound))?;

    Ok(CheckoutTemplate {
        current_user: Some(current),
        cart,
        user,
        max_transaction_id_length: MAX_TRANSACTION_ID_LENGTH,
        error: query.error.as_deref().map(error_message),
    }
    .into_response())
}

/// Place the order for everything in the cart.
#[instrument(skip(state, current, form), fields(user_id = %current.id))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let order = match CheckoutService::new(state.pool())
        .place_order(&current, &form.upi_id)
        .await
    {
        Ok(order) => order,
        Err(CheckoutError::EmptyCart) => {
            return Ok(Redirect::to("/cart?error=empty").into_response());
        }
        Err(CheckoutError::InvalidTransactionId) => {
            return Ok(Redirect::to("/checkout?error=transaction_id").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let order_number = order.id.number();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order", order_number.as_str())]),
    );
    tracing::info!(order = %order_number, total = %order.total_amount, "Order placed");

    Ok(ConfirmationTemplate {
        current_user: Some(current),
        order,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_error_mentions_limit() {
        assert!(error_message("transaction_id").contains("64"));
    }
}
