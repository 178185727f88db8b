//! Customer pages.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::instrument;

use bazaar_core::UserId;

use crate::{
    db::{CustomerRepository, OrderRepository},
    error::{AppError, Result, render},
    filters,
    middleware::RequireAdminAuth,
    models::{AdminOrder, CurrentAdmin, Customer},
    state::AppState,
};

#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub current_admin: Option<CurrentAdmin>,
    pub customers: Vec<Customer>,
}

#[derive(Template)]
#[template(path = "users/show.html")]
pub struct UserDetailTemplate {
    pub current_admin: Option<CurrentAdmin>,
    pub customer: Customer,
    pub orders: Vec<AdminOrder>,
}

/// GET /users
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Html<String>> {
    let customers = CustomerRepository::new(state.pool()).list().await?;

    render(&UsersTemplate {
        current_admin: Some(admin),
        customers,
    })
}

/// GET /users/{id}
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<UserId>,
) -> Result<Html<String>> {
    let customer = CustomerRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;
    let orders = OrderRepository::new(state.pool()).list_for_user(id).await?;

    render(&UserDetailTemplate {
        current_admin: Some(admin),
        customer,
        orders,
    })
}
