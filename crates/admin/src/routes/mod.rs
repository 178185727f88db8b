//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//! GET  /health/ready               - Database check
//!
//! # Dashboard
//! GET  /                           - Counts, revenue and recent orders
//!
//! # Auth
//! GET  /auth/login                 - Login page
//! POST /auth/login                 - Email and password login
//! POST /auth/logout                - Logout
//!
//! # Customers
//! GET  /users                      - Customer listing
//! GET  /users/{id}                 - Customer detail with order history
//!
//! # Orders
//! GET  /orders                     - Every order, newest first
//! POST /orders/update-status       - JSON status change (editors only)
//!
//! # Products (writes are editors only)
//! GET  /products                   - Product listing
//! GET  /products/new               - New product form
//! POST /products                   - Create (multipart)
//! GET  /products/{id}/edit         - Edit form
//! POST /products/{id}              - Update (multipart)
//! POST /products/{id}/delete       - Delete
//! GET  /images/{id}                - Image preview
//! ```

pub mod auth;
pub mod dashboard;
pub mod images;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router (health checks are added by [`crate::app`]).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .merge(auth::router())
        .route("/users", get(users::index))
        .route("/users/{id}", get(users::show))
        .route("/orders", get(orders::index))
        .route("/orders/update-status", post(orders::update_status))
        .nest("/products", products::router())
        .route("/images/{id}", get(images::show))
}
