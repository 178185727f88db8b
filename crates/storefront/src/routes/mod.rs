//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Landing page
//! GET  /home?search=              - Catalog grid (requires auth)
//! GET  /products/{id}             - Product detail (requires auth)
//! GET  /images/{id}               - Product image bytes
//!
//! # Cart (requires auth)
//! POST /products/{id}/cart        - Add to cart
//! POST /products/{id}/buy-now     - Replace cart with one line, go to checkout
//! GET  /cart                      - Cart page
//! POST /cart/{line_id}/quantity   - Set a line's quantity (0 removes)
//! POST /cart/{line_id}/remove     - Remove a line
//!
//! # Checkout (requires auth)
//! GET  /checkout                  - Summary, address and UPI form
//! POST /checkout                  - Place the order
//! GET  /orders                    - Order history
//!
//! # Auth
//! GET  /auth/register             - Registration step 1
//! POST /auth/register             - Validate email, phone and password
//! GET  /auth/register/address     - Registration step 2
//! POST /auth/register/address     - Create the account
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action
//! POST /auth/logout               - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod images;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/register/address",
            get(auth::address_page).post(auth::register_address),
        )
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/cart", post(cart::add).layer(api_rate_limiter()))
        .route("/{id}/buy-now", post(cart::buy_now).layer(api_rate_limiter()))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/{line_id}/quantity", post(cart::update_quantity))
        .route("/{line_id}/remove", post(cart::remove))
        .layer(api_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::landing))
        .route("/home", get(home::catalog))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            get(checkout::show)
                .post(checkout::place_order)
                .layer(api_rate_limiter()),
        )
        .route("/orders", get(orders::index))
        .route("/images/{id}", get(images::show))
        .nest("/auth", auth_routes())
}
