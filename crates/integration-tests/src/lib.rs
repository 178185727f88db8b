//! Integration tests for Bazaar.
//!
//! The tests drive running servers over HTTP and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! bz-cli migrate
//! bz-cli seed catalog seed/catalog.yaml --clear
//! BAZAAR_ADMIN_PASSWORD='...' bz-cli admin create -e ops@example.com -n Ops -r admin
//!
//! cargo run -p bazaar-storefront &
//! cargo run -p bazaar-admin &
//!
//! BAZAAR_TEST_ADMIN_EMAIL=ops@example.com BAZAAR_TEST_ADMIN_PASSWORD='...' \
//!   cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - defaults to `http://localhost:3000`
//! - `ADMIN_BASE_URL` - defaults to `http://localhost:3001`
//! - `BAZAAR_TEST_PRODUCT_ID` - an active product with stock, defaults to `1`
//! - `BAZAAR_TEST_STOCK_PRODUCT_ID` - an active product with at most 94 units
//!   that only the stock test orders, defaults to `2`
//! - `BAZAAR_TEST_ADMIN_EMAIL` / `BAZAAR_TEST_ADMIN_PASSWORD` - an admin or
//!   super admin account

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, redirect};
use uuid::Uuid;

/// Base URL for the storefront.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin console.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Product used by the shopping flows.
#[must_use]
pub fn test_product_id() -> String {
    std::env::var("BAZAAR_TEST_PRODUCT_ID").unwrap_or_else(|_| "1".to_string())
}

/// Product whose stock the stock test drains. No other test orders it.
#[must_use]
pub fn stock_product_id() -> String {
    std::env::var("BAZAAR_TEST_STOCK_PRODUCT_ID").unwrap_or_else(|_| "2".to_string())
}

/// A client with its own cookie jar that does not follow redirects, so tests
/// can assert on `Location`.
///
/// Each client sends its own `X-Forwarded-For` address, so parallel tests do
/// not share a rate limit bucket.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_str(&client_address()).expect("address is a valid header"),
    );

    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// A random address in the 198.18.0.0/15 benchmarking range.
fn client_address() -> String {
    let [a, b, c, ..] = Uuid::new_v4().into_bytes();
    format!("198.{}.{b}.{c}", 18 + (a & 1))
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("shopper-{}@example.com", Uuid::new_v4().simple())
}

/// A phone number no other test run has used.
#[must_use]
pub fn unique_phone() -> String {
    let digits = Uuid::new_v4().as_u128() % 10_000_000_000;
    format!("9{digits:010}")
}

/// The `Location` header of a redirect response.
///
/// # Panics
///
/// Panics if the header is missing or not valid UTF-8.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .expect("redirect without Location")
        .to_str()
        .expect("Location is not UTF-8")
        .to_string()
}

/// Units shown in the stock badge of a product page. `None` if the page has
/// no badge.
#[must_use]
pub fn stock_on_page(body: &str) -> Option<i32> {
    let badge = body.split("<p class=\"stock ").nth(1)?;
    let label = badge.split_once('>')?.1.split_once('<')?.0;
    if label.starts_with("Out of Stock") {
        return Some(0);
    }
    let count = label.split_once('(')?.1.split_once(')')?.0;
    count.parse().ok()
}

/// Cart line ids on a cart page, in display order.
#[must_use]
pub fn cart_line_ids(body: &str) -> Vec<String> {
    body.split("action=\"/cart/")
        .skip(1)
        .filter_map(|rest| rest.split_once("/remove\""))
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Number of orders listed on the order history page.
#[must_use]
pub fn order_count(body: &str) -> usize {
    body.matches("<article class=\"order\">").count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_on_page() {
        assert_eq!(
            stock_on_page(r#"<p class="stock low-stock">Low Stock (3)</p>"#),
            Some(3)
        );
        assert_eq!(
            stock_on_page(r#"<p class="stock in-stock">In Stock (40)</p>"#),
            Some(40)
        );
        assert_eq!(
            stock_on_page(r#"<p class="stock out-of-stock">Out of Stock</p>"#),
            Some(0)
        );
        assert_eq!(stock_on_page("<p>No badge</p>"), None);
    }

    #[test]
    fn test_cart_line_ids_skip_quantity_forms() {
        let body = r#"
            <form method="post" action="/cart/12/quantity" class="inline"></form>
            <form method="post" action="/cart/12/remove" class="inline"></form>
            <form method="post" action="/cart/15/quantity" class="inline"></form>
            <form method="post" action="/cart/15/remove" class="inline"></form>
        "#;
        assert_eq!(cart_line_ids(body), vec!["12", "15"]);
        assert!(cart_line_ids("<p>Your cart is empty.</p>").is_empty());
    }

    #[test]
    fn test_client_address_is_valid_ip() {
        let address: std::net::IpAddr = client_address().parse().unwrap();
        assert!(address.to_string().starts_with("198.1"));
    }

    #[test]
    fn test_order_count() {
        let body = r#"<article class="order"></article><article class="order"></article>"#;
        assert_eq!(order_count(body), 2);
        assert_eq!(order_count("<p>No orders</p>"), 0);
    }
}
