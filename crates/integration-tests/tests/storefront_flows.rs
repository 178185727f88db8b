//! Shopper flows against a running storefront.
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use bazaar_integration_tests::{
    cart_line_ids, client, location, order_count, stock_on_page, stock_product_id,
    storefront_base_url, test_product_id, unique_email, unique_phone,
};
use reqwest::{Client, StatusCode};

const PASSWORD: &str = "hunter2-but-longer";

/// Register a new shopper through both steps and return their email.
async fn register(client: &Client) -> String {
    let base_url = storefront_base_url();
    let email = unique_email();
    let phone = unique_phone();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", email.as_str()),
            ("phone", phone.as_str()),
            ("password", PASSWORD),
        ])
        .send()
        .await
        .expect("Failed to submit registration");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/register/address");

    let resp = client
        .post(format!("{base_url}/auth/register/address"))
        .form(&[
            ("state", "Goa"),
            ("district", "North Goa"),
            ("area_name", "Panaji"),
            ("pincode", "403001"),
        ])
        .send()
        .await
        .expect("Failed to submit address");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&email));

    email
}

async fn login(client: &Client, username: &str) {
    let resp = client
        .post(format!("{}/auth/login", storefront_base_url()))
        .form(&[("username", username), ("password", PASSWORD)])
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(!location(&resp).contains("error="));
}

/// A fresh shopper, registered and signed in.
async fn shopper() -> Client {
    let client = client();
    let email = register(&client).await;
    login(&client, &email).await;
    client
}

async fn add_to_cart(client: &Client, product_id: &str, form: &[(&str, &str)]) {
    let resp = client
        .post(format!("{}/products/{product_id}/cart", storefront_base_url()))
        .form(form)
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart");
}

async fn get_page(client: &Client, path: &str) -> String {
    let resp = client
        .get(format!("{}{path}", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get page");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read response")
}

async fn place_order(client: &Client, upi_id: &str) {
    let resp = client
        .post(format!("{}/checkout", storefront_base_url()))
        .form(&[("upi_id", upi_id)])
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn product_stock(client: &Client, product_id: &str) -> i32 {
    let body = get_page(client, &format!("/products/{product_id}")).await;
    stock_on_page(&body).expect("product page without stock badge")
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_requires_login() {
    let resp = client()
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?next=%2Fcart");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_password_rejected() {
    let client = client();
    let email = register(&client).await;

    let resp = client
        .post(format!("{}/auth/login", storefront_base_url()))
        .form(&[("username", email.as_str()), ("password", "not-the-password")])
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).contains("error=credentials"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_duplicate_registration_rejected() {
    let base_url = storefront_base_url();
    let first = client();
    let email = register(&first).await;

    let resp = client()
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", email.as_str()),
            ("phone", unique_phone().as_str()),
            ("password", PASSWORD),
        ])
        .send()
        .await
        .expect("Failed to submit registration");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/register?error=exists");
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_checkout_with_empty_cart_redirects() {
    let client = client();
    let email = register(&client).await;
    login(&client, &email).await;

    let resp = client
        .get(format!("{}/checkout", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get checkout");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart?error=empty");
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_add_to_cart_and_place_order() {
    let base_url = storefront_base_url();
    let product_id = test_product_id();
    let client = client();
    let email = register(&client).await;
    login(&client, &email).await;

    let resp = client
        .post(format!("{base_url}/products/{product_id}/cart"))
        .form(&[("quantity", "2")])
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart");

    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&[("upi_id", "UPI-TEST-0001")])
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("BZ"));

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to get orders");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Pending"));
    assert!(body.contains("UPI-TEST-0001"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_quantity_out_of_range_rejected() {
    let base_url = storefront_base_url();
    let product_id = test_product_id();
    let client = client();
    let email = register(&client).await;
    login(&client, &email).await;

    let resp = client
        .post(format!("{base_url}/products/{product_id}/cart"))
        .form(&[("quantity", "100")])
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        format!("/products/{product_id}?error=quantity")
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_duplicate_phone_rejected() {
    let base_url = storefront_base_url();
    let phone = unique_phone();

    let first = client();
    let resp = first
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", unique_email().as_str()),
            ("phone", phone.as_str()),
            ("password", PASSWORD),
        ])
        .send()
        .await
        .expect("Failed to submit registration");
    assert_eq!(location(&resp), "/auth/register/address");
    let resp = first
        .post(format!("{base_url}/auth/register/address"))
        .form(&[
            ("state", "Kerala"),
            ("district", "Ernakulam"),
            ("area_name", "Kakkanad"),
            ("pincode", "682030"),
        ])
        .send()
        .await
        .expect("Failed to submit address");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client()
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", unique_email().as_str()),
            ("phone", phone.as_str()),
            ("password", PASSWORD),
        ])
        .send()
        .await
        .expect("Failed to submit registration");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/register?error=exists");
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_checkout_empties_cart_and_records_one_order() {
    let product_id = test_product_id();
    let client = shopper().await;

    add_to_cart(&client, &product_id, &[("quantity", "1")]).await;
    add_to_cart(&client, &product_id, &[("quantity", "1"), ("size", "XL")]).await;
    assert_eq!(cart_line_ids(&get_page(&client, "/cart").await).len(), 2);

    place_order(&client, "UPI-TEST-0002").await;

    let cart = get_page(&client, "/cart").await;
    assert!(cart_line_ids(&cart).is_empty());
    assert!(cart.contains("Your cart is empty"));

    let orders = get_page(&client, "/orders").await;
    assert_eq!(order_count(&orders), 1);

    let resp = client
        .post(format!("{}/checkout", storefront_base_url()))
        .form(&[("upi_id", "UPI-TEST-0003")])
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart?error=empty");
    assert_eq!(order_count(&get_page(&client, "/orders").await), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_stock_moves_only_at_checkout_and_stops_at_zero() {
    let product_id = stock_product_id();
    let client = shopper().await;

    let before = product_stock(&client, &product_id).await;
    assert!(before <= 94, "stock product needs at most 94 units");
    let quantity = (before + 5).to_string();

    add_to_cart(&client, &product_id, &[("quantity", quantity.as_str())]).await;
    assert_eq!(product_stock(&client, &product_id).await, before);

    place_order(&client, "UPI-TEST-0004").await;
    assert_eq!(product_stock(&client, &product_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_same_selection_merges_into_one_line() {
    let product_id = test_product_id();
    let client = shopper().await;

    let indigo_m = [("quantity", "1"), ("size", "M"), ("color", "Indigo")];
    add_to_cart(&client, &product_id, &indigo_m).await;
    add_to_cart(&client, &product_id, &indigo_m).await;
    add_to_cart(
        &client,
        &product_id,
        &[("quantity", "1"), ("size", "L"), ("color", "Indigo")],
    )
    .await;

    let cart = get_page(&client, "/cart").await;
    assert_eq!(cart_line_ids(&cart).len(), 2);
    assert!(cart.contains(r#"name="quantity" value="2""#));
    assert!(cart.contains("Total (3 items)"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_buy_now_replaces_cart() {
    let base_url = storefront_base_url();
    let product_id = test_product_id();
    let client = shopper().await;

    add_to_cart(&client, &product_id, &[("quantity", "3"), ("size", "S")]).await;
    add_to_cart(&client, &product_id, &[("quantity", "1"), ("size", "L")]).await;

    let resp = client
        .post(format!("{base_url}/products/{product_id}/buy-now"))
        .form(&[("quantity", "1"), ("size", "M")])
        .send()
        .await
        .expect("Failed to buy now");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/checkout");

    let cart = get_page(&client, "/cart").await;
    assert_eq!(cart_line_ids(&cart).len(), 1);
    assert!(cart.contains("Size M"));
    assert!(cart.contains("Total (1 items)"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_cannot_edit_another_shoppers_line() {
    let base_url = storefront_base_url();
    let product_id = test_product_id();
    let owner = shopper().await;
    let other = shopper().await;

    add_to_cart(&owner, &product_id, &[("quantity", "1")]).await;
    let line_id = cart_line_ids(&get_page(&owner, "/cart").await)
        .pop()
        .expect("owner cart has a line");

    let resp = other
        .post(format!("{base_url}/cart/{line_id}/quantity"))
        .form(&[("quantity", "5")])
        .send()
        .await
        .expect("Failed to update quantity");
    assert_eq!(location(&resp), "/cart?error=line");

    let resp = other
        .post(format!("{base_url}/cart/{line_id}/remove"))
        .send()
        .await
        .expect("Failed to remove line");
    assert_eq!(location(&resp), "/cart?error=line");

    let cart = get_page(&owner, "/cart").await;
    assert_eq!(cart_line_ids(&cart), vec![line_id]);
    assert!(cart.contains("Total (1 items)"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded catalog"]
async fn test_add_to_cart_is_rate_limited() {
    let base_url = storefront_base_url();
    let product_id = test_product_id();
    let client = shopper().await;

    let mut limited = 0;
    for _ in 0..60 {
        let resp = client
            .post(format!("{base_url}/products/{product_id}/cart"))
            .form(&[("quantity", "1")])
            .send()
            .await
            .expect("Failed to add to cart");
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            limited += 1;
        }
    }

    assert!(limited > 0, "60 rapid adds were never throttled");
}
