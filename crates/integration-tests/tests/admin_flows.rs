//! Admin console flows against a running admin server.
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use bazaar_integration_tests::{admin_base_url, client, location};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

fn admin_credentials() -> (String, String) {
    let email = std::env::var("BAZAAR_TEST_ADMIN_EMAIL").expect("BAZAAR_TEST_ADMIN_EMAIL not set");
    let password =
        std::env::var("BAZAAR_TEST_ADMIN_PASSWORD").expect("BAZAAR_TEST_ADMIN_PASSWORD not set");
    (email, password)
}

/// A client signed in as the test admin.
async fn authenticated_client() -> Client {
    let client = client();
    let (email, password) = admin_credentials();

    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    client
}

async fn update_status(client: &Client, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}/orders/update-status", admin_base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to update status");
    let status = resp.status();
    let body = resp.json().await.expect("Response was not JSON");
    (status, body)
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_pages_require_login() {
    let base_url = admin_base_url();
    for path in ["/", "/orders", "/products", "/users"] {
        let resp = client()
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to reach admin");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/auth/login", "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_status_update_requires_login() {
    let resp = client()
        .post(format!("{}/orders/update-status", admin_base_url()))
        .json(&json!({"orderId": 1, "status": "Shipped"}))
        .send()
        .await
        .expect("Failed to reach admin");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_wrong_password_rejected() {
    let (email, _) = admin_credentials();
    let resp = client()
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[("email", email.as_str()), ("password", "definitely-wrong")])
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?error=credentials");
}

#[tokio::test]
#[ignore = "Requires running admin server and an admin account"]
async fn test_dashboard_renders() {
    let client = authenticated_client().await;
    let resp = client
        .get(admin_base_url())
        .send()
        .await
        .expect("Failed to get dashboard");

    assert_eq!(resp.status(), StatusCode::OK);
    let cache_control = resp.headers()["cache-control"].to_str().unwrap_or_default().to_string();
    assert!(cache_control.contains("no-store"));
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Revenue"));
    assert!(body.contains("Recent orders"));
}

#[tokio::test]
#[ignore = "Requires running admin server and an admin account"]
async fn test_invalid_status_rejected() {
    let client = authenticated_client().await;
    let (status, body) =
        update_status(&client, &json!({"orderId": 1, "status": "Teleported"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Invalid status")
    );
}

#[tokio::test]
#[ignore = "Requires running admin server and an admin account"]
async fn test_unknown_order_is_not_found() {
    let client = authenticated_client().await;
    let (status, body) =
        update_status(&client, &json!({"orderId": 2_000_000_000, "status": "Shipped"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");
}

#[tokio::test]
#[ignore = "Requires running admin server and an admin account"]
async fn test_logout_ends_session() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to get orders");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}
