//! Integration tests for the admin API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p gambo-admin)
//! - An admin account created via `gambo-cli admin create`, with its
//!   credentials in `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD`
//!
//! Run with: cargo test -p gambo-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the admin API (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

fn admin_credentials() -> (String, String) {
    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL must be set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD must be set");
    (email, password)
}

/// Log in as the test admin and return the authenticated client.
async fn authenticated_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");

    let (email, password) = admin_credentials();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::OK, "admin login failed");

    client
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_routes_require_admin_session() {
    let resp = Client::new()
        .get(format!("{}/dashboard", admin_base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_with_bad_credentials() {
    let resp = Client::new()
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": "nobody@example.com", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_dashboard_shape() {
    let client = authenticated_client().await;

    let resp = client
        .get(format!("{}/dashboard", admin_base_url()))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse dashboard");

    let monthly = body
        .get("monthly_revenue")
        .and_then(Value::as_array)
        .expect("dashboard has monthly_revenue");
    assert_eq!(monthly.len(), 12);

    assert!(body.get("status_counts").is_some());
    assert!(body.get("today_income").is_some());
    assert!(body.get("recent_orders").and_then(Value::as_array).is_some());
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_product_sales_report() {
    let client = authenticated_client().await;

    let resp = client
        .get(format!("{}/reports/product-sales", admin_base_url()))
        .send()
        .await
        .expect("Failed to get product sales");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse report");
    assert!(body.as_array().is_some());
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_order_list_filters() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);

    // Status filter
    let resp = client
        .get(format!("{base_url}/orders?status=pending"))
        .send()
        .await
        .expect("Failed to filter orders by status");
    assert_eq!(resp.status(), StatusCode::OK);

    // Search by order number or customer email
    let resp = client
        .get(format!("{base_url}/orders?search=GB-"))
        .send()
        .await
        .expect("Failed to search orders");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_category_crud() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let slug = format!("integration-test-{}", Uuid::new_v4());

    // Create
    let resp = client
        .post(format!("{base_url}/categories"))
        .json(&json!({ "name": "Integration Test", "slug": slug }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), StatusCode::OK);

    let category: Value = resp.json().await.expect("Failed to parse category");
    let id = category
        .get("id")
        .and_then(Value::as_i64)
        .expect("category has id");

    // Duplicate slug conflicts
    let resp = client
        .post(format!("{base_url}/categories"))
        .json(&json!({ "name": "Duplicate", "slug": slug }))
        .send()
        .await
        .expect("Failed to send duplicate create");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Update
    let resp = client
        .put(format!("{base_url}/categories/{id}"))
        .json(&json!({
            "name": "Integration Test Renamed",
            "slug": slug,
            "status": "inactive",
        }))
        .send()
        .await
        .expect("Failed to update category");
    assert_eq!(resp.status(), StatusCode::OK);

    // Delete
    let resp = client
        .delete(format!("{base_url}/categories/{id}"))
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(resp.status(), StatusCode::OK);

    // Gone now
    let resp = client
        .delete(format!("{base_url}/categories/{id}"))
        .send()
        .await
        .expect("Failed to send second delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_invalid_category_slug_rejected() {
    let client = authenticated_client().await;

    let resp = client
        .post(format!("{}/categories", admin_base_url()))
        .json(&json!({ "name": "Bad Slug", "slug": "Not A Slug!" }))
        .send()
        .await
        .expect("Failed to send create");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_offer_crud() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/offers"))
        .json(&json!({
            "title": "Integration Test Offer",
            "offer_type": "percentage",
            "discount_value": "10",
            "starts_at": "2026-01-01T00:00:00Z",
            "ends_at": "2026-12-31T23:59:59Z",
        }))
        .send()
        .await
        .expect("Failed to create offer");
    assert_eq!(resp.status(), StatusCode::OK);

    let offer: Value = resp.json().await.expect("Failed to parse offer");
    let id = offer.get("id").and_then(Value::as_i64).expect("offer has id");

    let resp = client
        .delete(format!("{base_url}/offers/{id}"))
        .send()
        .await
        .expect("Failed to delete offer");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_offer_with_inverted_window_rejected() {
    let client = authenticated_client().await;

    let resp = client
        .post(format!("{}/offers", admin_base_url()))
        .json(&json!({
            "title": "Backwards Offer",
            "offer_type": "fixed",
            "discount_value": "50",
            "starts_at": "2026-12-31T23:59:59Z",
            "ends_at": "2026-01-01T00:00:00Z",
        }))
        .send()
        .await
        .expect("Failed to send create");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
