//! Integration tests for storefront authentication.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p gambo-storefront)
//!
//! Run with: cargo test -p gambo-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a client with a cookie store so the session survives requests.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Unique email per test run so re-runs do not hit the unique constraint.
fn unique_email() -> String {
    format!("integration-test-{}@example.com", Uuid::new_v4())
}

/// Register a fresh account and leave the client logged in.
async fn register(client: &Client, email: &str, password: &str) -> Value {
    let base_url = storefront_base_url();
    let resp = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({
            "name": "Integration Test",
            "email": email,
            "phone": "01700000000",
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse register response")
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_readiness() {
    let resp = client()
        .get(format!("{}/health/ready", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_login_me_logout_flow() {
    let client = client();
    let base_url = storefront_base_url();
    let email = unique_email();
    let password = "integration-test-password";

    let user = register(&client, &email, password).await;
    assert_eq!(user.get("email").and_then(Value::as_str), Some(email.as_str()));

    // Registration leaves us logged in.
    let resp = client
        .get(format!("{base_url}/auth/me"))
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout drops the session.
    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to logout");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/auth/me"))
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Log back in with the same credentials.
    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/auth/me"))
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_duplicate_registration_conflicts() {
    let client = client();
    let base_url = storefront_base_url();
    let email = unique_email();

    register(&client, &email, "integration-test-password").await;

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({
            "name": "Second Account",
            "email": email,
            "phone": "01700000001",
            "password": "another-password",
        }))
        .send()
        .await
        .expect("Failed to send duplicate registration");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_login_with_wrong_password_is_unauthorized() {
    let client = client();
    let base_url = storefront_base_url();
    let email = unique_email();

    register(&client, &email, "integration-test-password").await;

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": "wrong password" }))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_short_password_rejected() {
    let resp = client()
        .post(format!("{}/auth/register", storefront_base_url()))
        .json(&json!({
            "name": "Short Password",
            "email": unique_email(),
            "phone": "01700000002",
            "password": "short",
        }))
        .send()
        .await
        .expect("Failed to send registration");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
