//! Integration tests for the public catalog endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Demo data loaded (cargo run -p gambo-cli -- seed)
//! - The storefront server running (cargo run -p gambo-storefront)
//!
//! Run with: cargo test -p gambo-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_product_listing_is_paginated() {
    let base_url = storefront_base_url();

    let resp = Client::new()
        .get(format!("{base_url}/products?page=1&per_page=2"))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse listing");

    let products = body
        .get("products")
        .and_then(Value::as_array)
        .expect("listing has products array");
    assert!(products.len() <= 2);
    assert_eq!(body.get("page").and_then(Value::as_i64), Some(1));
    assert_eq!(body.get("per_page").and_then(Value::as_i64), Some(2));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_product_detail_includes_variants() {
    let base_url = storefront_base_url();
    let client = Client::new();

    let listing: Value = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse listing");

    let first_id = listing
        .get("products")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|p| p.get("id"))
        .and_then(Value::as_i64)
        .expect("at least one seeded product");

    let resp = client
        .get(format!("{base_url}/products/{first_id}"))
        .send()
        .await
        .expect("Failed to get product detail");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse detail");
    assert!(body.get("product").is_some());
    assert!(body.get("variants").and_then(Value::as_array).is_some());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_unknown_product_is_404() {
    let resp = Client::new()
        .get(format!("{}/products/999999", storefront_base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_category_filter() {
    let base_url = storefront_base_url();
    let client = Client::new();

    let categories: Vec<Value> = client
        .get(format!("{base_url}/categories"))
        .send()
        .await
        .expect("Failed to list categories")
        .json()
        .await
        .expect("Failed to parse categories");

    let slug = categories
        .first()
        .and_then(|c| c.get("slug"))
        .and_then(Value::as_str)
        .expect("at least one seeded category")
        .to_owned();

    let resp = client
        .get(format!("{base_url}/products?category={slug}"))
        .send()
        .await
        .expect("Failed to filter products");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_offers_endpoint() {
    let resp = Client::new()
        .get(format!("{}/offers", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list offers");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse offers");
    assert!(body.as_array().is_some());
}
