//! Integration tests for the cart and cash-on-delivery checkout flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Demo data loaded (cargo run -p gambo-cli -- seed)
//! - The storefront server running (cargo run -p gambo-storefront)
//! - `GAMBO_DATABASE_URL` (or `DATABASE_URL`) set, for the tests that
//!   mutate seeded rows directly
//!
//! Run with: cargo test -p gambo-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Direct database connection for tests that mutate seeded rows.
async fn db_pool() -> sqlx::PgPool {
    let url = std::env::var("GAMBO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("GAMBO_DATABASE_URL or DATABASE_URL must be set");

    sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// Current catalog selling price of a product.
async fn catalog_price(client: &Client, product_id: i64) -> Decimal {
    let detail: Value = client
        .get(format!("{}/products/{product_id}", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get product detail")
        .json()
        .await
        .expect("Failed to parse product detail");

    detail
        .get("product")
        .and_then(|p| p.get("selling_price"))
        .and_then(Value::as_str)
        .expect("product has selling_price")
        .parse()
        .expect("selling_price parses as decimal")
}

/// Unit price of the single item on an order, read from order history.
async fn order_unit_price(client: &Client, order_number: &str) -> Decimal {
    let detail: Value = client
        .get(format!("{}/orders/{order_number}", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get order detail")
        .json()
        .await
        .expect("Failed to parse order detail");

    let items = detail
        .get("items")
        .and_then(Value::as_array)
        .expect("order has items");
    assert_eq!(items.len(), 1);

    items[0]
        .get("unit_price")
        .and_then(Value::as_str)
        .expect("item has unit_price")
        .parse()
        .expect("unit_price parses as decimal")
}

/// Register a throwaway account and return a logged-in client.
async fn logged_in_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");

    let resp = client
        .post(format!("{}/auth/register", storefront_base_url()))
        .json(&json!({
            "name": "Cart Test",
            "email": format!("integration-test-{}@example.com", Uuid::new_v4()),
            "phone": "01700000000",
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

/// First product id from the seeded catalog.
async fn first_product_id(client: &Client) -> i64 {
    let listing: Value = client
        .get(format!("{}/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse listing");

    listing
        .get("products")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|p| p.get("id"))
        .and_then(Value::as_i64)
        .expect("at least one seeded product")
}

/// Create a shipping address and return its id.
async fn create_address(client: &Client) -> i64 {
    let resp = client
        .post(format!("{}/account/addresses", storefront_base_url()))
        .json(&json!({
            "phone": "01712345678",
            "street_address": "12/3 Integration Lane",
            "city": "Dhaka",
            "postal_code": "1207",
            "is_default": true,
        }))
        .send()
        .await
        .expect("Failed to create address");
    assert_eq!(resp.status(), StatusCode::OK);

    let address: Value = resp.json().await.expect("Failed to parse address");
    address
        .get("id")
        .and_then(Value::as_i64)
        .expect("address has id")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cart_requires_auth() {
    let resp = Client::new()
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_add_update_remove_cart_line() {
    let client = logged_in_client().await;
    let base_url = storefront_base_url();
    let product_id = first_product_id(&client).await;

    // Add two units.
    let resp = client
        .post(format!("{base_url}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add item");
    assert_eq!(resp.status(), StatusCode::OK);

    // Adding the same product merges instead of creating a second line.
    let resp = client
        .post(format!("{base_url}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add item again");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");

    let items = cart
        .get("items")
        .and_then(Value::as_array)
        .expect("cart has items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get("quantity").and_then(Value::as_i64), Some(3));

    let item_id = items[0]
        .get("item_id")
        .and_then(Value::as_i64)
        .expect("line has id");

    // Set the quantity back down.
    let resp = client
        .put(format!("{base_url}/cart/items/{item_id}"))
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .expect("Failed to update item");
    assert_eq!(resp.status(), StatusCode::OK);

    // Remove the line.
    let resp = client
        .delete(format!("{base_url}/cart/items/{item_id}"))
        .send()
        .await
        .expect("Failed to remove item");
    assert_eq!(resp.status(), StatusCode::OK);

    let count: Value = client
        .get(format!("{base_url}/cart/count"))
        .send()
        .await
        .expect("Failed to get cart count")
        .json()
        .await
        .expect("Failed to parse count");
    assert_eq!(count.get("count").and_then(Value::as_i64), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_zero_quantity_rejected() {
    let client = logged_in_client().await;
    let product_id = first_product_id(&client).await;

    let resp = client
        .post(format!("{}/cart/items", storefront_base_url()))
        .json(&json!({ "product_id": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cod_checkout_and_cancel_flow() {
    let client = logged_in_client().await;
    let base_url = storefront_base_url();
    let product_id = first_product_id(&client).await;
    let address_id = create_address(&client).await;

    let resp = client
        .post(format!("{base_url}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add item");
    assert_eq!(resp.status(), StatusCode::OK);

    // Place a cash-on-delivery order.
    let resp = client
        .post(format!("{base_url}/checkout"))
        .json(&json!({
            "shipping_address_id": address_id,
            "notes": "integration test order",
        }))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse checkout response");
    let order = body.get("order").expect("response has order");
    let number = order
        .get("order_number")
        .and_then(Value::as_str)
        .expect("order has number")
        .to_owned();
    assert!(number.starts_with("GB-"));
    assert_eq!(order.get("status").and_then(Value::as_str), Some("pending"));
    assert_eq!(
        order.get("payment_status").and_then(Value::as_str),
        Some("pending")
    );

    // Checkout drains the cart.
    let count: Value = client
        .get(format!("{base_url}/cart/count"))
        .send()
        .await
        .expect("Failed to get cart count")
        .json()
        .await
        .expect("Failed to parse count");
    assert_eq!(count.get("count").and_then(Value::as_i64), Some(0));

    // The order shows up in history with its items.
    let detail: Value = client
        .get(format!("{base_url}/orders/{number}"))
        .send()
        .await
        .expect("Failed to get order detail")
        .json()
        .await
        .expect("Failed to parse order detail");
    let items = detail
        .get("items")
        .and_then(Value::as_array)
        .expect("order has items");
    assert_eq!(items.len(), 1);

    // Pending orders can be cancelled.
    let resp = client
        .post(format!("{base_url}/orders/{number}/cancel"))
        .send()
        .await
        .expect("Failed to cancel order");
    assert_eq!(resp.status(), StatusCode::OK);

    // A second cancel conflicts.
    let resp = client
        .post(format!("{base_url}/orders/{number}/cancel"))
        .send()
        .await
        .expect("Failed to send second cancel");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and direct database access"]
async fn test_order_item_price_survives_catalog_change() {
    let client = logged_in_client().await;
    let base_url = storefront_base_url();
    let product_id = first_product_id(&client).await;
    let address_id = create_address(&client).await;

    let price_at_checkout = catalog_price(&client, product_id).await;

    let resp = client
        .post(format!("{base_url}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add item");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/checkout"))
        .json(&json!({ "shipping_address_id": address_id }))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse checkout response");
    let number = body
        .get("order")
        .and_then(|o| o.get("order_number"))
        .and_then(Value::as_str)
        .expect("order has number")
        .to_owned();

    // The item was billed at the catalog price in effect at checkout.
    assert_eq!(order_unit_price(&client, &number).await, price_at_checkout);

    // Reprice the product behind the order's back.
    let pool = db_pool().await;
    let db_product_id = i32::try_from(product_id).expect("product id fits i32");
    sqlx::query("UPDATE products SET selling_price = selling_price + 25 WHERE id = $1")
        .bind(db_product_id)
        .execute(&pool)
        .await
        .expect("Failed to reprice product");

    assert_eq!(
        catalog_price(&client, product_id).await,
        price_at_checkout + Decimal::from(25),
    );

    // The order item keeps the price it was sold at.
    assert_eq!(order_unit_price(&client, &number).await, price_at_checkout);

    // Put the catalog back for the other tests.
    sqlx::query("UPDATE products SET selling_price = $1 WHERE id = $2")
        .bind(price_at_checkout)
        .bind(db_product_id)
        .execute(&pool)
        .await
        .expect("Failed to restore price");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_with_empty_cart_rejected() {
    let client = logged_in_client().await;
    let address_id = create_address(&client).await;

    let resp = client
        .post(format!("{}/checkout", storefront_base_url()))
        .json(&json!({ "shipping_address_id": address_id }))
        .send()
        .await
        .expect("Failed to send checkout");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_default_address_delete_conflicts() {
    let client = logged_in_client().await;
    let address_id = create_address(&client).await;

    let resp = client
        .delete(format!(
            "{}/account/addresses/{address_id}",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to send delete");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_wishlist_toggle() {
    let client = logged_in_client().await;
    let base_url = storefront_base_url();
    let product_id = first_product_id(&client).await;

    let body: Value = client
        .post(format!("{base_url}/account/wishlist/toggle"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to toggle wishlist")
        .json()
        .await
        .expect("Failed to parse toggle response");
    assert_eq!(body.get("in_wishlist").and_then(Value::as_bool), Some(true));

    let body: Value = client
        .post(format!("{base_url}/account/wishlist/toggle"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to toggle wishlist back")
        .json()
        .await
        .expect("Failed to parse toggle response");
    assert_eq!(body.get("in_wishlist").and_then(Value::as_bool), Some(false));
}
