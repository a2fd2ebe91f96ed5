//! `ApiClient` against a mock HTTP backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use cosmetica_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId};
use cosmetica_integration_tests::{api_client, complete_form, product};
use cosmetica_storefront::backend::{BackendError, BackendHealth, OrderBackend, OrderPayload};
use cosmetica_storefront::cart::{CartManager, MemoryStore};
use cosmetica_storefront::checkout::{DetailsStep, PaymentSlip};
use httpmock::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;

/// ASCII content so body matchers can see the whole multipart body.
fn text_slip() -> PaymentSlip {
    PaymentSlip::new("slip.jpg", b"fake-jpeg-bytes".to_vec())
}

fn order_payload() -> OrderPayload {
    let mut cart = CartManager::load(MemoryStore::new());
    cart.add_item(product(1, "Cream", 20), 2).unwrap();
    let shipping = complete_form().validate().unwrap();
    OrderPayload::from_cart(UserId::new(7), cart.state(), &shipping)
}

fn product_json(id: i64, name: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "price": price,
        "images": [format!("https://cdn.example.com/{id}.jpg")],
        "category": 3,
        "stock": 10
    })
}

#[tokio::test]
async fn test_create_order_sends_multipart_form() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/orders")
                .body_contains("name=\"orderData\"")
                .body_contains("\"userId\":7")
                .body_contains("\"city\":\"Kandy\"")
                .body_contains("name=\"paymentSlip\"; filename=\"slip.jpg\"")
                .body_contains("fake-jpeg-bytes");
            then.status(201).json_body(json!({ "id": 42 }));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let order_id = client
        .create_order(&order_payload(), &text_slip())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(order_id, OrderId::new(42));
}

#[tokio::test]
async fn test_create_order_accepts_nested_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/orders");
            then.status(201)
                .json_body(json!({ "order": { "id": 43, "status": "pending" } }));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let order_id = client
        .create_order(&order_payload(), &text_slip())
        .await
        .unwrap();
    assert_eq!(order_id, OrderId::new(43));
}

#[tokio::test]
async fn test_generate_receipt_posts_to_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/orders/42/receipt");
            then.status(200).json_body(json!({ "receiptUrl": "/receipts/42.pdf" }));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    client.generate_receipt(OrderId::new(42)).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_carries_backend_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/orders");
            then.status(400)
                .json_body(json!({ "message": "Product 3 is out of stock" }));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let err = client
        .create_order(&order_payload(), &text_slip())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BackendError::Api { status: 400, ref message } if message == "Product 3 is out of stock"
    ));
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products/99");
            then.status(404).json_body(json!({ "error": "no such product" }));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let err = client.get_product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, BackendError::NotFound(ref path) if path == "/api/products/99"));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/categories")
                .header("authorization", "Bearer secret-token");
            then.status(200).json_body(json!([
                { "id": 3, "name": "Skincare", "description": "Creams and serums" },
                { "id": 4, "name": "Lips" }
            ]));
        })
        .await;

    let client = api_client(&server.url("/api"), Some("secret-token"));
    let categories = client.list_categories().await.unwrap();

    mock.assert_async().await;
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].id, CategoryId::new(3));
    assert_eq!(categories[1].description, None);
}

#[tokio::test]
async fn test_catalog_reads_are_cached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200).json_body(json!([
                product_json(1, "Cream", 20.0),
                product_json(2, "Toner", 12.5)
            ]));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let first = client.list_products().await.unwrap();
    let second = client.list_products().await.unwrap();

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(first, second);
    assert_eq!(first[1].price, Decimal::new(125, 1));
}

#[tokio::test]
async fn test_products_by_category() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/categories/3/products");
            then.status(200)
                .json_body(json!([product_json(1, "Cream", 20.0)]));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let products = client
        .list_products_by_category(CategoryId::new(3))
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].category, Some(CategoryId::new(3)));
}

#[tokio::test]
async fn test_order_history_parses() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/orders/user/7");
            then.status(200).json_body(json!([{
                "id": 42,
                "userId": 7,
                "total": 40.0,
                "status": "shipped",
                "shippingDetails": {
                    "firstName": "Nadia",
                    "lastName": "Perera",
                    "email": "nadia@example.com",
                    "phone": "0771234567",
                    "address": "12 Lotus Road",
                    "city": "Kandy",
                    "state": "Central",
                    "country": "Sri Lanka",
                    "postalCode": "20000"
                },
                "items": [
                    { "productId": 1, "name": "Cream", "quantity": 2, "price": 20.0 }
                ],
                "paymentSlip": "/uploads/slip-42.jpg",
                "createdAt": "2026-03-14T09:30:00Z"
            }]));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let orders = client.list_orders_for_user(UserId::new(7)).await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Shipped);
    assert_eq!(orders[0].total, Decimal::from(40));
    assert_eq!(orders[0].items[0].product_id, ProductId::new(1));
}

#[tokio::test]
async fn test_probe_reports_up_and_down() {
    let server = MockServer::start_async().await;
    let client = api_client(&server.url("/api"), None);

    let mut health = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).json_body(json!({ "status": "ok" }));
        })
        .await;
    assert_eq!(client.probe().await, BackendHealth::Up);
    health.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(503);
        })
        .await;
    let down = client.probe().await;
    assert!(matches!(down, BackendHealth::Down(ref reason) if reason.contains("503")));
}

#[tokio::test]
async fn test_probe_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).delay(Duration::from_secs(3));
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    assert_eq!(client.probe().await, BackendHealth::TimedOut);
}

#[tokio::test]
async fn test_checkout_through_http_backend() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/orders")
                .body_contains("\"total\":40.0");
            then.status(201).json_body(json!({ "order": { "id": 77 } }));
        })
        .await;
    let receipt = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/orders/77/receipt");
            then.status(200);
        })
        .await;

    let client = api_client(&server.url("/api"), None);
    let mut cart = CartManager::load(MemoryStore::new());
    cart.add_item(product(1, "Cream", 20), 2).unwrap();

    let payment = DetailsStep::new().submit(complete_form()).unwrap();
    let confirmation = payment
        .submit(Some(text_slip()), UserId::new(7), &mut cart, &client)
        .await
        .unwrap();

    create.assert_async().await;
    receipt.assert_async().await;
    assert_eq!(confirmation.order_id(), OrderId::new(77));
    assert!(confirmation.receipt_generated());
    assert!(cart.state().is_empty());
}
