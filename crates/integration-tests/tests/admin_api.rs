//! Admin console API surface: product CRUD, order management, user listing.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;

use oakline_client::api::{AdminApi, ProductApi};
use oakline_client::models::{OrderStatus, ProductForm};
use oakline_integration_tests::{TestHarness, admin_profile, user_json};

fn product_json(id: &str, name: &str, price: u32) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "price": price,
        "category": "Kitchen",
        "inStock": true,
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

fn order_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "user": "u-1",
        "orderItems": [
            {"product": "p-1", "title": "Teak Tray", "price": 45, "quantity": 1}
        ],
        "shippingAddress": {
            "fullName": "Asha Rao",
            "phone": "9000000000",
            "addressLine1": "12 Teak Lane",
            "city": "Pune",
            "state": "MH",
            "pincode": "411001",
            "country": "India"
        },
        "paymentInfo": {
            "paymentOrderId": "prov_order_1",
            "paymentStatus": "completed"
        },
        "pricing": {
            "itemsPrice": 45,
            "taxPrice": "8.10",
            "shippingPrice": 10,
            "totalPrice": "63.10"
        },
        "orderStatus": status,
        "createdAt": "2026-01-02T00:00:00Z",
        "updatedAt": "2026-01-02T00:00:00Z"
    })
}

#[tokio::test]
async fn test_create_product_uses_admin_token() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_admin("tok-admin-1", &admin_profile("Store Ops"));
    let admin = AdminApi::new(harness.gateway.clone());

    let mock = server
        .mock("POST", "/api/products")
        .match_header("authorization", "Bearer tok-admin-1")
        .with_status(201)
        .with_body(json!({"product": product_json("p-9", "Walnut Bowl", 32)}).to_string())
        .create_async()
        .await;

    let form = ProductForm::new("Walnut Bowl", Decimal::from(32), "Kitchen", 5);
    let product = admin.create_product(&form).await.unwrap();

    assert_eq!(product.id.as_str(), "p-9");
    assert_eq!(product.name, "Walnut Bowl");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_and_delete_product() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_admin("tok-admin-1", &admin_profile("Store Ops"));
    let admin = AdminApi::new(harness.gateway.clone());

    let update = server
        .mock("PUT", "/api/products/p-9")
        .with_status(200)
        .with_body(json!({"product": product_json("p-9", "Walnut Bowl XL", 38)}).to_string())
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/products/p-9")
        .match_header("authorization", "Bearer tok-admin-1")
        .with_status(200)
        .with_body(json!({"message": "Product removed"}).to_string())
        .create_async()
        .await;

    let form = ProductForm::new("Walnut Bowl XL", Decimal::from(38), "Kitchen", 3);
    let updated = admin.update_product(&"p-9".into(), &form).await.unwrap();
    assert_eq!(updated.name, "Walnut Bowl XL");

    admin.delete_product(&"p-9".into()).await.unwrap();

    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_product_mutation_invalidates_catalog_cache() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_admin("tok-admin-1", &admin_profile("Store Ops"));
    let admin = AdminApi::new(harness.gateway.clone());
    let catalog = ProductApi::new(harness.gateway.clone());

    let list = server
        .mock("GET", "/api/products")
        .with_status(200)
        .with_body(json!({"products": [product_json("p-1", "Teak Tray", 45)]}).to_string())
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/api/products")
        .with_status(201)
        .with_body(json!({"product": product_json("p-9", "Walnut Bowl", 32)}).to_string())
        .create_async()
        .await;

    // Two reads, one fetch: the second is served from cache.
    catalog.list().await.unwrap();
    catalog.list().await.unwrap();

    let form = ProductForm::new("Walnut Bowl", Decimal::from(32), "Kitchen", 5);
    admin.create_product(&form).await.unwrap();
    catalog.invalidate();

    // After invalidation the next read goes back to the backend.
    catalog.list().await.unwrap();
    list.assert_async().await;
}

#[tokio::test]
async fn test_update_order_status() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_admin("tok-admin-1", &admin_profile("Store Ops"));
    let admin = AdminApi::new(harness.gateway.clone());

    server
        .mock("PUT", "/api/orders/o-1/status")
        .with_status(200)
        .with_body(json!({"order": order_json("o-1", "shipped")}).to_string())
        .create_async()
        .await;

    let order = admin
        .update_order_status(&"o-1".into(), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(order.order_status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_list_orders_and_users() {
    let mut server = mockito::Server::new_async().await;
    let harness = TestHarness::new(&server.url());
    harness.seed_admin("tok-admin-1", &admin_profile("Store Ops"));
    let admin = AdminApi::new(harness.gateway.clone());

    server
        .mock("GET", "/api/orders")
        .with_status(200)
        .with_body(json!({"orders": [order_json("o-1", "pending")]}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/users")
        .with_status(200)
        .with_body(json!({"users": [user_json("Asha", "customer")]}).to_string())
        .create_async()
        .await;

    let orders = admin.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id.as_str(), "o-1");

    let users = admin.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Asha");
}
