mod common;

use axum::{Router, http::StatusCode, routing::post};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use marketplace::api::handlers::payment_webhook_handler;
use marketplace::state::AppState;
use marketplace::utils::signing::hmac_hex;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;

struct Shop {
    seller_token: String,
    buyer_token: String,
    address_id: i64,
    product: common::TestProduct,
}

/// An active store selling one product at 20.00 (5 in stock), and a buyer
/// with a US address. Shipping is 5.00 for the first unit, 2.00 after.
async fn setup(pool: &PgPool, state: &AppState) -> Shop {
    let seller = common::create_user(pool, "seller@example.com", "SELLER").await;
    let buyer = common::create_user(pool, "buyer@example.com", "USER").await;
    let category = common::create_category(pool, "shirts").await;
    let store = common::create_store(pool, seller, "open-shop", "ACTIVE").await;
    let product = common::create_product(pool, store, category, "tee", "20.00", 5).await;
    let address_id = common::create_address(pool, buyer, "US").await;

    Shop {
        seller_token: common::issue_token(state, seller).await,
        buyer_token: common::issue_token(state, buyer).await,
        address_id,
        product,
    }
}

fn make_server(state: AppState) -> TestServer {
    let app = common::api_router(state.clone()).merge(
        Router::new()
            .route("/webhooks/payments", post(payment_webhook_handler))
            .with_state(state),
    );
    TestServer::new(app).unwrap()
}

fn money(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

async fn fill_cart(server: &TestServer, shop: &Shop, quantity: i32) -> Value {
    let response = server
        .put("/api/cart")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({
            "items": [{
                "product_id": shop.product.product_id,
                "variant_id": shop.product.variant_id,
                "size_id": shop.product.size_id,
                "quantity": quantity
            }]
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[sqlx::test]
async fn test_save_cart_prices_lines(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let server = make_server(state);

    let cart = fill_cart(&server, &shop, 2).await;

    assert_eq!(money(&cart["cart"]["sub_total"]), Decimal::new(4000, 2));
    assert_eq!(money(&cart["cart"]["shipping_fees"]), Decimal::new(700, 2));
    assert_eq!(money(&cart["cart"]["total"]), Decimal::new(4700, 2));
    assert_eq!(cart["items"][0]["sku"], "SKU-1");
}

#[sqlx::test]
async fn test_save_cart_clamps_to_stock(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let server = make_server(state);

    let cart = fill_cart(&server, &shop, 9).await;

    assert_eq!(cart["items"][0]["quantity"], 5);
}

#[sqlx::test]
async fn test_cart_coupon_discounts_store_items(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let server = make_server(state);

    server
        .post("/api/seller/stores/open-shop/coupons")
        .add_header("Authorization", common::bearer(&shop.seller_token))
        .json(&json!({
            "code": "save10",
            "start_date": Utc::now() - Duration::days(1),
            "end_date": Utc::now() + Duration::days(7),
            "discount": 10
        }))
        .await
        .assert_status(StatusCode::CREATED);

    fill_cart(&server, &shop, 2).await;

    let response = server
        .post("/api/cart/coupon")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "code": "SAVE10" }))
        .await;

    response.assert_status_ok();
    let cart = response.json::<Value>();
    assert_eq!(money(&cart["cart"]["total"]), Decimal::new(4230, 2));
    assert!(cart["cart"]["coupon_id"].is_i64());

    server
        .post("/api/cart/coupon")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "code": "NOPE" }))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_place_order_and_pay(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let server = make_server(state);

    fill_cart(&server, &shop, 2).await;

    let response = server
        .post("/api/orders")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "shipping_address_id": shop.address_id }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let order = response.json::<Value>();
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["order_status"], "PENDING");
    assert_eq!(order["payment_status"], "PENDING");
    assert_eq!(money(&order["total"]), Decimal::new(4700, 2));
    assert_eq!(common::stock_of(&pool, shop.product.size_id).await, 3);

    let body = json!({
        "order_id": order_id,
        "payment_intent_id": "pi_test_1",
        "status": "succeeded",
        "amount": "47.00",
        "currency": "usd"
    })
    .to_string();

    let response = server
        .post("/webhooks/payments")
        .add_header("X-Payment-Signature", hmac_hex(common::WEBHOOK_SECRET, body.as_bytes()))
        .add_header("Content-Type", "application/json")
        .bytes(body.into())
        .await;
    response.assert_status_ok();

    let response = server
        .get(&format!("/api/orders/{order_id}"))
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .await;
    response.assert_status_ok();
    let details = response.json::<Value>();
    assert_eq!(details["payment_status"], "PAID");
    assert_eq!(details["order_status"], "CONFIRMED");
    assert_eq!(details["groups"].as_array().unwrap().len(), 1);

    let orders = server
        .get("/api/orders")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .await
        .json::<Value>();
    assert_eq!(orders["pagination"]["total_items"], 1);
}

#[sqlx::test]
async fn test_place_order_with_empty_cart(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let server = make_server(state);

    server
        .post("/api/orders")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "shipping_address_id": shop.address_id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_place_order_with_foreign_address(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let stranger = common::create_user(&pool, "other@example.com", "USER").await;
    let foreign_address = common::create_address(&pool, stranger, "CA").await;
    let server = make_server(state);

    fill_cart(&server, &shop, 1).await;

    server
        .post("/api/orders")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "shipping_address_id": foreign_address }))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_webhook_rejects_bad_signature(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = make_server(state);

    let body = json!({
        "order_id": 1,
        "payment_intent_id": "pi_forged",
        "status": "succeeded",
        "amount": "1.00",
        "currency": "usd"
    })
    .to_string();

    server
        .post("/webhooks/payments")
        .add_header("X-Payment-Signature", hmac_hex("wrong-secret", body.as_bytes()))
        .bytes(body.clone().into())
        .await
        .assert_status_unauthorized();

    server
        .post("/webhooks/payments")
        .bytes(body.into())
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_seller_sees_and_ships_order_group(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let server = make_server(state);

    fill_cart(&server, &shop, 1).await;
    server
        .post("/api/orders")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "shipping_address_id": shop.address_id }))
        .await
        .assert_status(StatusCode::CREATED);

    let groups = server
        .get("/api/seller/stores/open-shop/orders")
        .add_header("Authorization", common::bearer(&shop.seller_token))
        .await
        .json::<Vec<Value>>();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["customer_email"], "buyer@example.com");
    let group_id = groups[0]["id"].as_i64().unwrap();

    let response = server
        .patch(&format!("/api/seller/stores/open-shop/orders/{group_id}/status"))
        .add_header("Authorization", common::bearer(&shop.seller_token))
        .json(&json!({ "status": "SHIPPED" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "SHIPPED");

    server
        .patch(&format!("/api/seller/stores/open-shop/orders/{group_id}/status"))
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "status": "DELIVERED" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

async fn payment_event(
    server: &TestServer,
    order_id: i64,
    status: &str,
) -> axum_test::TestResponse {
    let body = json!({
        "order_id": order_id,
        "payment_intent_id": "pi_test_2",
        "status": status,
        "amount": "25.00",
        "currency": "usd"
    })
    .to_string();

    server
        .post("/webhooks/payments")
        .add_header("X-Payment-Signature", hmac_hex(common::WEBHOOK_SECRET, body.as_bytes()))
        .add_header("Content-Type", "application/json")
        .bytes(body.into())
        .await
}

#[sqlx::test]
async fn test_late_payment_failure_keeps_order_paid(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let shop = setup(&pool, &state).await;
    let server = make_server(state);

    fill_cart(&server, &shop, 1).await;
    let order = server
        .post("/api/orders")
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .json(&json!({ "shipping_address_id": shop.address_id }))
        .await
        .json::<Value>();
    let order_id = order["id"].as_i64().unwrap();

    payment_event(&server, order_id, "refunded")
        .await
        .assert_status(StatusCode::CONFLICT);
    payment_event(&server, order_id, "succeeded").await.assert_status_ok();
    payment_event(&server, order_id, "succeeded").await.assert_status_ok();
    payment_event(&server, order_id, "failed")
        .await
        .assert_status(StatusCode::CONFLICT);

    let details = server
        .get(&format!("/api/orders/{order_id}"))
        .add_header("Authorization", common::bearer(&shop.buyer_token))
        .await
        .json::<Value>();
    assert_eq!(details["payment_status"], "PAID");
    assert_eq!(details["order_status"], "CONFIRMED");
    assert_eq!(details["payment"]["status"], "PAID");

    payment_event(&server, order_id, "refunded").await.assert_status_ok();
}
