mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use sqlx::PgPool;

#[sqlx::test]
async fn test_search_products_paginated(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    for slug in ["tee-a", "tee-b", "tee-c"] {
        common::create_product(&pool, store, category, slug, "15.00", 3).await;
    }

    let (state, _rx) = common::create_test_state(pool);
    let server = TestServer::new(common::api_router(state)).unwrap();

    let response = server
        .get("/api/products")
        .add_query_param("page", 1)
        .add_query_param("page_size", 2)
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["pagination"]["total_items"], 3);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test]
async fn test_search_rejects_bad_page_size(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = TestServer::new(common::api_router(state)).unwrap();

    let response = server
        .get("/api/products")
        .add_query_param("page_size", 500)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_product_page_counts_view(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    let product = common::create_product(&pool, store, category, "tee", "20.00", 3).await;

    let (state, mut rx) = common::create_test_state(pool);
    let server = TestServer::new(common::api_router(state)).unwrap();

    let response = server
        .get("/api/products/tee")
        .add_query_param("country", "US")
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["product"]["slug"], "tee");
    assert_eq!(json["variant"]["variant"]["slug"], "tee-blue");
    assert_eq!(json["store"]["url"], "open-shop");
    assert_eq!(json["country"]["code"], "US");
    assert_eq!(json["shipping"]["shipping_fee_method"], "ITEM");

    let view = rx.try_recv().unwrap();
    assert_eq!(view.product_id, product.product_id);
}

#[sqlx::test]
async fn test_product_of_pending_store_is_not_found(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "new-shop", "PENDING").await;
    common::create_product(&pool, store, category, "tee", "20.00", 3).await;

    let (state, _rx) = common::create_test_state(pool);
    let server = TestServer::new(common::api_router(state)).unwrap();

    server.get("/api/products/tee").await.assert_status_not_found();
    server.get("/api/products/missing").await.assert_status_not_found();
}

#[sqlx::test]
async fn test_pending_store_visible_to_owner_only(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    common::create_store(&pool, seller, "new-shop", "PENDING").await;

    let (state, _rx) = common::create_test_state(pool);
    let token = common::issue_token(&state, seller).await;
    let server = TestServer::new(common::api_router(state)).unwrap();

    server.get("/api/stores/new-shop").await.assert_status_not_found();

    let response = server
        .get("/api/stores/new-shop")
        .add_header("Authorization", common::bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["status"], "PENDING");
}

#[sqlx::test]
async fn test_list_countries(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = TestServer::new(common::api_router(state)).unwrap();

    let response = server.get("/api/countries").await;

    response.assert_status_ok();
    let countries = response.json::<Vec<serde_json::Value>>();
    assert!(countries.iter().any(|c| c["code"] == "US"));
}
