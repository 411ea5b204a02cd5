#![allow(dead_code)]

use axum::{Router, middleware};
use marketplace::api::middleware::auth;
use marketplace::api::routes::{protected_routes, public_routes};
use marketplace::config::{Config, LogFormat};
use marketplace::domain::view_event::ProductView;
use marketplace::infrastructure::cache::NullCache;
use marketplace::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: LogFormat::Text,
        view_queue_capacity: 100,
        behind_proxy: false,
        cache_ttl_seconds: 60,
        token_signing_secret: SIGNING_SECRET.to_string(),
        payment_webhook_secret: WEBHOOK_SECRET.to_string(),
        default_country_code: "US".to_string(),
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 300,
    }
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<ProductView>) {
    let (tx, rx) = mpsc::channel(100);
    let state = AppState::new(
        Arc::new(pool),
        tx,
        Arc::new(NullCache::new()),
        &test_config(),
    );
    (state, rx)
}

/// The `/api` router the way the server mounts it, without rate limiting.
pub fn api_router(state: AppState) -> Router {
    let public = public_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::optional_layer,
    ));
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .nest("/api", Router::new().merge(public).merge(protected))
        .with_state(state)
}

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING id")
        .bind(email.split('@').next().unwrap_or("user"))
        .bind(email)
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Issues a token through the auth service and returns the raw value.
pub async fn issue_token(state: &AppState, user_id: i64) -> String {
    let (raw, _) = state
        .auth_service
        .issue_token(user_id, "test")
        .await
        .unwrap();
    raw
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Creates a category with one subcategory, returning both ids.
pub async fn create_category(pool: &PgPool, url: &str) -> (i64, i64) {
    let category_id: i64 = sqlx::query_scalar(
        "INSERT INTO categories (name, url, image) VALUES ($1, $1, 'c.png') RETURNING id",
    )
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap();

    let sub_id: i64 = sqlx::query_scalar(
        "INSERT INTO sub_categories (category_id, name, url, image)
         VALUES ($1, $2, $2, 's.png') RETURNING id",
    )
    .bind(category_id)
    .bind(format!("{url}-sub"))
    .fetch_one(pool)
    .await
    .unwrap();

    (category_id, sub_id)
}

/// Creates a store charging 5.00 for the first item and 2.00 for each
/// additional one.
pub async fn create_store(pool: &PgPool, user_id: i64, url: &str, status: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO stores (user_id, name, url, email, phone, description, logo, cover, status,
                             default_shipping_fee_per_item, default_shipping_fee_for_additional_item)
         VALUES ($1, $2, $2, $3, $4, 'A store', 'logo.png', 'cover.png', $5, 5.00, 2.00)
         RETURNING id",
    )
    .bind(user_id)
    .bind(url)
    .bind(format!("{url}@shop.test"))
    .bind(format!("+1-{url}"))
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub struct TestProduct {
    pub product_id: i64,
    pub variant_id: i64,
    pub size_id: i64,
}

/// Creates a product with one variant and one size.
pub async fn create_product(
    pool: &PgPool,
    store_id: i64,
    (category_id, sub_id): (i64, i64),
    slug: &str,
    price: &str,
    quantity: i32,
) -> TestProduct {
    let product_id: i64 = sqlx::query_scalar(
        "INSERT INTO products (store_id, category_id, sub_category_id, name, description, slug, brand)
         VALUES ($1, $2, $3, $4, 'Soft cotton', $4, 'Acme') RETURNING id",
    )
    .bind(store_id)
    .bind(category_id)
    .bind(sub_id)
    .bind(slug)
    .fetch_one(pool)
    .await
    .unwrap();

    let variant_id: i64 = sqlx::query_scalar(
        "INSERT INTO product_variants (product_id, name, slug, image, sku)
         VALUES ($1, 'Blue', $2, 'blue.png', 'SKU-1') RETURNING id",
    )
    .bind(product_id)
    .bind(format!("{slug}-blue"))
    .fetch_one(pool)
    .await
    .unwrap();

    let size_id: i64 = sqlx::query_scalar(
        "INSERT INTO sizes (variant_id, size, quantity, price)
         VALUES ($1, 'M', $2, $3::NUMERIC) RETURNING id",
    )
    .bind(variant_id)
    .bind(quantity)
    .bind(price)
    .fetch_one(pool)
    .await
    .unwrap();

    TestProduct {
        product_id,
        variant_id,
        size_id,
    }
}

pub async fn create_address(pool: &PgPool, user_id: i64, country_code: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO shipping_addresses
             (user_id, country_id, first_name, last_name, phone, address1, city, state, zip_code, is_default)
         SELECT $1, id, 'Jane', 'Doe', '555-0100', '1 Main St', 'Springfield', 'IL', '62701', TRUE
         FROM countries WHERE code = $2
         RETURNING id",
    )
    .bind(user_id)
    .bind(country_code)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn stock_of(pool: &PgPool, size_id: i64) -> i32 {
    sqlx::query_scalar("SELECT quantity FROM sizes WHERE id = $1")
        .bind(size_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
