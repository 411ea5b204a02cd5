mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware,
};
use marketplace::state::AppState;
use marketplace::web::{middleware::web_auth, routes as web_routes};
use sqlx::PgPool;
use tower::ServiceExt;

fn pages(state: AppState) -> Router {
    let protected = web_routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), web_auth::layer));

    Router::new()
        .merge(web_routes::public_routes())
        .merge(protected)
        .with_state(state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[sqlx::test]
async fn test_login_page_renders(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);

    let response = pages(state).oneshot(get("/login", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("auth_token"));
}

#[sqlx::test]
async fn test_home_page_on_empty_catalog(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);

    let response = pages(state).oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test]
async fn test_seller_pages_redirect_without_cookie(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let app = pages(state);

    for cookie in [None, Some("auth_token=not-a-token")] {
        let response = app.clone().oneshot(get("/seller", cookie)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }
}

#[sqlx::test]
async fn test_seller_dashboard_lists_own_stores(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    common::create_store(&pool, seller, "corner-shop", "PENDING").await;
    let token = common::issue_token(&state, seller).await;
    let cookie = format!("theme=dark; auth_token={token}");

    let response = pages(state).oneshot(get("/seller", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("corner-shop"));
    assert!(html.contains("/seller/stores/corner-shop/orders"));
}

#[sqlx::test]
async fn test_seller_orders_of_foreign_store_is_forbidden(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let owner = common::create_user(&pool, "owner@example.com", "SELLER").await;
    let other = common::create_user(&pool, "other@example.com", "SELLER").await;
    common::create_store(&pool, owner, "owned-shop", "ACTIVE").await;
    let token = common::issue_token(&state, other).await;
    let cookie = format!("auth_token={token}");

    let response = pages(state)
        .oneshot(get("/seller/stores/owned-shop/orders", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn test_store_page_shows_products(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    common::create_product(&pool, store, category, "linen-tee", "20.00", 5).await;
    let app = pages(state);

    let response = app.clone().oneshot(get("/stores/open-shop", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("/products/linen-tee"));

    let response = app.oneshot(get("/stores/missing-shop", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
