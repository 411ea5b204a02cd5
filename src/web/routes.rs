//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    home_handler, login_handler, product_handler, seller_dashboard_handler, seller_orders_handler,
    store_handler,
};
use axum::{Router, routing::get};

/// Seller dashboard routes requiring the `auth_token` cookie.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET /seller` - The seller's stores
/// - `GET /seller/stores/{url}/orders` - Orders received by one store
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/seller", get(seller_dashboard_handler))
        .route("/seller/stores/{url}/orders", get(seller_orders_handler))
}

/// Storefront pages without authentication.
///
/// # Endpoints
///
/// - `GET /` - Home page
/// - `GET /products/{slug}` - Product page
/// - `GET /stores/{url}` - Store page
/// - `GET /login` - Login page
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/products/{slug}", get(product_handler))
        .route("/stores/{url}", get(store_handler))
        .route("/login", get(login_handler))
}
