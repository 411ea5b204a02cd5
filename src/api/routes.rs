//! API route configuration.
//!
//! Catalog browsing is public; everything tied to an account requires Bearer
//! token authentication via [`crate::api::middleware::auth`]. Role checks
//! (`SELLER`, `ADMIN`) happen in the services.

use crate::api::handlers::{
    apply_cart_coupon_handler, apply_group_coupon_handler, clear_cart_handler,
    delete_address_handler, delete_category_handler, delete_coupon_handler,
    delete_product_handler, delete_subcategory_handler, get_cart_handler, get_category_handler,
    get_order_handler, get_owned_store_handler, get_store_handler, get_subcategory_handler,
    list_active_stores_handler,
    list_addresses_handler, list_all_stores_handler, list_categories_handler,
    list_countries_handler, list_coupons_handler, list_orders_handler, list_reviews_handler,
    list_seller_stores_handler, list_shipping_rates_handler, list_store_orders_handler,
    list_subcategories_handler, me_handler, my_review_handler, place_order_handler,
    product_page_handler, save_cart_handler, search_products_handler,
    update_group_status_handler, update_item_status_handler, update_shipping_defaults_handler,
    update_store_status_handler, upsert_address_handler, upsert_category_handler,
    upsert_coupon_handler, upsert_product_handler, upsert_review_handler,
    upsert_shipping_rate_handler, upsert_store_handler, upsert_subcategory_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

/// Storefront routes open to anonymous visitors.
///
/// # Endpoints
///
/// - `GET /categories`             - Categories with their subcategories
/// - `GET /categories/{url}`       - One category
/// - `GET /subcategories`          - Subcategories, optionally by `category_id`
/// - `GET /subcategories/{url}`    - One subcategory
/// - `GET /stores`                 - Active stores
/// - `GET /stores/{url}`           - Store profile (owners and admins see any status)
/// - `GET /countries`              - Shipping destinations
/// - `GET /products`               - Catalog search (paginated)
/// - `GET /products/{slug}`        - Product page with variant, shipping and reviews
/// - `GET /reviews/{product_id}`   - Reviews of a product (paginated)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories_handler))
        .route("/categories/{url}", get(get_category_handler))
        .route("/subcategories", get(list_subcategories_handler))
        .route("/subcategories/{url}", get(get_subcategory_handler))
        .route("/stores", get(list_active_stores_handler))
        .route("/stores/{url}", get(get_store_handler))
        .route("/countries", get(list_countries_handler))
        .route("/products", get(search_products_handler))
        .route("/products/{slug}", get(product_page_handler))
        .route("/reviews/{product_id}", get(list_reviews_handler))
}

/// Routes requiring an authenticated caller.
///
/// # Endpoints
///
/// Customer:
/// - `GET    /me`
/// - `GET    /addresses`, `POST /addresses`, `DELETE /addresses/{id}`
/// - `GET    /cart`, `PUT /cart`, `DELETE /cart`, `POST /cart/coupon`
/// - `GET    /orders`, `POST /orders`, `GET /orders/{id}`
/// - `POST   /orders/{id}/groups/{group_id}/coupon`
/// - `GET    /reviews/{product_id}/mine`, `PUT /reviews/{product_id}/mine`
///
/// Seller:
/// - `GET    /seller/stores`, `POST /seller/stores`, `GET /seller/stores/{url}`
/// - `PUT    /seller/stores/{url}/shipping`
/// - `GET    /seller/stores/{url}/shipping-rates`, `PUT` same path
/// - `POST   /seller/stores/{url}/products`, `DELETE /seller/products/{id}`
/// - `GET    /seller/stores/{url}/coupons`, `POST` same path, `DELETE .../coupons/{id}`
/// - `GET    /seller/stores/{url}/orders`
/// - `PATCH  /seller/stores/{url}/orders/{group_id}/status`
/// - `PATCH  /seller/stores/{url}/order-items/{item_id}/status`
///
/// Admin:
/// - `POST   /admin/categories`, `DELETE /admin/categories/{id}`
/// - `POST   /admin/subcategories`, `DELETE /admin/subcategories/{id}`
/// - `GET    /admin/stores`, `PATCH /admin/stores/{id}/status`
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .merge(customer_routes())
        .nest("/seller", seller_routes())
        .nest("/admin", admin_routes())
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route(
            "/addresses",
            get(list_addresses_handler).post(upsert_address_handler),
        )
        .route("/addresses/{id}", delete(delete_address_handler))
        .route(
            "/cart",
            get(get_cart_handler)
                .put(save_cart_handler)
                .delete(clear_cart_handler),
        )
        .route("/cart/coupon", post(apply_cart_coupon_handler))
        .route(
            "/orders",
            get(list_orders_handler).post(place_order_handler),
        )
        .route("/orders/{id}", get(get_order_handler))
        .route(
            "/orders/{id}/groups/{group_id}/coupon",
            post(apply_group_coupon_handler),
        )
        .route(
            "/reviews/{product_id}/mine",
            get(my_review_handler).put(upsert_review_handler),
        )
}

fn seller_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stores",
            get(list_seller_stores_handler).post(upsert_store_handler),
        )
        .route("/stores/{url}", get(get_owned_store_handler))
        .route("/stores/{url}/shipping", put(update_shipping_defaults_handler))
        .route(
            "/stores/{url}/shipping-rates",
            get(list_shipping_rates_handler).put(upsert_shipping_rate_handler),
        )
        .route("/stores/{url}/products", post(upsert_product_handler))
        .route("/products/{id}", delete(delete_product_handler))
        .route(
            "/stores/{url}/coupons",
            get(list_coupons_handler).post(upsert_coupon_handler),
        )
        .route("/stores/{url}/coupons/{id}", delete(delete_coupon_handler))
        .route("/stores/{url}/orders", get(list_store_orders_handler))
        .route(
            "/stores/{url}/orders/{group_id}/status",
            patch(update_group_status_handler),
        )
        .route(
            "/stores/{url}/order-items/{item_id}/status",
            patch(update_item_status_handler),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(upsert_category_handler))
        .route("/categories/{id}", delete(delete_category_handler))
        .route("/subcategories", post(upsert_subcategory_handler))
        .route("/subcategories/{id}", delete(delete_subcategory_handler))
        .route("/stores", get(list_all_stores_handler))
        .route("/stores/{id}/status", patch(update_store_status_handler))
}
