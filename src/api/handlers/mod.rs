//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod addresses;
pub mod cart;
pub mod categories;
pub mod coupons;
pub mod health;
pub mod me;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reviews;
pub mod shipping;
pub mod stores;

use axum::http::StatusCode;

pub use addresses::{delete_address_handler, list_addresses_handler, upsert_address_handler};
pub use cart::{
    apply_cart_coupon_handler, clear_cart_handler, get_cart_handler, save_cart_handler,
};
pub use categories::{
    delete_category_handler, delete_subcategory_handler, get_category_handler,
    get_subcategory_handler, list_categories_handler, list_subcategories_handler,
    upsert_category_handler, upsert_subcategory_handler,
};
pub use coupons::{delete_coupon_handler, list_coupons_handler, upsert_coupon_handler};
pub use health::health_handler;
pub use me::me_handler;
pub use orders::{
    apply_group_coupon_handler, get_order_handler, list_orders_handler,
    list_store_orders_handler, place_order_handler, update_group_status_handler,
    update_item_status_handler,
};
pub use payments::payment_webhook_handler;
pub use products::{
    delete_product_handler, product_page_handler, search_products_handler,
    upsert_product_handler,
};
pub use reviews::{list_reviews_handler, my_review_handler, upsert_review_handler};
pub use shipping::{
    list_countries_handler, list_shipping_rates_handler, upsert_shipping_rate_handler,
};
pub use stores::{
    get_owned_store_handler, get_store_handler, list_active_stores_handler,
    list_all_stores_handler, list_seller_stores_handler, update_shipping_defaults_handler,
    update_store_status_handler, upsert_store_handler,
};

/// `201 Created` for a payload without an id, `200 OK` for an update.
pub(crate) fn created_or_ok(id: Option<i64>) -> StatusCode {
    match id {
        None => StatusCode::CREATED,
        Some(_) => StatusCode::OK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_or_ok() {
        assert_eq!(created_or_ok(None), StatusCode::CREATED);
        assert_eq!(created_or_ok(Some(4)), StatusCode::OK);
    }
}
