//! Business logic services for the application layer.

pub mod address_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_lookup;
pub mod category_service;
pub mod coupon_service;
pub mod order_service;
pub mod product_service;
pub mod review_service;
pub mod shipping_service;
pub mod store_service;

#[cfg(test)]
mod fixtures;

pub use address_service::AddressService;
pub use auth_service::AuthService;
pub use cart_service::CartService;
pub use catalog_lookup::CatalogLookup;
pub use category_service::CategoryService;
pub use coupon_service::CouponService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use review_service::ReviewService;
pub use shipping_service::ShippingService;
pub use store_service::StoreService;
