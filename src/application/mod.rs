//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - API token authentication and role guards
//! - [`services::category_service::CategoryService`] - Categories and subcategories
//! - [`services::store_service::StoreService`] - Store registration, status and defaults
//! - [`services::shipping_service::ShippingService`] - Countries and per-country rates
//! - [`services::product_service::ProductService`] - Catalog writes, search and product pages
//! - [`services::review_service::ReviewService`] - Product reviews and rating statistics
//! - [`services::address_service::AddressService`] - Customer shipping addresses
//! - [`services::coupon_service::CouponService`] - Store discount codes
//! - [`services::cart_service::CartService`] - Cart pricing and coupons
//! - [`services::order_service::OrderService`] - Checkout, fulfilment and payments

pub mod services;
