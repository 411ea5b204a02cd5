//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Rows map
//! onto entities through `sqlx::FromRow`; multi-row writes run in a single
//! transaction.
//!
//! # Repositories
//!
//! - [`PgUserRepository`], [`PgTokenRepository`] - Accounts and bearer tokens
//! - [`PgCategoryRepository`] - Categories and subcategories
//! - [`PgStoreRepository`] - Stores and their shipping defaults
//! - [`PgShippingRepository`] - Countries, shipping rates, free-shipping lists
//! - [`PgAddressRepository`] - Customer shipping addresses
//! - [`PgProductRepository`] - Products, variants and catalog search
//! - [`PgCartRepository`] - Shopping carts
//! - [`PgOrderRepository`] - Orders, order groups and payments
//! - [`PgCouponRepository`] - Store coupons
//! - [`PgReviewRepository`] - Reviews and rating aggregates

pub mod pg_address_repository;
pub mod pg_cart_repository;
pub mod pg_category_repository;
pub mod pg_coupon_repository;
pub mod pg_order_repository;
pub mod pg_product_repository;
pub mod pg_review_repository;
pub mod pg_shipping_repository;
pub mod pg_store_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_address_repository::PgAddressRepository;
pub use pg_cart_repository::PgCartRepository;
pub use pg_category_repository::PgCategoryRepository;
pub use pg_coupon_repository::PgCouponRepository;
pub use pg_order_repository::PgOrderRepository;
pub use pg_product_repository::PgProductRepository;
pub use pg_review_repository::PgReviewRepository;
pub use pg_shipping_repository::PgShippingRepository;
pub use pg_store_repository::PgStoreRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
