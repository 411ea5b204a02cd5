//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod address_repository;
pub mod cart_repository;
pub mod category_repository;
pub mod coupon_repository;
pub mod order_repository;
pub mod product_repository;
pub mod review_repository;
pub mod shipping_repository;
pub mod store_repository;
pub mod token_repository;
pub mod user_repository;

pub use address_repository::AddressRepository;
pub use cart_repository::CartRepository;
pub use category_repository::CategoryRepository;
pub use coupon_repository::CouponRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use review_repository::ReviewRepository;
pub use shipping_repository::ShippingRepository;
pub use store_repository::StoreRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use address_repository::MockAddressRepository;
#[cfg(test)]
pub use cart_repository::MockCartRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use coupon_repository::MockCouponRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use shipping_repository::MockShippingRepository;
#[cfg(test)]
pub use store_repository::MockStoreRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
