//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Request bodies convert into the domain `*Input`
//! types with `From`.

pub mod cart;
pub mod category;
pub mod coupon;
pub mod health;
pub mod order;
pub mod pagination;
pub mod product;
pub mod review;
pub mod shipping;
pub mod store;
