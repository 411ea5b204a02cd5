//! Storage adapters behind the domain repository traits.
//!
//! - [`persistence`] - PostgreSQL repositories using runtime `sqlx` queries
//! - [`cache`] - Product page cache (Redis, or a no-op when disabled)

pub mod cache;
pub mod persistence;
