//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching serialized product pages by product slug.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures degrade to database lookups).
/// Payloads are opaque JSON strings; the product service owns their shape.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached payload for a product slug.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(json))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_product(&self, slug: &str) -> CacheResult<Option<String>>;

    /// Stores a product payload with an optional TTL in seconds
    /// (implementation default when `None`).
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations log errors and
    /// return `Ok(())` to avoid disrupting the request flow.
    async fn set_product(
        &self,
        slug: &str,
        payload: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached product. Used when a product or its variants change.
    async fn invalidate_product(&self, slug: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
