//! Repository trait for stores.

use crate::domain::entities::{Store, StoreInput, StoreShippingDefaults, StoreStatus};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for seller stores.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStoreRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_store.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Store>, AppError>;

    async fn find_by_url(&self, url: &str) -> Result<Option<Store>, AppError>;

    /// Names of the unique fields (`name`, `url`, `email`, `phone`) that
    /// `input` shares with a store other than `input.id`.
    async fn find_conflicting_fields(&self, input: StoreInput) -> Result<Vec<String>, AppError>;

    /// Creates a store owned by `user_id` in `PENDING` status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a unique field is taken concurrently.
    async fn create(&self, user_id: i64, input: StoreInput) -> Result<Store, AppError>;

    /// Updates the store profile identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store does not exist.
    async fn update(&self, id: i64, input: StoreInput) -> Result<Store, AppError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Store>, AppError>;

    async fn list_all(&self) -> Result<Vec<Store>, AppError>;

    /// Active stores, featured first, at most `limit`.
    async fn list_active(&self, limit: i64) -> Result<Vec<Store>, AppError>;

    async fn update_status(&self, id: i64, status: StoreStatus) -> Result<Option<Store>, AppError>;

    async fn update_default_shipping(
        &self,
        id: i64,
        defaults: StoreShippingDefaults,
    ) -> Result<Store, AppError>;
}
