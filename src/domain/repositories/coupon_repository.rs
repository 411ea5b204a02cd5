//! Repository trait for store coupons.

use crate::domain::entities::{Coupon, CouponInput};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for coupons.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCouponRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Coupon>, AppError>;

    /// Looks up a coupon by its (upper-case) code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, AppError>;

    async fn list_by_store(&self, store_id: i64) -> Result<Vec<Coupon>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already used.
    async fn create(&self, store_id: i64, input: CouponInput) -> Result<Coupon, AppError>;

    async fn update(&self, id: i64, input: CouponInput) -> Result<Option<Coupon>, AppError>;

    /// Deletes a coupon of `store_id`. Carts holding it drop the coupon and
    /// its discount in the same transaction.
    ///
    /// # Returns
    ///
    /// `Ok(false)` if the coupon does not exist or belongs to another store.
    async fn delete(&self, store_id: i64, id: i64) -> Result<bool, AppError>;
}
