//! Repository trait for shopping carts.

use crate::domain::entities::{Cart, CartDetails, NewCartItem};
use crate::domain::pricing::Totals;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for carts. Each user has at most one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCartRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<CartDetails>, AppError>;

    /// Creates or replaces the user's cart contents in one transaction.
    async fn save(
        &self,
        user_id: i64,
        items: Vec<NewCartItem>,
        coupon_id: Option<i64>,
        totals: Totals,
    ) -> Result<CartDetails, AppError>;

    /// Attaches a coupon and stores the discounted totals.
    async fn apply_coupon(
        &self,
        cart_id: i64,
        coupon_id: i64,
        totals: Totals,
    ) -> Result<Cart, AppError>;

    /// Deletes the user's cart and its items.
    async fn clear(&self, user_id: i64) -> Result<(), AppError>;
}
