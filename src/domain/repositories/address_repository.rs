//! Repository trait for customer shipping addresses.

use crate::domain::entities::{AddressInput, ShippingAddress};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for shipping addresses.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAddressRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Lists a user's addresses, default first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ShippingAddress>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ShippingAddress>, AppError>;

    async fn find_default(&self, user_id: i64) -> Result<Option<ShippingAddress>, AppError>;

    /// Creates or updates an address.
    ///
    /// When `input.is_default` is set, every other address of the user loses
    /// its default flag in the same transaction.
    async fn upsert(&self, user_id: i64, input: AddressInput)
    -> Result<ShippingAddress, AppError>;

    /// Whether any order ships to the address.
    async fn is_used_by_orders(&self, id: i64) -> Result<bool, AppError>;

    /// # Returns
    ///
    /// `Ok(false)` if no such address exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an order ships to the address.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
