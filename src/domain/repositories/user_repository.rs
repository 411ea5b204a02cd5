//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, Role, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts and their role claims.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all accounts ordered by creation time.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Changes a user's role claim.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    async fn update_role(&self, id: i64, role: Role) -> Result<User, AppError>;
}
