//! Repository trait for session/API token authentication.

use crate::domain::entities::{AuthToken, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for bearer token management.
///
/// Only the HMAC-SHA256 of a raw token is ever stored or looked up.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_token.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Resolves a token hash to its owner.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user))` if the token exists and is not revoked
    /// - `Ok(None)` if the token is unknown or revoked
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_user_by_token(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    /// Updates the `last_used_at` timestamp for a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Stores a new token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a token with the same hash already exists.
    /// Returns [`AppError::Validation`] if the user does not exist.
    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<AuthToken, AppError>;

    /// Lists tokens, newest first, optionally for a single user.
    async fn list_tokens(&self, user_id: Option<i64>) -> Result<Vec<AuthToken>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<AuthToken>, AppError>;

    /// Revokes a token, preventing further authentication.
    ///
    /// # Returns
    ///
    /// `Ok(false)` if the token does not exist or was already revoked.
    async fn revoke_token(&self, id: i64) -> Result<bool, AppError>;
}
