//! Token authentication and role guards.

use std::sync::Arc;

use crate::domain::entities::{AuthToken, CurrentUser, Role, Store};
use crate::domain::repositories::{StoreRepository, TokenRepository};
use crate::error::AppError;
use crate::utils::signing::{generate_token, hmac_hex};
use serde_json::json;

/// Service for authenticating requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were issued.
    pub fn new(repository: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    pub fn hash_token(&self, token: &str) -> String {
        hmac_hex(&self.signing_secret, token.as_bytes())
    }

    /// Resolves a raw token to the user it belongs to.
    ///
    /// On success the token's `last_used_at` is refreshed; a failure there is
    /// ignored so a slow write never rejects a valid request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AppError> {
        let token_hash = self.hash_token(token);

        let user = self
            .repository
            .find_user_by_token(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthenticated",
                    json!({"reason": "Invalid or revoked token"}),
                )
            })?;

        let _ = self.repository.update_last_used(&token_hash).await;

        Ok(CurrentUser::from(user))
    }

    /// Issues a new token for a user. The raw value is returned once and
    /// only its hash is stored.
    pub async fn issue_token(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<(String, AuthToken), AppError> {
        let raw = generate_token();
        let token = self
            .repository
            .create_token(user_id, name, &self.hash_token(&raw))
            .await?;

        Ok((raw, token))
    }
}

/// Fails with 403 unless `actor` holds `role` (admins hold every role).
pub fn require_role(actor: &CurrentUser, role: Role) -> Result<(), AppError> {
    if actor.has_role(role) {
        return Ok(());
    }

    Err(AppError::forbidden(
        "Unauthorized",
        json!({ "required_role": role, "role": actor.role }),
    ))
}

/// Fails with 403 unless `actor` owns `store` or is an admin.
pub fn require_store_owner(actor: &CurrentUser, store: &Store) -> Result<(), AppError> {
    if actor.is_admin() || store.is_owned_by(actor.id) {
        return Ok(());
    }

    Err(AppError::forbidden(
        "Unauthorized",
        json!({ "store": store.url }),
    ))
}

/// Loads a store by url and checks that `actor` is a seller who may manage it.
pub async fn find_owned_store(
    stores: &dyn StoreRepository,
    actor: &CurrentUser,
    url: &str,
) -> Result<Store, AppError> {
    require_role(actor, Role::Seller)?;

    let store = stores
        .find_by_url(url)
        .await?
        .ok_or_else(|| AppError::not_found("Store not found", json!({ "url": url })))?;

    require_store_owner(actor, &store)?;
    Ok(store)
}
