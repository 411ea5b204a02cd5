//! Seller store management.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use crate::application::services::auth_service::{
    find_owned_store, require_role, require_store_owner,
};
use crate::domain::entities::{
    CurrentUser, Role, Store, StoreInput, StoreShippingDefaults, StoreStatus,
};
use crate::domain::repositories::StoreRepository;
use crate::domain::slug::validate_url_segment;
use crate::error::AppError;

pub struct StoreService {
    repository: Arc<dyn StoreRepository>,
}

impl StoreService {
    pub fn new(repository: Arc<dyn StoreRepository>) -> Self {
        Self { repository }
    }

    /// Creates a store owned by `actor`, or updates one they own.
    ///
    /// New stores start `PENDING` until an admin activates them.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] unless `actor` is a seller (and owner, on update)
    /// - [`AppError::Conflict`] listing the fields another store already uses
    /// - [`AppError::NotFound`] when updating a missing store
    pub async fn upsert_store(
        &self,
        actor: &CurrentUser,
        mut input: StoreInput,
    ) -> Result<Store, AppError> {
        require_role(actor, Role::Seller)?;

        input.name = input.name.trim().to_string();
        input.email = input.email.trim().to_ascii_lowercase();
        input.phone = input.phone.trim().to_string();
        validate_url_segment(&input.url)?;

        if let Some(id) = input.id {
            let existing = self.find_by_id(id).await?;
            require_store_owner(actor, &existing)?;
        }

        let conflicts = self
            .repository
            .find_conflicting_fields(input.clone())
            .await?;
        if !conflicts.is_empty() {
            return Err(AppError::conflict(
                format!("Duplicate store {}", conflicts.join(", ")),
                json!({ "fields": conflicts }),
            ));
        }

        match input.id {
            Some(id) => self.repository.update(id, input).await,
            None => {
                let store = self.repository.create(actor.id, input).await?;
                info!(store_id = store.id, url = %store.url, user_id = actor.id, "Store created");
                Ok(store)
            }
        }
    }

    /// Public store lookup. Stores that are not `ACTIVE` are only visible to
    /// their owner and admins.
    pub async fn get_store_by_url(
        &self,
        actor: Option<&CurrentUser>,
        url: &str,
    ) -> Result<Store, AppError> {
        let store = self
            .repository
            .find_by_url(url)
            .await?
            .filter(|store| {
                store.is_active()
                    || actor.is_some_and(|a| a.is_admin() || store.is_owned_by(a.id))
            })
            .ok_or_else(|| AppError::not_found("Store not found", json!({ "url": url })))?;

        Ok(store)
    }

    /// Loads a store by url and checks that `actor` may manage it.
    pub async fn get_owned_store(&self, actor: &CurrentUser, url: &str) -> Result<Store, AppError> {
        find_owned_store(self.repository.as_ref(), actor, url).await
    }

    pub async fn list_seller_stores(&self, actor: &CurrentUser) -> Result<Vec<Store>, AppError> {
        require_role(actor, Role::Seller)?;
        self.repository.list_by_user(actor.id).await
    }

    pub async fn list_all_stores(&self, actor: &CurrentUser) -> Result<Vec<Store>, AppError> {
        require_role(actor, Role::Admin)?;
        self.repository.list_all().await
    }

    pub async fn list_active_stores(&self, limit: i64) -> Result<Vec<Store>, AppError> {
        self.repository.list_active(limit.clamp(1, 100)).await
    }

    pub async fn update_store_status(
        &self,
        actor: &CurrentUser,
        store_id: i64,
        status: StoreStatus,
    ) -> Result<Store, AppError> {
        require_role(actor, Role::Admin)?;

        let store = self
            .repository
            .update_status(store_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Store not found", json!({ "id": store_id })))?;

        info!(store_id, status = %status, "Store status updated");
        Ok(store)
    }

    pub async fn update_store_default_shipping(
        &self,
        actor: &CurrentUser,
        url: &str,
        defaults: StoreShippingDefaults,
    ) -> Result<Store, AppError> {
        let store = self.get_owned_store(actor, url).await?;

        validate_fees(
            &[
                defaults.fee_per_item,
                defaults.fee_for_additional_item,
                defaults.fee_per_kg,
                defaults.fee_fixed,
            ],
            defaults.delivery_time_min,
            defaults.delivery_time_max,
        )?;

        self.repository
            .update_default_shipping(store.id, defaults)
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Store, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Store not found", json!({ "id": id })))
    }
}

/// Shared by store defaults and per-country rates: fees are non-negative and
/// the delivery window is ordered.
pub(crate) fn validate_fees(
    fees: &[Decimal],
    min_days: i32,
    max_days: i32,
) -> Result<(), AppError> {
    if fees.iter().any(|fee| *fee < Decimal::ZERO) {
        return Err(AppError::bad_request("Shipping fees cannot be negative", json!({})));
    }

    if min_days < 0 || min_days > max_days {
        return Err(AppError::bad_request(
            "Delivery time must satisfy 0 <= min <= max",
            json!({ "delivery_time_min": min_days, "delivery_time_max": max_days }),
        ));
    }

    Ok(())
}
