//! Store coupon codes.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::auth_service::find_owned_store;
use crate::domain::entities::{Coupon, CouponInput, CurrentUser};
use crate::domain::repositories::{CouponRepository, StoreRepository};
use crate::error::AppError;

pub struct CouponService {
    coupons: Arc<dyn CouponRepository>,
    stores: Arc<dyn StoreRepository>,
}

impl CouponService {
    pub fn new(coupons: Arc<dyn CouponRepository>, stores: Arc<dyn StoreRepository>) -> Self {
        Self { coupons, stores }
    }

    /// Creates or updates a coupon of the store at `store_url`.
    ///
    /// Codes are normalized to upper case and are unique across all stores.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed code, a discount outside
    ///   `1..=99` or a start date not before the end date
    /// - [`AppError::Conflict`] if another coupon already uses the code
    /// - [`AppError::NotFound`] when updating a coupon of another store
    pub async fn upsert_coupon(
        &self,
        actor: &CurrentUser,
        store_url: &str,
        mut input: CouponInput,
    ) -> Result<Coupon, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;

        input.code = input.code.trim().to_ascii_uppercase();
        validate_coupon(&input)?;

        if let Some(existing) = self.coupons.find_by_code(&input.code).await?
            && Some(existing.id) != input.id
        {
            return Err(AppError::conflict(
                "Coupon code already exists",
                json!({ "code": input.code }),
            ));
        }

        match input.id {
            Some(id) => {
                self.coupons
                    .find_by_id(id)
                    .await?
                    .filter(|coupon| coupon.store_id == store.id)
                    .ok_or_else(|| AppError::not_found("Coupon not found", json!({ "id": id })))?;

                self.coupons
                    .update(id, input)
                    .await?
                    .ok_or_else(|| AppError::not_found("Coupon not found", json!({ "id": id })))
            }
            None => {
                let coupon = self.coupons.create(store.id, input).await?;
                info!(store_id = store.id, code = %coupon.code, "Coupon created");
                Ok(coupon)
            }
        }
    }

    pub async fn list_store_coupons(
        &self,
        actor: &CurrentUser,
        store_url: &str,
    ) -> Result<Vec<Coupon>, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;
        self.coupons.list_by_store(store.id).await
    }

    pub async fn delete_coupon(
        &self,
        actor: &CurrentUser,
        store_url: &str,
        coupon_id: i64,
    ) -> Result<(), AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;

        if !self.coupons.delete(store.id, coupon_id).await? {
            return Err(AppError::not_found(
                "Coupon not found",
                json!({ "id": coupon_id }),
            ));
        }

        Ok(())
    }
}

fn validate_coupon(input: &CouponInput) -> Result<(), AppError> {
    let len = input.code.len();
    if !(2..=50).contains(&len)
        || !input
            .code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(AppError::bad_request(
            "Coupon code must be 2-50 letters or digits",
            json!({ "code": input.code }),
        ));
    }

    if !(1..=99).contains(&input.discount) {
        return Err(AppError::bad_request(
            "Discount must be between 1 and 99 percent",
            json!({ "discount": input.discount }),
        ));
    }

    if input.start_date >= input.end_date {
        return Err(AppError::bad_request(
            "Start date must be before end date",
            json!({ "start_date": input.start_date, "end_date": input.end_date }),
        ));
    }

    Ok(())
}
