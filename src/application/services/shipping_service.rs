//! Countries and per-country shipping rates.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::auth_service::find_owned_store;
use crate::application::services::store_service::validate_fees;
use crate::domain::entities::{
    Country, CountryShippingRate, CurrentUser, ShippingRate, ShippingRateInput,
};
use crate::domain::repositories::{ShippingRepository, StoreRepository};
use crate::domain::shipping::{ShippingTerms, resolve_terms};
use crate::error::AppError;

pub struct ShippingService {
    shipping: Arc<dyn ShippingRepository>,
    stores: Arc<dyn StoreRepository>,
}

impl ShippingService {
    pub fn new(shipping: Arc<dyn ShippingRepository>, stores: Arc<dyn StoreRepository>) -> Self {
        Self { shipping, stores }
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>, AppError> {
        self.shipping.list_countries().await
    }

    /// Every country paired with the store's rate for it, if any.
    ///
    /// Countries without a rate come back with `rate: None` so the dashboard
    /// can offer them for editing.
    pub async fn list_store_shipping_rates(
        &self,
        actor: &CurrentUser,
        store_url: &str,
    ) -> Result<Vec<CountryShippingRate>, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;

        let countries = self.shipping.list_countries().await?;
        let mut rates: HashMap<i64, ShippingRate> = self
            .shipping
            .list_rates(store.id)
            .await?
            .into_iter()
            .map(|rate| (rate.country_id, rate))
            .collect();

        Ok(countries
            .into_iter()
            .map(|country| CountryShippingRate {
                rate: rates.remove(&country.id),
                country,
            })
            .collect())
    }

    pub async fn upsert_shipping_rate(
        &self,
        actor: &CurrentUser,
        store_url: &str,
        input: ShippingRateInput,
    ) -> Result<ShippingRate, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;

        validate_fees(
            &[
                input.shipping_fee_per_item,
                input.shipping_fee_for_additional_item,
                input.shipping_fee_per_kg,
                input.shipping_fee_fixed,
            ],
            input.delivery_time_min,
            input.delivery_time_max,
        )?;

        if self
            .shipping
            .find_country_by_id(input.country_id)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request(
                "Unknown country",
                json!({ "country_id": input.country_id }),
            ));
        }

        let rate = self.shipping.upsert_rate(store.id, input).await?;
        info!(store_id = store.id, country_id = rate.country_id, "Shipping rate saved");
        Ok(rate)
    }

    /// The terms a store ships under to a country: its rate there, otherwise
    /// its defaults.
    pub async fn get_shipping_terms(
        &self,
        store_id: i64,
        country_code: &str,
    ) -> Result<ShippingTerms, AppError> {
        let store = self
            .stores
            .find_by_id(store_id)
            .await?
            .ok_or_else(|| AppError::not_found("Store not found", json!({ "id": store_id })))?;

        let code = country_code.trim().to_ascii_uppercase();
        let country = self
            .shipping
            .find_country_by_code(&code)
            .await?
            .ok_or_else(|| AppError::not_found("Country not found", json!({ "code": code })))?;

        let rate = self.shipping.find_rate(store.id, country.id).await?;
        Ok(resolve_terms(&store, rate.as_ref()))
    }
}
