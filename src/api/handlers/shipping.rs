//! Handlers for countries and per-country shipping rates.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::shipping::ShippingRateRequest;
use crate::domain::entities::{Country, CountryShippingRate, CurrentUser, ShippingRate};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/countries`
pub async fn list_countries_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Country>>, AppError> {
    Ok(Json(state.shipping_service.list_countries().await?))
}

/// Every country with the store's rate for it, or `rate: null` when the
/// store defaults apply.
///
/// # Endpoint
///
/// `GET /api/seller/stores/{url}/shipping-rates`
pub async fn list_shipping_rates_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
) -> Result<Json<Vec<CountryShippingRate>>, AppError> {
    let rates = state
        .shipping_service
        .list_store_shipping_rates(&actor, &url)
        .await?;
    Ok(Json(rates))
}

/// Creates or replaces the store's rate for one country.
///
/// # Endpoint
///
/// `PUT /api/seller/stores/{url}/shipping-rates`
pub async fn upsert_shipping_rate_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
    Json(payload): Json<ShippingRateRequest>,
) -> Result<Json<ShippingRate>, AppError> {
    payload.validate()?;

    let rate = state
        .shipping_service
        .upsert_shipping_rate(&actor, &url, payload.into())
        .await?;
    Ok(Json(rate))
}
