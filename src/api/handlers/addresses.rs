//! Handlers for the caller's shipping addresses.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::created_or_ok;
use crate::api::dto::shipping::AddressRequest;
use crate::domain::entities::{CurrentUser, ShippingAddress};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/addresses`
pub async fn list_addresses_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Vec<ShippingAddress>>, AppError> {
    Ok(Json(state.address_service.list_addresses(&actor).await?))
}

/// Creates or updates an address.
///
/// # Endpoint
///
/// `POST /api/addresses`
///
/// `is_default: true` clears the flag on the caller's other addresses.
pub async fn upsert_address_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<AddressRequest>,
) -> Result<(StatusCode, Json<ShippingAddress>), AppError> {
    payload.validate()?;

    let status = created_or_ok(payload.id);
    let address = state
        .address_service
        .upsert_address(&actor, payload.into())
        .await?;

    Ok((status, Json(address)))
}

/// `DELETE /api/addresses/{id}`
pub async fn delete_address_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.address_service.delete_address(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
