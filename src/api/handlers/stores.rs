//! Handlers for store registration, moderation and shipping defaults.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::created_or_ok;
use crate::api::dto::store::{ShippingDefaultsRequest, StoreRequest, StoreStatusRequest};
use crate::domain::entities::{CurrentUser, Store};
use crate::error::AppError;
use crate::state::AppState;

const ACTIVE_STORES_LIMIT: i64 = 50;

/// `GET /api/stores` - featured-first list of active stores.
pub async fn list_active_stores_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = state
        .store_service
        .list_active_stores(ACTIVE_STORES_LIMIT)
        .await?;
    Ok(Json(stores))
}

/// Public store profile.
///
/// # Endpoint
///
/// `GET /api/stores/{url}`
///
/// Stores that are not `ACTIVE` are only visible to their owner and to
/// admins; everyone else gets 404.
pub async fn get_store_handler(
    State(state): State<AppState>,
    actor: Option<Extension<CurrentUser>>,
    Path(url): Path<String>,
) -> Result<Json<Store>, AppError> {
    let actor = actor.map(|Extension(user)| user);
    let store = state
        .store_service
        .get_store_by_url(actor.as_ref(), &url)
        .await?;
    Ok(Json(store))
}

/// Registers a store or updates one the caller owns.
///
/// # Endpoint
///
/// `POST /api/seller/stores`
///
/// New stores start `PENDING` until an admin activates them.
///
/// # Errors
///
/// Returns 403 unless the caller is a seller (and owner, for updates).
/// Returns 409 listing the fields another store already uses.
pub async fn upsert_store_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<StoreRequest>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    payload.validate()?;

    let status = created_or_ok(payload.id);
    let store = state
        .store_service
        .upsert_store(&actor, payload.into())
        .await?;

    Ok((status, Json(store)))
}

/// `GET /api/seller/stores`
pub async fn list_seller_stores_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(state.store_service.list_seller_stores(&actor).await?))
}

/// `GET /api/seller/stores/{url}`
pub async fn get_owned_store_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
) -> Result<Json<Store>, AppError> {
    Ok(Json(state.store_service.get_owned_store(&actor, &url).await?))
}

/// `PUT /api/seller/stores/{url}/shipping`
pub async fn update_shipping_defaults_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
    Json(payload): Json<ShippingDefaultsRequest>,
) -> Result<Json<Store>, AppError> {
    payload.validate()?;

    let store = state
        .store_service
        .update_store_default_shipping(&actor, &url, payload.into())
        .await?;
    Ok(Json(store))
}

/// `GET /api/admin/stores`
pub async fn list_all_stores_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(state.store_service.list_all_stores(&actor).await?))
}

/// `PATCH /api/admin/stores/{id}/status`
pub async fn update_store_status_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<StoreStatusRequest>,
) -> Result<Json<Store>, AppError> {
    let store = state
        .store_service
        .update_store_status(&actor, id, payload.status)
        .await?;
    Ok(Json(store))
}
