//! Handlers for store coupons.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use super::created_or_ok;
use crate::api::dto::coupon::CouponRequest;
use crate::domain::entities::{Coupon, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/seller/stores/{url}/coupons`
pub async fn list_coupons_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
) -> Result<Json<Vec<Coupon>>, AppError> {
    Ok(Json(state.coupon_service.list_store_coupons(&actor, &url).await?))
}

/// Creates or updates a coupon of the store.
///
/// # Endpoint
///
/// `POST /api/seller/stores/{url}/coupons`
///
/// # Errors
///
/// Returns 400 for a malformed code, a discount outside 1-99 or a start date
/// not before the end date.
/// Returns 409 if the code is taken.
pub async fn upsert_coupon_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
    Json(payload): Json<CouponRequest>,
) -> Result<(StatusCode, Json<Coupon>), AppError> {
    payload.validate()?;

    let status = created_or_ok(payload.id);
    let coupon = state
        .coupon_service
        .upsert_coupon(&actor, &url, payload.into())
        .await?;

    Ok((status, Json(coupon)))
}

/// `DELETE /api/seller/stores/{url}/coupons/{id}`
pub async fn delete_coupon_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path((url, id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    state.coupon_service.delete_coupon(&actor, &url, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
