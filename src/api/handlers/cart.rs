//! Handlers for the caller's shopping cart.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::cart::{CouponCodeRequest, SaveCartRequest};
use crate::domain::entities::{CartDetails, CartLineInput, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/cart` - `null` when the caller has no cart yet.
pub async fn get_cart_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Option<CartDetails>>, AppError> {
    Ok(Json(state.cart_service.get_cart(&actor).await?))
}

/// Replaces the cart contents.
///
/// # Endpoint
///
/// `PUT /api/cart`
///
/// Every line is re-read from the catalog: quantities are clamped to stock,
/// sold-out sizes are dropped and prices and shipping fees are recomputed.
/// Lines for the same size are merged.
///
/// # Request Body
///
/// ```json
/// {
///   "items": [{ "product_id": 1, "variant_id": 2, "size_id": 7, "quantity": 2 }],
///   "country": "DE"
/// }
/// ```
pub async fn save_cart_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<SaveCartRequest>,
) -> Result<Json<CartDetails>, AppError> {
    payload.validate()?;

    let lines: Vec<CartLineInput> = payload.items.iter().map(CartLineInput::from).collect();

    let cart = state
        .cart_service
        .save_cart(&actor, lines, payload.country.as_deref())
        .await?;
    Ok(Json(cart))
}

/// `POST /api/cart/coupon`
///
/// The discount applies to the items of the coupon's store only.
pub async fn apply_cart_coupon_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<CouponCodeRequest>,
) -> Result<Json<CartDetails>, AppError> {
    payload.validate()?;

    let cart = state
        .cart_service
        .apply_cart_coupon(&actor, &payload.code)
        .await?;
    Ok(Json(cart))
}

/// `DELETE /api/cart`
pub async fn clear_cart_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state.cart_service.clear_cart(&actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
