//! Handlers for checkout, order history and seller fulfilment.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::cart::CouponCodeRequest;
use crate::api::dto::order::{
    GroupStatusRequest, ItemStatusRequest, OrderListQuery, PlaceOrderRequest,
};
use crate::api::dto::pagination::PagedResponse;
use crate::domain::entities::{
    CurrentUser, Order, OrderDetails, OrderFilter, OrderGroup, OrderItem, StoreOrderGroup,
};
use crate::error::AppError;
use crate::state::AppState;

/// Places an order from the caller's cart.
///
/// # Endpoint
///
/// `POST /api/orders`
///
/// The cart is split into one order group per store, stock is reserved and
/// the cart is emptied, all in one transaction. The order starts with
/// `PENDING` order and payment status.
///
/// # Errors
///
/// Returns 400 if the cart is empty or a line no longer has enough stock.
/// Returns 404 if the address is not one of the caller's.
pub async fn place_order_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state
        .order_service
        .place_order(&actor, payload.shipping_address_id)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders?order_status=&payment_status=`
pub async fn list_orders_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<PagedResponse<Order>>, AppError> {
    let (offset, limit) = query
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let filter = OrderFilter {
        order_status: query.order_status,
        payment_status: query.payment_status,
        offset,
        limit,
    };

    let (items, total) = state.order_service.list_user_orders(&actor, filter).await?;

    Ok(Json(PagedResponse::new(&query.pagination, items, total)))
}

/// `GET /api/orders/{id}` - the caller's order, or any order for admins.
pub async fn get_order_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<OrderDetails>, AppError> {
    Ok(Json(state.order_service.get_order(&actor, id).await?))
}

/// Applies a store coupon to one group of an unpaid order.
///
/// # Endpoint
///
/// `POST /api/orders/{id}/groups/{group_id}/coupon`
///
/// # Errors
///
/// Returns 400 if the order is paid, the coupon is inactive or belongs to
/// another store.
/// Returns 409 if the group already has a coupon.
pub async fn apply_group_coupon_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path((order_id, group_id)): Path<(i64, i64)>,
    Json(payload): Json<CouponCodeRequest>,
) -> Result<Json<OrderDetails>, AppError> {
    payload.validate()?;

    let details = state
        .order_service
        .apply_group_coupon(&actor, order_id, group_id, &payload.code)
        .await?;
    Ok(Json(details))
}

/// `GET /api/seller/stores/{url}/orders` - order groups sold by the store.
pub async fn list_store_orders_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
) -> Result<Json<Vec<StoreOrderGroup>>, AppError> {
    Ok(Json(state.order_service.list_store_orders(&actor, &url).await?))
}

/// `PATCH /api/seller/stores/{url}/orders/{group_id}/status`
pub async fn update_group_status_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path((url, group_id)): Path<(String, i64)>,
    Json(payload): Json<GroupStatusRequest>,
) -> Result<Json<OrderGroup>, AppError> {
    let group = state
        .order_service
        .update_group_status(&actor, &url, group_id, payload.status)
        .await?;
    Ok(Json(group))
}

/// `PATCH /api/seller/stores/{url}/order-items/{item_id}/status`
pub async fn update_item_status_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path((url, item_id)): Path<(String, i64)>,
    Json(payload): Json<ItemStatusRequest>,
) -> Result<Json<OrderItem>, AppError> {
    let item = state
        .order_service
        .update_item_status(&actor, &url, item_id, payload.status)
        .await?;
    Ok(Json(item))
}
