//! Seller dashboard pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::domain::entities::{CurrentUser, Store, StoreOrderGroup};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "seller/dashboard.html")]
pub struct SellerDashboardTemplate {
    pub user: CurrentUser,
    pub stores: Vec<Store>,
}

#[derive(Template, WebTemplate)]
#[template(path = "seller/orders.html")]
pub struct SellerOrdersTemplate {
    pub store: Store,
    pub groups: Vec<StoreOrderGroup>,
}

/// Lists the seller's stores.
///
/// # Endpoint
///
/// `GET /seller`
///
/// # Errors
///
/// Returns 403 for accounts without the `SELLER` role.
pub async fn seller_dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let stores = state.store_service.list_seller_stores(&user).await?;
    Ok(SellerDashboardTemplate { user, stores })
}

/// Order groups sold by one of the seller's stores, newest first.
///
/// # Endpoint
///
/// `GET /seller/stores/{url}/orders`
pub async fn seller_orders_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(url): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store_service.get_owned_store(&user, &url).await?;
    let groups = state.order_service.list_store_orders(&user, &url).await?;

    Ok(SellerOrdersTemplate { store, groups })
}
