//! Public store page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use super::listing_filters;
use crate::domain::entities::{ProductCard, ProductSort, Store};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "store.html")]
pub struct StoreTemplate {
    pub store: Store,
    pub products: Vec<ProductCard>,
    pub total: i64,
}

/// Renders an active store with its most popular products.
///
/// # Endpoint
///
/// `GET /stores/{url}`
pub async fn store_handler(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store_service.get_store_by_url(None, &url).await?;
    let (products, total) = state
        .product_service
        .search_products(listing_filters(Some(store.url.clone()), ProductSort::MostPopular))
        .await?;

    Ok(StoreTemplate {
        store,
        products,
        total,
    })
}
