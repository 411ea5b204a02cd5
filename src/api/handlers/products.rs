//! Handlers for catalog search, product pages and product management.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::PagedResponse;
use crate::api::dto::product::{ProductPageQuery, ProductRequest, ProductSearchQuery};
use crate::application::services::product_service::{ProductPage, SavedProduct};
use crate::domain::entities::{CurrentUser, ProductCard, ProductSearchFilters};
use crate::error::AppError;
use crate::state::AppState;

/// Searches the catalog of active stores.
///
/// # Endpoint
///
/// `GET /api/products`
///
/// # Query Parameters
///
/// - `search` - matches name, brand, description and keywords
/// - `category`, `subcategory`, `store` - url filters
/// - `min_price`, `max_price` - bounds on the cheapest discounted size
/// - `sort` - `most-popular`, `new-arrivals` (default), `top-rated`,
///   `price-low-to-high`, `price-high-to-low`
/// - `page`, `page_size`
pub async fn search_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Json<PagedResponse<ProductCard>>, AppError> {
    let (offset, limit) = query
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let filters = ProductSearchFilters {
        search: query.search,
        category_url: query.category,
        sub_category_url: query.subcategory,
        store_url: query.store,
        min_price: query.min_price,
        max_price: query.max_price,
        sort: query.sort,
        offset,
        limit,
    };

    let (items, total) = state.product_service.search_products(filters).await?;

    Ok(Json(PagedResponse::new(&query.pagination, items, total)))
}

/// Everything the product page shows.
///
/// # Endpoint
///
/// `GET /api/products/{slug}?variant=&country=`
///
/// Without `variant` the first variant is selected; without `country` the
/// shipping quote uses the default country. Every successful call counts as
/// one product view.
///
/// # Errors
///
/// Returns 404 for an unknown product or variant, or a product whose store
/// is not active.
pub async fn product_page_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ProductPageQuery>,
) -> Result<Json<ProductPage>, AppError> {
    let page = state
        .product_service
        .get_product_page(&slug, query.variant.as_deref(), query.country.as_deref())
        .await?;
    Ok(Json(page))
}

/// Creates a product with its first variant, or adds/updates a variant.
///
/// # Endpoint
///
/// `POST /api/seller/stores/{url}/products`
///
/// # Errors
///
/// Returns 400 for invalid sizes, colors, images or categories.
/// Returns 403 unless the caller owns the store.
/// Returns 409 when no unique slug could be derived from the name.
pub async fn upsert_product_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(url): Path<String>,
    Json(payload): Json<ProductRequest>,
) -> Result<(StatusCode, Json<SavedProduct>), AppError> {
    payload.validate()?;

    let status = if payload.product_id.is_none() || payload.variant_id.is_none() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let saved = state
        .product_service
        .upsert_product(&actor, &url, payload.into())
        .await?;

    Ok((status, Json(saved)))
}

/// `DELETE /api/seller/products/{id}`
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.product_service.delete_product(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
