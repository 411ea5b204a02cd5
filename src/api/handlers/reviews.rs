//! Handlers for product reviews.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::PagedResponse;
use crate::api::dto::review::{ReviewListQuery, ReviewRequest};
use crate::domain::entities::{CurrentUser, Review, ReviewWithImages};
use crate::error::AppError;
use crate::state::AppState;

/// Reviews of a product.
///
/// # Endpoint
///
/// `GET /api/reviews/{product_id}?rating=&has_images=&sort=`
///
/// `rating` selects a whole-star bucket (1-5); `sort` is one of `newest`
/// (default), `oldest`, `highest`, `lowest`.
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<PagedResponse<ReviewWithImages>>, AppError> {
    let (offset, limit) = query
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (items, total) = state
        .review_service
        .list_product_reviews(product_id, query.filter(), query.sort, offset, limit)
        .await?;

    Ok(Json(PagedResponse::new(&query.pagination, items, total)))
}

/// Writes the caller's review of a product, replacing an earlier one.
///
/// # Endpoint
///
/// `PUT /api/reviews/{product_id}/mine`
///
/// The product's rating and review count are recomputed with the write.
pub async fn upsert_review_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(product_id): Path<i64>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewWithImages>, AppError> {
    payload.validate()?;

    let review = state
        .review_service
        .upsert_review(&actor, product_id, payload.into())
        .await?;
    Ok(Json(review))
}

/// `GET /api/reviews/{product_id}/mine` - `null` when the caller has not
/// reviewed the product.
pub async fn my_review_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(product_id): Path<i64>,
) -> Result<Json<Option<Review>>, AppError> {
    let review = state
        .review_service
        .find_user_review(&actor, product_id)
        .await?;
    Ok(Json(review))
}
