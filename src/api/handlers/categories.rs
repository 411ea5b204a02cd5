//! Handlers for categories and subcategories.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use super::created_or_ok;
use crate::api::dto::category::{CategoryRequest, SubCategoryQuery, SubCategoryRequest};
use crate::domain::entities::{Category, CurrentUser, SubCategory};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/categories`
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.category_service.list_categories().await?))
}

/// `GET /api/categories/{url}`
pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(state.category_service.get_category_by_url(&url).await?))
}

/// `GET /api/subcategories?category_id=`
pub async fn list_subcategories_handler(
    State(state): State<AppState>,
    Query(query): Query<SubCategoryQuery>,
) -> Result<Json<Vec<SubCategory>>, AppError> {
    let items = state
        .category_service
        .list_subcategories(query.category_id)
        .await?;
    Ok(Json(items))
}

/// `GET /api/subcategories/{url}`
pub async fn get_subcategory_handler(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> Result<Json<SubCategory>, AppError> {
    Ok(Json(state.category_service.get_subcategory_by_url(&url).await?))
}

/// Creates or updates a category.
///
/// # Endpoint
///
/// `POST /api/admin/categories`
///
/// # Errors
///
/// Returns 403 unless the caller is an admin.
/// Returns 409 if another category already uses the name or url.
pub async fn upsert_category_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    payload.validate()?;

    let status = created_or_ok(payload.id);
    let category = state
        .category_service
        .upsert_category(&actor, payload.into())
        .await?;

    Ok((status, Json(category)))
}

/// `DELETE /api/admin/categories/{id}`
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete_category(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates or updates a subcategory; the parent category must exist.
///
/// # Endpoint
///
/// `POST /api/admin/subcategories`
pub async fn upsert_subcategory_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<SubCategoryRequest>,
) -> Result<(StatusCode, Json<SubCategory>), AppError> {
    payload.validate()?;

    let status = created_or_ok(payload.id);
    let sub = state
        .category_service
        .upsert_subcategory(&actor, payload.into())
        .await?;

    Ok((status, Json(sub)))
}

/// `DELETE /api/admin/subcategories/{id}`
pub async fn delete_subcategory_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete_subcategory(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
