//! Product page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::api::dto::product::ProductPageQuery;
use crate::application::services::product_service::ProductPage;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub page: ProductPage,
}

/// Renders a product with the selected variant, its shipping quote and
/// delivery window.
///
/// # Endpoint
///
/// `GET /products/{slug}?variant=&country=`
///
/// The visit is counted the same way as through the API.
pub async fn product_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ProductPageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state
        .product_service
        .get_product_page(&slug, query.variant.as_deref(), query.country.as_deref())
        .await?;

    Ok(ProductTemplate { page })
}
