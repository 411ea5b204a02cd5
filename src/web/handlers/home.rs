//! Storefront home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use super::listing_filters;
use crate::domain::entities::{Category, ProductCard, ProductSort, Store};
use crate::error::AppError;
use crate::state::AppState;

/// Renders `templates/home.html`: categories, featured stores and the newest
/// products.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<Category>,
    pub stores: Vec<Store>,
    pub products: Vec<ProductCard>,
}

/// Renders the home page.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = state.category_service.list_categories().await?;
    let stores = state.store_service.list_active_stores(8).await?;
    let (products, _) = state
        .product_service
        .search_products(listing_filters(None, ProductSort::NewArrivals))
        .await?;

    Ok(HomeTemplate {
        categories,
        stores,
        products,
    })
}
