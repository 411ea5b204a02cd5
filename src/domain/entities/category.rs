//! Catalog taxonomy: categories and their subcategories.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub image: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubCategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub url: String,
    pub image: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create-or-update payload. `id: None` creates.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
    pub image: String,
    pub featured: bool,
}

/// Create-or-update payload for a subcategory. `id: None` creates.
#[derive(Debug, Clone)]
pub struct SubCategoryInput {
    pub id: Option<i64>,
    pub category_id: i64,
    pub name: String,
    pub url: String,
    pub image: String,
    pub featured: bool,
}
