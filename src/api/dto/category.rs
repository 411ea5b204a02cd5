//! DTOs for category and subcategory management.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::{CategoryInput, SubCategoryInput};

/// Body of `POST /api/admin/categories`. Without `id` a category is created,
/// with one it is updated.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    pub id: Option<i64>,

    #[validate(length(min = 2, max = 50, message = "Name must be 2 to 50 characters"))]
    pub name: String,

    pub url: String,

    #[validate(url(message = "Invalid image URL"))]
    pub image: String,

    #[serde(default)]
    pub featured: bool,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(r: CategoryRequest) -> Self {
        CategoryInput {
            id: r.id,
            name: r.name,
            url: r.url,
            image: r.image,
            featured: r.featured,
        }
    }
}

/// Body of `POST /api/admin/subcategories`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubCategoryRequest {
    pub id: Option<i64>,

    pub category_id: i64,

    #[validate(length(min = 2, max = 50, message = "Name must be 2 to 50 characters"))]
    pub name: String,

    pub url: String,

    #[validate(url(message = "Invalid image URL"))]
    pub image: String,

    #[serde(default)]
    pub featured: bool,
}

impl From<SubCategoryRequest> for SubCategoryInput {
    fn from(r: SubCategoryRequest) -> Self {
        SubCategoryInput {
            id: r.id,
            category_id: r.category_id,
            name: r.name,
            url: r.url,
            image: r.image,
            featured: r.featured,
        }
    }
}

/// Query of `GET /api/subcategories`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct SubCategoryQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub category_id: Option<i64>,
}
