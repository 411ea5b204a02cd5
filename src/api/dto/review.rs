//! DTOs for product reviews.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use super::pagination::PaginationParams;
use crate::domain::entities::{ReviewFilter, ReviewInput, ReviewSort};

/// Body of `POST /api/products/{id}/reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    #[serde(default)]
    pub variant: String,

    #[validate(length(min = 10, max = 1000))]
    pub review: String,

    pub rating: Decimal,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub size: String,

    #[serde(default)]
    pub quantity: String,

    #[serde(default)]
    #[validate(length(max = 6, message = "At most 6 images per review"))]
    pub images: Vec<String>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(r: ReviewRequest) -> Self {
        ReviewInput {
            variant: r.variant,
            review: r.review,
            rating: r.rating,
            color: r.color,
            size: r.size,
            quantity: r.quantity,
            images: r.images,
        }
    }
}

/// Query of `GET /api/products/{id}/reviews`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub rating: Option<i32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub has_images: Option<bool>,

    #[serde(default)]
    pub sort: ReviewSort,
}

impl ReviewListQuery {
    pub fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            rating: self.rating,
            has_images: self.has_images,
        }
    }
}
