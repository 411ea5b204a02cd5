//! Product reviews.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{
    CurrentUser, Review, ReviewFilter, ReviewInput, ReviewSort, ReviewWithImages,
};
use crate::domain::repositories::{ProductRepository, ReviewRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

const MAX_REVIEW_IMAGES: usize = 6;

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    products: Arc<dyn ProductRepository>,
    cache: Arc<dyn CacheService>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        products: Arc<dyn ProductRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            reviews,
            products,
            cache,
        }
    }

    /// Adds the actor's review of a product or replaces their earlier one.
    ///
    /// The product's rating and review count are recomputed in the same
    /// transaction, so the cached product page is dropped afterwards.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the rating is not within 1-5 in half
    ///   steps or the text is not 10-1000 characters
    /// - [`AppError::NotFound`] if the product does not exist
    pub async fn upsert_review(
        &self,
        actor: &CurrentUser,
        product_id: i64,
        mut input: ReviewInput,
    ) -> Result<ReviewWithImages, AppError> {
        input.review = input.review.trim().to_string();
        validate_review(&input)?;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Product not found", json!({ "product_id": product_id }))
            })?;

        let review = self.reviews.upsert(actor.id, product.id, input).await?;
        info!(product_id, user_id = actor.id, "Review saved");

        if let Err(e) = self.cache.invalidate_product(&product.slug).await {
            warn!("Failed to invalidate cache for {}: {}", product.slug, e);
        }

        Ok(review)
    }

    pub async fn find_user_review(
        &self,
        actor: &CurrentUser,
        product_id: i64,
    ) -> Result<Option<Review>, AppError> {
        self.reviews
            .find_by_user_and_product(actor.id, product_id)
            .await
    }

    /// A page of reviews and the total number of matches.
    pub async fn list_product_reviews(
        &self,
        product_id: i64,
        filter: ReviewFilter,
        sort: ReviewSort,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ReviewWithImages>, i64), AppError> {
        if let Some(rating) = filter.rating
            && !(1..=5).contains(&rating)
        {
            return Err(AppError::bad_request(
                "Rating filter must be between 1 and 5",
                json!({ "rating": rating }),
            ));
        }

        self.reviews
            .list_for_product(product_id, filter, sort, offset.max(0), limit.clamp(1, 100))
            .await
    }
}

fn validate_review(input: &ReviewInput) -> Result<(), AppError> {
    let rating = input.rating;
    let doubled = rating * Decimal::TWO;
    if rating < Decimal::ONE || rating > Decimal::from(5) || doubled != doubled.trunc() {
        return Err(AppError::bad_request(
            "Rating must be between 1 and 5 in steps of 0.5",
            json!({ "rating": rating }),
        ));
    }

    let len = input.review.chars().count();
    if !(10..=1000).contains(&len) {
        return Err(AppError::bad_request(
            "Review must be 10-1000 characters",
            json!({ "provided_length": len }),
        ));
    }

    if input.images.len() > MAX_REVIEW_IMAGES {
        return Err(AppError::bad_request(
            "Too many review images",
            json!({ "max": MAX_REVIEW_IMAGES }),
        ));
    }

    Ok(())
}
