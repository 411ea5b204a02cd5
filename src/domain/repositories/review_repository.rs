//! Repository trait for product reviews.

use crate::domain::entities::{
    RatingStatistics, Review, ReviewFilter, ReviewInput, ReviewSort, ReviewWithImages,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for reviews.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReviewRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_review.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts or updates the user's review of a product, replaces its images
    /// and recomputes the product's and store's rating and review count, all
    /// in one transaction.
    async fn upsert(
        &self,
        user_id: i64,
        product_id: i64,
        input: ReviewInput,
    ) -> Result<ReviewWithImages, AppError>;

    async fn find_by_user_and_product(
        &self,
        user_id: i64,
        product_id: i64,
    ) -> Result<Option<Review>, AppError>;

    /// A page of a product's reviews and the total number of matches.
    async fn list_for_product(
        &self,
        product_id: i64,
        filter: ReviewFilter,
        sort: ReviewSort,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ReviewWithImages>, i64), AppError>;

    async fn rating_statistics(&self, product_id: i64) -> Result<RatingStatistics, AppError>;
}
