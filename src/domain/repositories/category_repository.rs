//! Repository trait for the catalog taxonomy.

use crate::domain::entities::{Category, CategoryInput, SubCategory, SubCategoryInput};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for categories and subcategories.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCategoryRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_category.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Lists categories, featured first, then by name.
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    async fn find_category_by_id(&self, id: i64) -> Result<Option<Category>, AppError>;

    async fn find_category_by_url(&self, url: &str) -> Result<Option<Category>, AppError>;

    /// Finds another category (not `exclude_id`) already using `name` or `url`.
    async fn find_category_duplicate(
        &self,
        name: &str,
        url: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Category>, AppError>;

    async fn create_category(&self, input: CategoryInput) -> Result<Category, AppError>;

    /// Updates the category identified by `id`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no such category exists.
    async fn update_category(
        &self,
        id: i64,
        input: CategoryInput,
    ) -> Result<Option<Category>, AppError>;

    /// Deletes a category and, by cascade, its subcategories.
    ///
    /// # Returns
    ///
    /// `Ok(false)` if no such category exists.
    async fn delete_category(&self, id: i64) -> Result<bool, AppError>;

    /// Lists subcategories, optionally of a single category.
    async fn list_subcategories(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<SubCategory>, AppError>;

    async fn find_subcategory_by_id(&self, id: i64) -> Result<Option<SubCategory>, AppError>;

    async fn find_subcategory_by_url(&self, url: &str) -> Result<Option<SubCategory>, AppError>;

    /// Finds another subcategory (not `exclude_id`) already using `name` or `url`.
    async fn find_subcategory_duplicate(
        &self,
        name: &str,
        url: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<SubCategory>, AppError>;

    async fn create_subcategory(&self, input: SubCategoryInput) -> Result<SubCategory, AppError>;

    async fn update_subcategory(
        &self,
        id: i64,
        input: SubCategoryInput,
    ) -> Result<Option<SubCategory>, AppError>;

    async fn delete_subcategory(&self, id: i64) -> Result<bool, AppError>;
}
