//! Repository trait for products and variants.

use crate::domain::entities::{
    NewProduct, NewVariant, Product, ProductCard, ProductSearchFilters, VariantDetails,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the product catalog.
///
/// Variant writes always replace the variant's sizes, colors and images as a
/// whole, inside one transaction.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProductRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_product.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;

    async fn variant_slug_exists(&self, slug: &str) -> Result<bool, AppError>;

    /// Creates a product together with its first variant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a slug is taken concurrently.
    async fn create(
        &self,
        product: NewProduct,
        variant: NewVariant,
    ) -> Result<(Product, VariantDetails), AppError>;

    /// Updates product-level fields and its free-shipping countries. The slug is kept.
    async fn update(&self, id: i64, product: NewProduct) -> Result<Product, AppError>;

    async fn add_variant(
        &self,
        product_id: i64,
        variant: NewVariant,
    ) -> Result<VariantDetails, AppError>;

    /// Replaces a variant's fields and children. The slug is kept.
    async fn update_variant(
        &self,
        variant_id: i64,
        variant: NewVariant,
    ) -> Result<VariantDetails, AppError>;

    /// # Returns
    ///
    /// `Ok(false)` if no such product exists.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn find_variant(&self, variant_id: i64) -> Result<Option<VariantDetails>, AppError>;

    /// All variants of a product in creation order.
    async fn list_variants(&self, product_id: i64) -> Result<Vec<VariantDetails>, AppError>;

    async fn free_shipping_country_ids(&self, product_id: i64) -> Result<Vec<i64>, AppError>;

    /// Searches products of active stores.
    ///
    /// # Returns
    ///
    /// The requested page of cards and the total number of matches.
    async fn search(
        &self,
        filters: ProductSearchFilters,
    ) -> Result<(Vec<ProductCard>, i64), AppError>;

    /// Adds `views` to the product's view counter.
    async fn record_views(&self, product_id: i64, views: i64) -> Result<(), AppError>;
}
