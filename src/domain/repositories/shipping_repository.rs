//! Repository trait for countries, shipping rates and free-shipping lists.

use crate::domain::entities::{Country, ShippingRate, ShippingRateInput};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for shipping configuration.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShippingRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShippingRepository: Send + Sync {
    /// Lists all countries ordered by name.
    async fn list_countries(&self) -> Result<Vec<Country>, AppError>;

    async fn find_country_by_id(&self, id: i64) -> Result<Option<Country>, AppError>;

    /// Looks up a country by ISO alpha-2 code (case-insensitive).
    async fn find_country_by_code(&self, code: &str) -> Result<Option<Country>, AppError>;

    async fn list_rates(&self, store_id: i64) -> Result<Vec<ShippingRate>, AppError>;

    async fn find_rate(
        &self,
        store_id: i64,
        country_id: i64,
    ) -> Result<Option<ShippingRate>, AppError>;

    /// Inserts the rate or updates the existing one for `(store_id, input.country_id)`.
    async fn upsert_rate(
        &self,
        store_id: i64,
        input: ShippingRateInput,
    ) -> Result<ShippingRate, AppError>;

    /// Whether `product_id` ships free to `country_id`.
    async fn is_free_shipping(&self, product_id: i64, country_id: i64) -> Result<bool, AppError>;
}
