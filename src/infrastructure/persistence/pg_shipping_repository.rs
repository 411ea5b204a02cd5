//! PostgreSQL implementation of shipping repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Country, ShippingRate, ShippingRateInput};
use crate::domain::repositories::ShippingRepository;
use crate::error::AppError;

const RATE_COLUMNS: &str = r#"
    id, store_id, country_id, shipping_service, shipping_fee_per_item,
    shipping_fee_for_additional_item, shipping_fee_per_kg, shipping_fee_fixed,
    delivery_time_min, delivery_time_max, return_policy, created_at, updated_at
"#;

pub struct PgShippingRepository {
    pool: Arc<PgPool>,
}

impl PgShippingRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShippingRepository for PgShippingRepository {
    async fn list_countries(&self) -> Result<Vec<Country>, AppError> {
        let countries =
            sqlx::query_as::<_, Country>("SELECT id, name, code FROM countries ORDER BY name")
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(countries)
    }

    async fn find_country_by_id(&self, id: i64) -> Result<Option<Country>, AppError> {
        let country =
            sqlx::query_as::<_, Country>("SELECT id, name, code FROM countries WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(country)
    }

    async fn find_country_by_code(&self, code: &str) -> Result<Option<Country>, AppError> {
        let country = sqlx::query_as::<_, Country>(
            "SELECT id, name, code FROM countries WHERE code = UPPER($1)",
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(country)
    }

    async fn list_rates(&self, store_id: i64) -> Result<Vec<ShippingRate>, AppError> {
        let rates = sqlx::query_as::<_, ShippingRate>(&format!(
            "SELECT {RATE_COLUMNS} FROM shipping_rates WHERE store_id = $1 ORDER BY country_id"
        ))
        .bind(store_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rates)
    }

    async fn find_rate(
        &self,
        store_id: i64,
        country_id: i64,
    ) -> Result<Option<ShippingRate>, AppError> {
        let rate = sqlx::query_as::<_, ShippingRate>(&format!(
            "SELECT {RATE_COLUMNS} FROM shipping_rates WHERE store_id = $1 AND country_id = $2"
        ))
        .bind(store_id)
        .bind(country_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(rate)
    }

    async fn upsert_rate(
        &self,
        store_id: i64,
        input: ShippingRateInput,
    ) -> Result<ShippingRate, AppError> {
        let rate = sqlx::query_as::<_, ShippingRate>(&format!(
            r#"
            INSERT INTO shipping_rates (
                store_id, country_id, shipping_service, shipping_fee_per_item,
                shipping_fee_for_additional_item, shipping_fee_per_kg, shipping_fee_fixed,
                delivery_time_min, delivery_time_max, return_policy
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT ON CONSTRAINT shipping_rates_store_country_key DO UPDATE SET
                shipping_service = EXCLUDED.shipping_service,
                shipping_fee_per_item = EXCLUDED.shipping_fee_per_item,
                shipping_fee_for_additional_item = EXCLUDED.shipping_fee_for_additional_item,
                shipping_fee_per_kg = EXCLUDED.shipping_fee_per_kg,
                shipping_fee_fixed = EXCLUDED.shipping_fee_fixed,
                delivery_time_min = EXCLUDED.delivery_time_min,
                delivery_time_max = EXCLUDED.delivery_time_max,
                return_policy = EXCLUDED.return_policy,
                updated_at = NOW()
            RETURNING {RATE_COLUMNS}
            "#
        ))
        .bind(store_id)
        .bind(input.country_id)
        .bind(&input.shipping_service)
        .bind(input.shipping_fee_per_item)
        .bind(input.shipping_fee_for_additional_item)
        .bind(input.shipping_fee_per_kg)
        .bind(input.shipping_fee_fixed)
        .bind(input.delivery_time_min)
        .bind(input.delivery_time_max)
        .bind(&input.return_policy)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(rate)
    }

    async fn is_free_shipping(&self, product_id: i64, country_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM product_free_shipping_countries
                WHERE product_id = $1 AND country_id = $2
            )
            "#,
        )
        .bind(product_id)
        .bind(country_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }
}
