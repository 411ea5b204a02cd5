//! PostgreSQL implementation of store repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Store, StoreInput, StoreShippingDefaults, StoreStatus};
use crate::domain::repositories::StoreRepository;
use crate::error::AppError;

const STORE_COLUMNS: &str = r#"
    id, user_id, name, url, email, phone, description, logo, cover, status, featured,
    average_rating, num_reviews, return_policy, default_shipping_service,
    default_shipping_fee_per_item, default_shipping_fee_for_additional_item,
    default_shipping_fee_per_kg, default_shipping_fee_fixed,
    default_delivery_time_min, default_delivery_time_max, created_at, updated_at
"#;

pub struct PgStoreRepository {
    pool: Arc<PgPool>,
}

impl PgStoreRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Store>, AppError> {
        let store =
            sqlx::query_as::<_, Store>(&format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(store)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Store>, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE url = $1"
        ))
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(store)
    }

    async fn find_conflicting_fields(&self, input: StoreInput) -> Result<Vec<String>, AppError> {
        let fields: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT field FROM (
                SELECT 'name' AS field, 1 AS ord FROM stores
                 WHERE name = $1 AND ($5::BIGINT IS NULL OR id <> $5)
                UNION
                SELECT 'url', 2 FROM stores
                 WHERE url = $2 AND ($5::BIGINT IS NULL OR id <> $5)
                UNION
                SELECT 'email', 3 FROM stores
                 WHERE email = $3 AND ($5::BIGINT IS NULL OR id <> $5)
                UNION
                SELECT 'phone', 4 FROM stores
                 WHERE phone = $4 AND ($5::BIGINT IS NULL OR id <> $5)
            ) clashes
            ORDER BY ord
            "#,
        )
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(fields)
    }

    async fn create(&self, user_id: i64, input: StoreInput) -> Result<Store, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            INSERT INTO stores (user_id, name, url, email, phone, description, logo, cover, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.description)
        .bind(&input.logo)
        .bind(&input.cover)
        .bind(input.featured)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(store)
    }

    async fn update(&self, id: i64, input: StoreInput) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores
            SET name = $2, url = $3, email = $4, phone = $5, description = $6,
                logo = $7, cover = $8, featured = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.description)
        .bind(&input.logo)
        .bind(&input.cover)
        .bind(input.featured)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Store not found", json!({ "id": id })))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Store>, AppError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(stores)
    }

    async fn list_all(&self) -> Result<Vec<Store>, AppError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(stores)
    }

    async fn list_active(&self, limit: i64) -> Result<Vec<Store>, AppError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            r#"
            SELECT {STORE_COLUMNS}
            FROM stores
            WHERE status = 'ACTIVE'
            ORDER BY featured DESC, average_rating DESC, name
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(stores)
    }

    async fn update_status(&self, id: i64, status: StoreStatus) -> Result<Option<Store>, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(store)
    }

    async fn update_default_shipping(
        &self,
        id: i64,
        defaults: StoreShippingDefaults,
    ) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores
            SET default_shipping_service = $2,
                default_shipping_fee_per_item = $3,
                default_shipping_fee_for_additional_item = $4,
                default_shipping_fee_per_kg = $5,
                default_shipping_fee_fixed = $6,
                default_delivery_time_min = $7,
                default_delivery_time_max = $8,
                return_policy = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&defaults.shipping_service)
        .bind(defaults.fee_per_item)
        .bind(defaults.fee_for_additional_item)
        .bind(defaults.fee_per_kg)
        .bind(defaults.fee_fixed)
        .bind(defaults.delivery_time_min)
        .bind(defaults.delivery_time_max)
        .bind(&defaults.return_policy)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Store not found", json!({ "id": id })))
    }
}
