//! PostgreSQL implementation of coupon repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Coupon, CouponInput};
use crate::domain::repositories::CouponRepository;
use crate::error::AppError;

const COUPON_COLUMNS: &str =
    "id, store_id, code, start_date, end_date, discount, created_at, updated_at";

pub struct PgCouponRepository {
    pool: Arc<PgPool>,
}

impl PgCouponRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponRepository for PgCouponRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Coupon>, AppError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(coupon)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, AppError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = UPPER($1)"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(coupon)
    }

    async fn list_by_store(&self, store_id: i64) -> Result<Vec<Coupon>, AppError> {
        let coupons = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(coupons)
    }

    async fn create(&self, store_id: i64, input: CouponInput) -> Result<Coupon, AppError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            INSERT INTO coupons (store_id, code, start_date, end_date, discount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COUPON_COLUMNS}
            "#
        ))
        .bind(store_id)
        .bind(&input.code)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.discount)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(coupon)
    }

    async fn update(&self, id: i64, input: CouponInput) -> Result<Option<Coupon>, AppError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            UPDATE coupons
            SET code = $2, start_date = $3, end_date = $4, discount = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COUPON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.code)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.discount)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(coupon)
    }

    async fn delete(&self, store_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE carts
            SET coupon_id = NULL, total = sub_total + shipping_fees, updated_at = NOW()
            WHERE coupon_id = (SELECT id FROM coupons WHERE id = $1 AND store_id = $2)
            "#,
        )
        .bind(id)
        .bind(store_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM coupons WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
