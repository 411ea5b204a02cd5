//! PostgreSQL implementation of address repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AddressInput, ShippingAddress};
use crate::domain::repositories::AddressRepository;
use crate::error::AppError;

const ADDRESS_COLUMNS: &str = r#"
    id, user_id, country_id, first_name, last_name, phone, address1, address2,
    city, state, zip_code, is_default, created_at, updated_at
"#;

fn address_in_use(id: i64) -> AppError {
    AppError::conflict("Address is used by an order", json!({ "id": id }))
}

pub struct PgAddressRepository {
    pool: Arc<PgPool>,
}

impl PgAddressRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ShippingAddress>, AppError> {
        let rows = sqlx::query_as::<_, ShippingAddress>(&format!(
            r#"
            SELECT {ADDRESS_COLUMNS}
            FROM shipping_addresses
            WHERE user_id = $1
            ORDER BY is_default DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShippingAddress>, AppError> {
        let row = sqlx::query_as::<_, ShippingAddress>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM shipping_addresses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_default(&self, user_id: i64) -> Result<Option<ShippingAddress>, AppError> {
        let row = sqlx::query_as::<_, ShippingAddress>(&format!(
            r#"
            SELECT {ADDRESS_COLUMNS}
            FROM shipping_addresses
            WHERE user_id = $1 AND is_default = TRUE
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn upsert(
        &self,
        user_id: i64,
        input: AddressInput,
    ) -> Result<ShippingAddress, AppError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default {
            sqlx::query(
                r#"
                UPDATE shipping_addresses
                SET is_default = FALSE, updated_at = NOW()
                WHERE user_id = $1 AND is_default = TRUE
                  AND ($2::BIGINT IS NULL OR id <> $2)
                "#,
            )
            .bind(user_id)
            .bind(input.id)
            .execute(&mut *tx)
            .await?;
        }

        let address = match input.id {
            None => {
                sqlx::query_as::<_, ShippingAddress>(&format!(
                    r#"
                    INSERT INTO shipping_addresses (
                        user_id, country_id, first_name, last_name, phone, address1,
                        address2, city, state, zip_code, is_default
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    RETURNING {ADDRESS_COLUMNS}
                    "#
                ))
                .bind(user_id)
                .bind(input.country_id)
                .bind(&input.first_name)
                .bind(&input.last_name)
                .bind(&input.phone)
                .bind(&input.address1)
                .bind(&input.address2)
                .bind(&input.city)
                .bind(&input.state)
                .bind(&input.zip_code)
                .bind(input.is_default)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_as::<_, ShippingAddress>(&format!(
                r#"
                UPDATE shipping_addresses
                SET country_id = $3, first_name = $4, last_name = $5, phone = $6,
                    address1 = $7, address2 = $8, city = $9, state = $10,
                    zip_code = $11, is_default = $12, updated_at = NOW()
                WHERE id = $1 AND user_id = $2
                RETURNING {ADDRESS_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(user_id)
            .bind(input.country_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(&input.address1)
            .bind(&input.address2)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(input.is_default)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("Address not found", json!({ "id": id })))?,
        };

        tx.commit().await?;

        Ok(address)
    }

    async fn is_used_by_orders(&self, id: i64) -> Result<bool, AppError> {
        let used = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM orders WHERE shipping_address_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(used)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM shipping_addresses WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| {
                let in_use = e
                    .as_database_error()
                    .is_some_and(|db| db.is_foreign_key_violation());
                if in_use { address_in_use(id) } else { AppError::from(e) }
            })?;

        Ok(result.rows_affected() > 0)
    }
}
