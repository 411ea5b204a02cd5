//! PostgreSQL implementation of cart repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Cart, CartDetails, CartItem, NewCartItem};
use crate::domain::pricing::Totals;
use crate::domain::repositories::CartRepository;
use crate::error::AppError;

const CART_COLUMNS: &str =
    "id, user_id, coupon_id, shipping_fees, sub_total, total, created_at, updated_at";

const ITEM_COLUMNS: &str = r#"
    id, cart_id, store_id, product_id, variant_id, size_id, product_slug, variant_slug,
    sku, name, image, size, price, quantity, shipping_fee, total_price
"#;

pub struct PgCartRepository {
    pool: Arc<PgPool>,
}

impl PgCartRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<CartDetails>, AppError> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let Some(cart) = cart else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY id"
        ))
        .bind(cart.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(CartDetails { cart, items }))
    }

    async fn save(
        &self,
        user_id: i64,
        items: Vec<NewCartItem>,
        coupon_id: Option<i64>,
        totals: Totals,
    ) -> Result<CartDetails, AppError> {
        let mut tx = self.pool.begin().await?;

        let cart = sqlx::query_as::<_, Cart>(&format!(
            r#"
            INSERT INTO carts (user_id, coupon_id, shipping_fees, sub_total, total)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                coupon_id = EXCLUDED.coupon_id,
                shipping_fees = EXCLUDED.shipping_fees,
                sub_total = EXCLUDED.sub_total,
                total = EXCLUDED.total,
                updated_at = NOW()
            RETURNING {CART_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(coupon_id)
        .bind(totals.shipping_fees)
        .bind(totals.sub_total)
        .bind(totals.total)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(items.len());
        for item in &items {
            let row = sqlx::query_as::<_, CartItem>(&format!(
                r#"
                INSERT INTO cart_items (
                    cart_id, store_id, product_id, variant_id, size_id, product_slug,
                    variant_slug, sku, name, image, size, price, quantity, shipping_fee,
                    total_price
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(cart.id)
            .bind(item.store_id)
            .bind(item.product_id)
            .bind(item.variant_id)
            .bind(item.size_id)
            .bind(&item.product_slug)
            .bind(&item.variant_slug)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(&item.image)
            .bind(&item.size)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.shipping_fee)
            .bind(item.total_price)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        tx.commit().await?;

        Ok(CartDetails {
            cart,
            items: stored,
        })
    }

    async fn apply_coupon(
        &self,
        cart_id: i64,
        coupon_id: i64,
        totals: Totals,
    ) -> Result<Cart, AppError> {
        sqlx::query_as::<_, Cart>(&format!(
            r#"
            UPDATE carts
            SET coupon_id = $2, shipping_fees = $3, sub_total = $4, total = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CART_COLUMNS}
            "#
        ))
        .bind(cart_id)
        .bind(coupon_id)
        .bind(totals.shipping_fees)
        .bind(totals.sub_total)
        .bind(totals.total)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Cart not found", json!({ "id": cart_id })))
    }

    async fn clear(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
