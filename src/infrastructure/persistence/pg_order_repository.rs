//! PostgreSQL implementation of order repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    NewOrder, NewPayment, Order, OrderDetails, OrderFilter, OrderGroup, OrderGroupDetails,
    OrderItem, OrderStatus, PaymentDetails, PaymentStatus, ProductStatus, ShippingAddress,
    StoreOrderGroup,
};
use crate::domain::pricing::Totals;
use crate::domain::repositories::OrderRepository;
use crate::error::AppError;

const ORDER_COLUMNS: &str = r#"
    id, user_id, shipping_address_id, shipping_fees, sub_total, total, order_status,
    payment_status, payment_method, created_at, updated_at
"#;

const GROUP_COLUMNS: &str = r#"
    g.id, g.order_id, g.store_id, g.coupon_id, g.status, g.shipping_service,
    g.shipping_delivery_min, g.shipping_delivery_max, g.shipping_fees, g.sub_total,
    g.total, g.created_at, g.updated_at
"#;

const ITEM_COLUMNS: &str = r#"
    i.id, i.order_group_id, i.product_id, i.variant_id, i.size_id, i.product_slug,
    i.variant_slug, i.sku, i.name, i.image, i.size, i.quantity, i.shipping_fee, i.price,
    i.total_price, i.product_status, i.created_at, i.updated_at
"#;

const PAYMENT_COLUMNS: &str = r#"
    id, order_id, payment_intent_id, payment_method, status, amount, currency,
    created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct GroupRow {
    #[sqlx(flatten)]
    group: OrderGroup,
    store_name: String,
    store_url: String,
    coupon_code: Option<String>,
}

#[derive(sqlx::FromRow)]
struct StoreGroupRow {
    #[sqlx(flatten)]
    group: OrderGroup,
    customer_name: String,
    customer_email: String,
    #[sqlx(try_from = "String")]
    payment_status: PaymentStatus,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    #[sqlx(flatten)]
    order: Order,
    total_count: i64,
}

pub struct PgOrderRepository {
    pool: Arc<PgPool>,
}

impl PgOrderRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Items of the given groups, keyed by group id.
    async fn items_by_group(
        &self,
        group_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<OrderItem>>, AppError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items i WHERE i.order_group_id = ANY($1) ORDER BY i.id"
        ))
        .bind(group_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_group: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_group.entry(item.order_group_id).or_default().push(item);
        }
        Ok(by_group)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (user_id, shipping_address_id, shipping_fees, sub_total, total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.user_id)
        .bind(order.shipping_address_id)
        .bind(order.totals.shipping_fees)
        .bind(order.totals.sub_total)
        .bind(order.totals.total)
        .fetch_one(&mut *tx)
        .await?;

        for group in &order.groups {
            let group_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO order_groups (
                    order_id, store_id, coupon_id, shipping_service, shipping_delivery_min,
                    shipping_delivery_max, shipping_fees, sub_total, total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id
                "#,
            )
            .bind(row.id)
            .bind(group.store_id)
            .bind(group.coupon_id)
            .bind(&group.shipping_service)
            .bind(group.shipping_delivery_min)
            .bind(group.shipping_delivery_max)
            .bind(group.totals.shipping_fees)
            .bind(group.totals.sub_total)
            .bind(group.totals.total)
            .fetch_one(&mut *tx)
            .await?;

            for item in &group.items {
                let reserved = sqlx::query(
                    "UPDATE sizes SET quantity = quantity - $2 WHERE id = $1 AND quantity >= $2",
                )
                .bind(item.size_id)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;

                if reserved.rows_affected() == 0 {
                    return Err(AppError::bad_request(
                        "Insufficient stock",
                        json!({ "product": item.name, "size": item.size }),
                    ));
                }

                sqlx::query("UPDATE product_variants SET sales = sales + $2 WHERE id = $1")
                    .bind(item.variant_id)
                    .bind(item.quantity)
                    .execute(&mut *tx)
                    .await?;

                sqlx::query("UPDATE products SET sales = sales + $2 WHERE id = $1")
                    .bind(item.product_id)
                    .bind(item.quantity)
                    .execute(&mut *tx)
                    .await?;

                sqlx::query(
                    r#"
                    INSERT INTO order_items (
                        order_group_id, product_id, variant_id, size_id, product_slug,
                        variant_slug, sku, name, image, size, quantity, shipping_fee, price,
                        total_price
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                    "#,
                )
                .bind(group_id)
                .bind(item.product_id)
                .bind(item.variant_id)
                .bind(item.size_id)
                .bind(&item.product_slug)
                .bind(&item.variant_slug)
                .bind(&item.sku)
                .bind(&item.name)
                .bind(&item.image)
                .bind(&item.size)
                .bind(item.quantity)
                .bind(item.shipping_fee)
                .bind(item.price)
                .bind(item.total_price)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(order.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, AppError> {
        let order =
            sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(order)
    }

    async fn find_details(&self, id: i64) -> Result<Option<OrderDetails>, AppError> {
        let Some(order) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let shipping_address = sqlx::query_as::<_, ShippingAddress>(
            r#"
            SELECT id, user_id, country_id, first_name, last_name, phone, address1, address2,
                   city, state, zip_code, is_default, created_at, updated_at
            FROM shipping_addresses WHERE id = $1
            "#,
        )
        .bind(order.shipping_address_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let payment = sqlx::query_as::<_, PaymentDetails>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment_details WHERE order_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let groups = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            SELECT {GROUP_COLUMNS}, s.name AS store_name, s.url AS store_url,
                   c.code AS coupon_code
            FROM order_groups g
            JOIN stores s ON s.id = g.store_id
            LEFT JOIN coupons c ON c.id = g.coupon_id
            WHERE g.order_id = $1
            ORDER BY g.id
            "#
        ))
        .bind(id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let group_ids: Vec<i64> = groups.iter().map(|g| g.group.id).collect();
        let mut items = self.items_by_group(&group_ids).await?;

        let groups = groups
            .into_iter()
            .map(|row| OrderGroupDetails {
                items: items.remove(&row.group.id).unwrap_or_default(),
                group: row.group,
                store_name: row.store_name,
                store_url: row.store_url,
                coupon_code: row.coupon_code,
            })
            .collect();

        Ok(Some(OrderDetails {
            order,
            shipping_address,
            payment,
            groups,
        }))
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        filter: OrderFilter,
    ) -> Result<(Vec<Order>, i64), AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {ORDER_COLUMNS}, COUNT(*) OVER () AS total_count FROM orders WHERE user_id = "
        ));
        qb.push_bind(user_id);

        if let Some(status) = filter.order_status {
            qb.push(" AND order_status = ").push_bind(status.as_str());
        }
        if let Some(status) = filter.payment_status {
            qb.push(" AND payment_status = ").push_bind(status.as_str());
        }

        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = qb
            .build_query_as::<OrderRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        Ok((rows.into_iter().map(|r| r.order).collect(), total))
    }

    async fn apply_group_coupon(
        &self,
        order_id: i64,
        group_id: i64,
        coupon_id: i64,
        group_totals: Totals,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE order_groups
            SET coupon_id = $3, shipping_fees = $4, sub_total = $5, total = $6,
                updated_at = NOW()
            WHERE id = $2 AND order_id = $1 AND coupon_id IS NULL
            "#,
        )
        .bind(order_id)
        .bind(group_id)
        .bind(coupon_id)
        .bind(group_totals.shipping_fees)
        .bind(group_totals.sub_total)
        .bind(group_totals.total)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::conflict(
                "A coupon is already applied to this order group",
                json!({ "group_id": group_id }),
            ));
        }

        let updated = sqlx::query(
            r#"
            UPDATE orders o
            SET shipping_fees = g.shipping_fees, sub_total = g.sub_total, total = g.total,
                updated_at = NOW()
            FROM (
                SELECT SUM(shipping_fees) AS shipping_fees, SUM(sub_total) AS sub_total,
                       SUM(total) AS total
                FROM order_groups
                WHERE order_id = $1
            ) g
            WHERE o.id = $1 AND o.payment_status = 'PENDING'
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::bad_request(
                "Coupons can only be applied to unpaid orders",
                json!({ "order_id": order_id }),
            ));
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_store_groups(&self, store_id: i64) -> Result<Vec<StoreOrderGroup>, AppError> {
        let rows = sqlx::query_as::<_, StoreGroupRow>(&format!(
            r#"
            SELECT {GROUP_COLUMNS}, u.name AS customer_name, u.email AS customer_email,
                   o.payment_status
            FROM order_groups g
            JOIN orders o ON o.id = g.order_id
            JOIN users u ON u.id = o.user_id
            WHERE g.store_id = $1
            ORDER BY g.created_at DESC, g.id DESC
            "#
        ))
        .bind(store_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let group_ids: Vec<i64> = rows.iter().map(|r| r.group.id).collect();
        let mut items = self.items_by_group(&group_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| StoreOrderGroup {
                items: items.remove(&row.group.id).unwrap_or_default(),
                group: row.group,
                customer_name: row.customer_name,
                customer_email: row.customer_email,
                payment_status: row.payment_status,
            })
            .collect())
    }

    async fn update_group_status(
        &self,
        store_id: i64,
        group_id: i64,
        status: OrderStatus,
    ) -> Result<Option<OrderGroup>, AppError> {
        let group = sqlx::query_as::<_, OrderGroup>(&format!(
            r#"
            UPDATE order_groups g
            SET status = $3, updated_at = NOW()
            WHERE g.id = $2 AND g.store_id = $1
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(store_id)
        .bind(group_id)
        .bind(status.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(group)
    }

    async fn update_item_status(
        &self,
        store_id: i64,
        item_id: i64,
        status: ProductStatus,
    ) -> Result<Option<OrderItem>, AppError> {
        let item = sqlx::query_as::<_, OrderItem>(&format!(
            r#"
            UPDATE order_items i
            SET product_status = $3, updated_at = NOW()
            FROM order_groups g
            WHERE i.id = $2 AND g.id = i.order_group_id AND g.store_id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(store_id)
        .bind(item_id)
        .bind(status.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(item)
    }

    async fn record_payment(
        &self,
        payment: NewPayment,
        from: &[PaymentStatus],
        order_status: Option<OrderStatus>,
    ) -> Result<Option<PaymentDetails>, AppError> {
        let from: Vec<&str> = from.iter().map(PaymentStatus::as_str).collect();
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE orders
            SET payment_status = $2,
                payment_method = $3,
                order_status = COALESCE($4, order_status),
                updated_at = NOW()
            WHERE id = $1 AND payment_status = ANY($5)
            RETURNING id
            "#,
        )
        .bind(payment.order_id)
        .bind(payment.status.as_str())
        .bind(&payment.payment_method)
        .bind(order_status.map(|s| s.as_str()))
        .bind(&from)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        let details = sqlx::query_as::<_, PaymentDetails>(&format!(
            r#"
            INSERT INTO payment_details (
                order_id, payment_intent_id, payment_method, status, amount, currency
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (order_id) DO UPDATE SET
                payment_intent_id = EXCLUDED.payment_intent_id,
                payment_method = EXCLUDED.payment_method,
                status = EXCLUDED.status,
                amount = EXCLUDED.amount,
                currency = EXCLUDED.currency,
                updated_at = NOW()
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.order_id)
        .bind(&payment.payment_intent_id)
        .bind(&payment.payment_method)
        .bind(payment.status.as_str())
        .bind(payment.amount)
        .bind(&payment.currency)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(details))
    }
}
