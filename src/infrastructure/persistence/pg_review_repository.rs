//! PostgreSQL implementation of review repository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    RatingStatistics, Review, ReviewFilter, ReviewInput, ReviewSort, ReviewWithImages,
};
use crate::domain::repositories::ReviewRepository;
use crate::error::AppError;

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.product_id, u.name AS user_name, r.variant, r.review,
           r.rating, r.color, r.size, r.quantity, r.likes, r.created_at, r.updated_at
    FROM reviews r
    JOIN users u ON u.id = r.user_id
"#;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    #[sqlx(flatten)]
    review: Review,
    total_count: i64,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    review_id: i64,
    url: String,
}

fn order_clause(sort: ReviewSort) -> &'static str {
    match sort {
        ReviewSort::Newest => " ORDER BY r.created_at DESC, r.id DESC",
        ReviewSort::Oldest => " ORDER BY r.created_at ASC, r.id ASC",
        ReviewSort::Highest => " ORDER BY r.rating DESC, r.created_at DESC",
        ReviewSort::Lowest => " ORDER BY r.rating ASC, r.created_at DESC",
    }
}

pub struct PgReviewRepository {
    pool: Arc<PgPool>,
}

impl PgReviewRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn images_for(&self, review_ids: &[i64]) -> Result<HashMap<i64, Vec<String>>, AppError> {
        let rows = sqlx::query_as::<_, ImageRow>(
            "SELECT review_id, url FROM review_images WHERE review_id = ANY($1) ORDER BY id",
        )
        .bind(review_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_review: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            by_review.entry(row.review_id).or_default().push(row.url);
        }
        Ok(by_review)
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn upsert(
        &self,
        user_id: i64,
        product_id: i64,
        input: ReviewInput,
    ) -> Result<ReviewWithImages, AppError> {
        let mut tx = self.pool.begin().await?;

        let review_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (user_id, product_id, variant, review, rating, color, size, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT ON CONSTRAINT reviews_user_product_key DO UPDATE SET
                variant = EXCLUDED.variant,
                review = EXCLUDED.review,
                rating = EXCLUDED.rating,
                color = EXCLUDED.color,
                size = EXCLUDED.size,
                quantity = EXCLUDED.quantity,
                updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(&input.variant)
        .bind(&input.review)
        .bind(input.rating)
        .bind(&input.color)
        .bind(&input.size)
        .bind(&input.quantity)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM review_images WHERE review_id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;

        for url in &input.images {
            sqlx::query("INSERT INTO review_images (review_id, url) VALUES ($1, $2)")
                .bind(review_id)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            UPDATE products SET
                rating = COALESCE((SELECT ROUND(AVG(rating), 2) FROM reviews WHERE product_id = $1), 0),
                num_reviews = (SELECT COUNT(*) FROM reviews WHERE product_id = $1),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE stores s SET
                average_rating = COALESCE((
                    SELECT ROUND(AVG(r.rating), 2)
                    FROM reviews r JOIN products p ON p.id = r.product_id
                    WHERE p.store_id = s.id
                ), 0),
                num_reviews = (
                    SELECT COUNT(*)
                    FROM reviews r JOIN products p ON p.id = r.product_id
                    WHERE p.store_id = s.id
                )
            FROM products p
            WHERE p.id = $1 AND s.id = p.store_id
            "#,
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        let review = sqlx::query_as::<_, Review>(&format!("{REVIEW_SELECT} WHERE r.id = $1"))
            .bind(review_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ReviewWithImages {
            review,
            images: input.images,
        })
    }

    async fn find_by_user_and_product(
        &self,
        user_id: i64,
        product_id: i64,
    ) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "{REVIEW_SELECT} WHERE r.user_id = $1 AND r.product_id = $2"
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(review)
    }

    async fn list_for_product(
        &self,
        product_id: i64,
        filter: ReviewFilter,
        sort: ReviewSort,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ReviewWithImages>, i64), AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT r.id, r.user_id, r.product_id, u.name AS user_name, r.variant, r.review,
                   r.rating, r.color, r.size, r.quantity, r.likes, r.created_at, r.updated_at,
                   COUNT(*) OVER () AS total_count
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.product_id = "#,
        );
        qb.push_bind(product_id);

        if let Some(star) = filter.rating {
            qb.push(" AND r.rating >= ")
                .push_bind(Decimal::from(star))
                .push(" AND r.rating < ")
                .push_bind(Decimal::from(star + 1));
        }
        match filter.has_images {
            Some(true) => {
                qb.push(" AND EXISTS (SELECT 1 FROM review_images ri WHERE ri.review_id = r.id)");
            }
            Some(false) => {
                qb.push(
                    " AND NOT EXISTS (SELECT 1 FROM review_images ri WHERE ri.review_id = r.id)",
                );
            }
            None => {}
        }

        qb.push(order_clause(sort));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let rows = qb
            .build_query_as::<ReviewRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        let ids: Vec<i64> = rows.iter().map(|r| r.review.id).collect();
        let mut images = self.images_for(&ids).await?;

        let reviews = rows
            .into_iter()
            .map(|row| ReviewWithImages {
                images: images.remove(&row.review.id).unwrap_or_default(),
                review: row.review,
            })
            .collect();

        Ok((reviews, total))
    }

    async fn rating_statistics(&self, product_id: i64) -> Result<RatingStatistics, AppError> {
        let counts: Vec<(i32, i64)> = sqlx::query_as(
            r#"
            SELECT FLOOR(rating)::INT AS star, COUNT(*) AS total
            FROM reviews
            WHERE product_id = $1
            GROUP BY 1
            "#,
        )
        .bind(product_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let average: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(ROUND(AVG(rating), 2), 0) FROM reviews WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(RatingStatistics::from_counts(average, counts))
    }
}
