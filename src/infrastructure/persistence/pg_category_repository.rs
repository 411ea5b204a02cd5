//! PostgreSQL implementation of category repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Category, CategoryInput, SubCategory, SubCategoryInput};
use crate::domain::repositories::CategoryRepository;
use crate::error::AppError;

const CATEGORY_COLUMNS: &str = "id, name, url, image, featured, created_at, updated_at";
const SUBCATEGORY_COLUMNS: &str =
    "id, category_id, name, url, image, featured, created_at, updated_at";

pub struct PgCategoryRepository {
    pool: Arc<PgPool>,
}

impl PgCategoryRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY featured DESC, name"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn find_category_by_id(&self, id: i64) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_category_by_url(&self, url: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE url = $1"
        ))
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_category_duplicate(
        &self,
        name: &str,
        url: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM categories
            WHERE (name = $1 OR url = $2)
              AND ($3::BIGINT IS NULL OR id <> $3)
            LIMIT 1
            "#
        ))
        .bind(name)
        .bind(url)
        .bind(exclude_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn create_category(&self, input: CategoryInput) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, url, image, featured)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.image)
        .bind(input.featured)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn update_category(
        &self,
        id: i64,
        input: CategoryInput,
    ) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $2, url = $3, image = $4, featured = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.image)
        .bind(input.featured)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn delete_category(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_subcategories(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<SubCategory>, AppError> {
        let rows = sqlx::query_as::<_, SubCategory>(&format!(
            r#"
            SELECT {SUBCATEGORY_COLUMNS}
            FROM sub_categories
            WHERE ($1::BIGINT IS NULL OR category_id = $1)
            ORDER BY featured DESC, name
            "#
        ))
        .bind(category_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn find_subcategory_by_id(&self, id: i64) -> Result<Option<SubCategory>, AppError> {
        let row = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUBCATEGORY_COLUMNS} FROM sub_categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_subcategory_by_url(&self, url: &str) -> Result<Option<SubCategory>, AppError> {
        let row = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUBCATEGORY_COLUMNS} FROM sub_categories WHERE url = $1"
        ))
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_subcategory_duplicate(
        &self,
        name: &str,
        url: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<SubCategory>, AppError> {
        let row = sqlx::query_as::<_, SubCategory>(&format!(
            r#"
            SELECT {SUBCATEGORY_COLUMNS}
            FROM sub_categories
            WHERE (name = $1 OR url = $2)
              AND ($3::BIGINT IS NULL OR id <> $3)
            LIMIT 1
            "#
        ))
        .bind(name)
        .bind(url)
        .bind(exclude_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn create_subcategory(&self, input: SubCategoryInput) -> Result<SubCategory, AppError> {
        let row = sqlx::query_as::<_, SubCategory>(&format!(
            r#"
            INSERT INTO sub_categories (category_id, name, url, image, featured)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUBCATEGORY_COLUMNS}
            "#
        ))
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.image)
        .bind(input.featured)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn update_subcategory(
        &self,
        id: i64,
        input: SubCategoryInput,
    ) -> Result<Option<SubCategory>, AppError> {
        let row = sqlx::query_as::<_, SubCategory>(&format!(
            r#"
            UPDATE sub_categories
            SET category_id = $2, name = $3, url = $4, image = $5, featured = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SUBCATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(&input.image)
        .bind(input.featured)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn delete_subcategory(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sub_categories WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
