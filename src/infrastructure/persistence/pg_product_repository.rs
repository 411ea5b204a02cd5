//! PostgreSQL implementation of product repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    Color, NewProduct, NewVariant, Product, ProductCard, ProductSearchFilters, ProductSort,
    ProductVariant, Size, VariantDetails, VariantImage,
};
use crate::domain::repositories::ProductRepository;
use crate::error::AppError;

const PRODUCT_COLUMNS: &str = r#"
    id, store_id, category_id, sub_category_id, name, description, slug, brand,
    shipping_fee_method, rating, num_reviews, sales, views, created_at, updated_at
"#;

const VARIANT_COLUMNS: &str = r#"
    id, product_id, name, description, slug, image, sku, keywords, weight, is_sale,
    sale_end_date, sales, created_at, updated_at
"#;

/// Search result row: a card plus the window count of all matches.
#[derive(sqlx::FromRow)]
struct CardRow {
    #[sqlx(flatten)]
    card: ProductCard,
    total_count: i64,
}

/// Escapes `%`, `_` and `\` so user text matches literally inside `ILIKE`.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn order_clause(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::MostPopular => " ORDER BY p.sales DESC, p.views DESC, p.id DESC",
        ProductSort::NewArrivals => " ORDER BY p.created_at DESC, p.id DESC",
        ProductSort::TopRated => " ORDER BY p.rating DESC, p.num_reviews DESC, p.id DESC",
        ProductSort::PriceLowToHigh => " ORDER BY vp.min_price ASC NULLS LAST, p.id DESC",
        ProductSort::PriceHighToLow => " ORDER BY vp.min_price DESC NULLS LAST, p.id DESC",
    }
}

/// Inserts a variant and its children on an open connection/transaction.
async fn insert_variant(
    conn: &mut PgConnection,
    product_id: i64,
    variant: &NewVariant,
) -> Result<VariantDetails, AppError> {
    let row = sqlx::query_as::<_, ProductVariant>(&format!(
        r#"
        INSERT INTO product_variants (
            product_id, name, description, slug, image, sku, keywords, weight,
            is_sale, sale_end_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {VARIANT_COLUMNS}
        "#
    ))
    .bind(product_id)
    .bind(&variant.name)
    .bind(&variant.description)
    .bind(&variant.slug)
    .bind(&variant.image)
    .bind(&variant.sku)
    .bind(&variant.keywords)
    .bind(variant.weight)
    .bind(variant.is_sale)
    .bind(variant.sale_end_date)
    .fetch_one(&mut *conn)
    .await?;

    insert_children(conn, row, variant).await
}

/// Inserts sizes, colors and images of `variant` under the stored `row`.
async fn insert_children(
    conn: &mut PgConnection,
    row: ProductVariant,
    variant: &NewVariant,
) -> Result<VariantDetails, AppError> {
    let mut sizes = Vec::with_capacity(variant.sizes.len());
    for size in &variant.sizes {
        let inserted = sqlx::query_as::<_, Size>(
            r#"
            INSERT INTO sizes (variant_id, size, quantity, price, discount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, variant_id, size, quantity, price, discount
            "#,
        )
        .bind(row.id)
        .bind(&size.size)
        .bind(size.quantity)
        .bind(size.price)
        .bind(size.discount)
        .fetch_one(&mut *conn)
        .await?;
        sizes.push(inserted);
    }

    let mut colors = Vec::with_capacity(variant.colors.len());
    for name in &variant.colors {
        let inserted = sqlx::query_as::<_, Color>(
            "INSERT INTO colors (variant_id, name) VALUES ($1, $2) RETURNING id, variant_id, name",
        )
        .bind(row.id)
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
        colors.push(inserted);
    }

    let mut images = Vec::with_capacity(variant.images.len());
    for (position, image) in variant.images.iter().enumerate() {
        let inserted = sqlx::query_as::<_, VariantImage>(
            r#"
            INSERT INTO variant_images (variant_id, url, alt, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, variant_id, url, alt, position
            "#,
        )
        .bind(row.id)
        .bind(&image.url)
        .bind(&image.alt)
        .bind(position as i32)
        .fetch_one(&mut *conn)
        .await?;
        images.push(inserted);
    }

    Ok(VariantDetails {
        variant: row,
        sizes,
        colors,
        images,
    })
}

async fn replace_free_shipping(
    conn: &mut PgConnection,
    product_id: i64,
    country_ids: &[i64],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM product_free_shipping_countries WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    if !country_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO product_free_shipping_countries (product_id, country_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(country_ids)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub struct PgProductRepository {
    pool: Arc<PgPool>,
}

impl PgProductRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads the children of `variants` with one query per child table.
    async fn with_children(
        &self,
        variants: Vec<ProductVariant>,
    ) -> Result<Vec<VariantDetails>, AppError> {
        let ids: Vec<i64> = variants.iter().map(|v| v.id).collect();

        let sizes = sqlx::query_as::<_, Size>(
            r#"
            SELECT id, variant_id, size, quantity, price, discount
            FROM sizes WHERE variant_id = ANY($1) ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let colors = sqlx::query_as::<_, Color>(
            "SELECT id, variant_id, name FROM colors WHERE variant_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let images = sqlx::query_as::<_, VariantImage>(
            r#"
            SELECT id, variant_id, url, alt, position
            FROM variant_images WHERE variant_id = ANY($1) ORDER BY position, id
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut sizes_by: HashMap<i64, Vec<Size>> = HashMap::new();
        for s in sizes {
            sizes_by.entry(s.variant_id).or_default().push(s);
        }
        let mut colors_by: HashMap<i64, Vec<Color>> = HashMap::new();
        for c in colors {
            colors_by.entry(c.variant_id).or_default().push(c);
        }
        let mut images_by: HashMap<i64, Vec<VariantImage>> = HashMap::new();
        for i in images {
            images_by.entry(i.variant_id).or_default().push(i);
        }

        Ok(variants
            .into_iter()
            .map(|variant| VariantDetails {
                sizes: sizes_by.remove(&variant.id).unwrap_or_default(),
                colors: colors_by.remove(&variant.id).unwrap_or_default(),
                images: images_by.remove(&variant.id).unwrap_or_default(),
                variant,
            })
            .collect())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(product)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(product)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn variant_slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM product_variants WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn create(
        &self,
        product: NewProduct,
        variant: NewVariant,
    ) -> Result<(Product, VariantDetails), AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                store_id, category_id, sub_category_id, name, description, slug, brand,
                shipping_fee_method
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.store_id)
        .bind(product.category_id)
        .bind(product.sub_category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.slug)
        .bind(&product.brand)
        .bind(product.shipping_fee_method.as_str())
        .fetch_one(&mut *tx)
        .await?;

        replace_free_shipping(&mut tx, row.id, &product.free_shipping_country_ids).await?;
        let details = insert_variant(&mut tx, row.id, &variant).await?;

        tx.commit().await?;

        Ok((row, details))
    }

    async fn update(&self, id: i64, product: NewProduct) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET category_id = $2, sub_category_id = $3, name = $4, description = $5,
                brand = $6, shipping_fee_method = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(product.category_id)
        .bind(product.sub_category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(product.shipping_fee_method.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found", json!({ "id": id })))?;

        replace_free_shipping(&mut tx, id, &product.free_shipping_country_ids).await?;

        tx.commit().await?;

        Ok(row)
    }

    async fn add_variant(
        &self,
        product_id: i64,
        variant: NewVariant,
    ) -> Result<VariantDetails, AppError> {
        let mut tx = self.pool.begin().await?;
        let details = insert_variant(&mut tx, product_id, &variant).await?;
        tx.commit().await?;

        Ok(details)
    }

    async fn update_variant(
        &self,
        variant_id: i64,
        variant: NewVariant,
    ) -> Result<VariantDetails, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductVariant>(&format!(
            r#"
            UPDATE product_variants
            SET name = $2, description = $3, image = $4, sku = $5, keywords = $6,
                weight = $7, is_sale = $8, sale_end_date = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {VARIANT_COLUMNS}
            "#
        ))
        .bind(variant_id)
        .bind(&variant.name)
        .bind(&variant.description)
        .bind(&variant.image)
        .bind(&variant.sku)
        .bind(&variant.keywords)
        .bind(variant.weight)
        .bind(variant.is_sale)
        .bind(variant.sale_end_date)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Variant not found", json!({ "id": variant_id })))?;

        for table in ["sizes", "colors", "variant_images"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE variant_id = $1"))
                .bind(variant_id)
                .execute(&mut *tx)
                .await?;
        }

        let details = insert_children(&mut tx, row, &variant).await?;

        tx.commit().await?;

        Ok(details)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_variant(&self, variant_id: i64) -> Result<Option<VariantDetails>, AppError> {
        let variant = sqlx::query_as::<_, ProductVariant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE id = $1"
        ))
        .bind(variant_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match variant {
            Some(v) => Ok(self.with_children(vec![v]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_variants(&self, product_id: i64) -> Result<Vec<VariantDetails>, AppError> {
        let variants = sqlx::query_as::<_, ProductVariant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE product_id = $1 ORDER BY id"
        ))
        .bind(product_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        self.with_children(variants).await
    }

    async fn free_shipping_country_ids(&self, product_id: i64) -> Result<Vec<i64>, AppError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT country_id FROM product_free_shipping_countries
            WHERE product_id = $1 ORDER BY country_id
            "#,
        )
        .bind(product_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }

    async fn search(
        &self,
        filters: ProductSearchFilters,
    ) -> Result<(Vec<ProductCard>, i64), AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            WITH variant_prices AS (
                SELECT v.product_id,
                       MIN(ROUND(s.price - s.price * s.discount / 100, 2)) AS min_price,
                       SUM(s.quantity)::BIGINT AS total_stock
                FROM product_variants v
                JOIN sizes s ON s.variant_id = v.id
                GROUP BY v.product_id
            ),
            first_variant AS (
                SELECT DISTINCT ON (product_id) product_id, slug, image
                FROM product_variants
                ORDER BY product_id, id
            )
            SELECT p.id, p.slug, p.name, p.brand, p.rating, p.num_reviews, p.sales, p.views,
                   st.url AS store_url, st.name AS store_name,
                   fv.slug AS variant_slug, fv.image,
                   vp.min_price, COALESCE(vp.total_stock, 0) AS total_stock,
                   COUNT(*) OVER () AS total_count
            FROM products p
            JOIN stores st ON st.id = p.store_id AND st.status = 'ACTIVE'
            JOIN first_variant fv ON fv.product_id = p.id
            JOIN categories c ON c.id = p.category_id
            JOIN sub_categories sc ON sc.id = p.sub_category_id
            LEFT JOIN variant_prices vp ON vp.product_id = p.id
            WHERE TRUE
            "#,
        );

        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            qb.push(" AND (p.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.brand ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.description ILIKE ")
                .push_bind(pattern.clone())
                .push(
                    " OR EXISTS (SELECT 1 FROM product_variants kv \
                     WHERE kv.product_id = p.id AND kv.keywords ILIKE ",
                )
                .push_bind(pattern)
                .push("))");
        }
        if let Some(url) = filters.category_url {
            qb.push(" AND c.url = ").push_bind(url);
        }
        if let Some(url) = filters.sub_category_url {
            qb.push(" AND sc.url = ").push_bind(url);
        }
        if let Some(url) = filters.store_url {
            qb.push(" AND st.url = ").push_bind(url);
        }
        if let Some(min) = filters.min_price {
            qb.push(" AND vp.min_price >= ").push_bind(min);
        }
        if let Some(max) = filters.max_price {
            qb.push(" AND vp.min_price <= ").push_bind(max);
        }

        qb.push(order_clause(filters.sort));
        qb.push(" LIMIT ").push_bind(filters.limit);
        qb.push(" OFFSET ").push_bind(filters.offset);

        let rows = qb
            .build_query_as::<CardRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        Ok((rows.into_iter().map(|r| r.card).collect(), total))
    }

    async fn record_views(&self, product_id: i64, views: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE products SET views = views + $2 WHERE id = $1")
            .bind(product_id)
            .bind(views)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
