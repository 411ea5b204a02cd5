mod common;

use marketplace::domain::entities::{ProductSearchFilters, ProductSort};
use marketplace::domain::repositories::ProductRepository;
use marketplace::infrastructure::persistence::PgProductRepository;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

fn filters() -> ProductSearchFilters {
    ProductSearchFilters {
        limit: 20,
        ..Default::default()
    }
}

#[sqlx::test]
async fn test_search_hides_inactive_stores(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let active = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    let pending = common::create_store(&pool, seller, "new-shop", "PENDING").await;
    common::create_product(&pool, active, category, "visible-tee", "20.00", 5).await;
    common::create_product(&pool, pending, category, "hidden-tee", "20.00", 5).await;

    let repo = PgProductRepository::new(Arc::new(pool));
    let (items, total) = repo.search(filters()).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].slug, "visible-tee");
    assert_eq!(items[0].store_url, "open-shop");
    assert_eq!(items[0].total_stock, 5);
}

#[sqlx::test]
async fn test_search_by_text_and_price(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    common::create_product(&pool, store, category, "cheap-tee", "9.99", 5).await;
    common::create_product(&pool, store, category, "fancy-tee", "99.00", 5).await;

    let repo = PgProductRepository::new(Arc::new(pool));

    let (items, _) = repo
        .search(ProductSearchFilters {
            search: Some("FANCY".to_string()),
            ..filters()
        })
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].slug, "fancy-tee");

    let (items, total) = repo
        .search(ProductSearchFilters {
            max_price: Some(Decimal::new(1000, 2)),
            ..filters()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].slug, "cheap-tee");
}

#[sqlx::test]
async fn test_search_sorted_by_price(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    common::create_product(&pool, store, category, "mid-tee", "50.00", 5).await;
    common::create_product(&pool, store, category, "low-tee", "10.00", 5).await;
    common::create_product(&pool, store, category, "top-tee", "90.00", 5).await;

    let repo = PgProductRepository::new(Arc::new(pool));
    let (items, _) = repo
        .search(ProductSearchFilters {
            sort: ProductSort::PriceHighToLow,
            ..filters()
        })
        .await
        .unwrap();

    let slugs: Vec<&str> = items.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, ["top-tee", "mid-tee", "low-tee"]);
}

#[sqlx::test]
async fn test_record_views(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    let product = common::create_product(&pool, store, category, "tee", "20.00", 5).await;

    let repo = PgProductRepository::new(Arc::new(pool));
    repo.record_views(product.product_id, 3).await.unwrap();
    repo.record_views(product.product_id, 2).await.unwrap();

    let stored = repo.find_by_id(product.product_id).await.unwrap().unwrap();
    assert_eq!(stored.views, 5);
}

#[sqlx::test]
async fn test_find_variant_loads_sizes(pool: PgPool) {
    let seller = common::create_user(&pool, "seller@example.com", "SELLER").await;
    let category = common::create_category(&pool, "shirts").await;
    let store = common::create_store(&pool, seller, "open-shop", "ACTIVE").await;
    let product = common::create_product(&pool, store, category, "tee", "20.00", 4).await;

    let repo = PgProductRepository::new(Arc::new(pool));
    let variant = repo.find_variant(product.variant_id).await.unwrap().unwrap();

    assert_eq!(variant.variant.slug, "tee-blue");
    assert_eq!(variant.sizes.len(), 1);
    assert_eq!(variant.sizes[0].id, product.size_id);
    assert_eq!(variant.total_stock(), 4);
}
