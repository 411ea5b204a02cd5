//! Entity builders shared by the service unit tests.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::entities::{
    Category, Color, Country, Coupon, CurrentUser, Product, ProductVariant, Role,
    ShippingAddress, Size, Store, StoreStatus, SubCategory, User, VariantDetails, VariantImage,
};
use crate::domain::shipping::ShippingFeeMethod;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn user(id: i64, role: Role) -> User {
    let now = Utc::now();
    User {
        id,
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        picture: None,
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn current_user(id: i64, role: Role) -> CurrentUser {
    CurrentUser::from(user(id, role))
}

pub fn store(id: i64, user_id: i64) -> Store {
    let now = Utc::now();
    Store {
        id,
        user_id,
        name: format!("Store {id}"),
        url: format!("store-{id}"),
        email: format!("store{id}@example.com"),
        phone: format!("+1555000{id}"),
        description: "A store".to_string(),
        logo: "https://img.example.com/logo.png".to_string(),
        cover: "https://img.example.com/cover.png".to_string(),
        status: StoreStatus::Active,
        featured: false,
        average_rating: Decimal::ZERO,
        num_reviews: 0,
        return_policy: "Return in 30 days".to_string(),
        default_shipping_service: "International Delivery".to_string(),
        default_shipping_fee_per_item: dec("5.00"),
        default_shipping_fee_for_additional_item: dec("2.00"),
        default_shipping_fee_per_kg: dec("4.00"),
        default_shipping_fee_fixed: dec("10.00"),
        default_delivery_time_min: 7,
        default_delivery_time_max: 31,
        created_at: now,
        updated_at: now,
    }
}

pub fn category(id: i64) -> Category {
    let now = Utc::now();
    Category {
        id,
        name: format!("Category {id}"),
        url: format!("category-{id}"),
        image: "https://img.example.com/c.png".to_string(),
        featured: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn subcategory(id: i64, category_id: i64) -> SubCategory {
    let now = Utc::now();
    SubCategory {
        id,
        category_id,
        name: format!("Sub {id}"),
        url: format!("sub-{id}"),
        image: "https://img.example.com/s.png".to_string(),
        featured: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn country(id: i64, code: &str) -> Country {
    Country {
        id,
        name: format!("Country {code}"),
        code: code.to_string(),
    }
}

pub fn product(id: i64, store_id: i64, method: ShippingFeeMethod) -> Product {
    let now = Utc::now();
    Product {
        id,
        store_id,
        category_id: 1,
        sub_category_id: 1,
        name: "Linen Shirt".to_string(),
        description: "A shirt".to_string(),
        slug: "linen-shirt".to_string(),
        brand: "Acme".to_string(),
        shipping_fee_method: method,
        rating: Decimal::ZERO,
        num_reviews: 0,
        sales: 0,
        views: 0,
        created_at: now,
        updated_at: now,
    }
}

/// A variant with one size per `(quantity, price)` pair; size ids start at `id * 10`.
pub fn variant(id: i64, product_id: i64, sizes: &[(i32, &str)]) -> VariantDetails {
    let now = Utc::now();
    VariantDetails {
        variant: ProductVariant {
            id,
            product_id,
            name: "Blue".to_string(),
            description: "Blue variant".to_string(),
            slug: format!("linen-shirt-blue-{id}"),
            image: "https://img.example.com/v.png".to_string(),
            sku: format!("SKU-{id}"),
            keywords: "shirt,linen".to_string(),
            weight: Some(dec("0.5")),
            is_sale: false,
            sale_end_date: None,
            sales: 0,
            created_at: now,
            updated_at: now,
        },
        sizes: sizes
            .iter()
            .enumerate()
            .map(|(i, (quantity, price))| Size {
                id: id * 10 + i as i64,
                variant_id: id,
                size: format!("S{i}"),
                quantity: *quantity,
                price: dec(price),
                discount: Decimal::ZERO,
            })
            .collect(),
        colors: vec![Color {
            id: 1,
            variant_id: id,
            name: "Blue".to_string(),
        }],
        images: vec![VariantImage {
            id: 1,
            variant_id: id,
            url: "https://img.example.com/1.png".to_string(),
            alt: "front".to_string(),
            position: 0,
        }],
    }
}

pub fn coupon(id: i64, store_id: i64, code: &str, discount: i32) -> Coupon {
    let now = Utc::now();
    Coupon {
        id,
        store_id,
        code: code.to_string(),
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(1),
        discount,
        created_at: now,
        updated_at: now,
    }
}

pub fn address(id: i64, user_id: i64, country_id: i64) -> ShippingAddress {
    let now = Utc::now();
    ShippingAddress {
        id,
        user_id,
        country_id,
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        phone: "+15550001".to_string(),
        address1: "1 Main St".to_string(),
        address2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62701".to_string(),
        is_default: true,
        created_at: now,
        updated_at: now,
    }
}
