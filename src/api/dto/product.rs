//! DTOs for product management, catalog search and product pages.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use super::pagination::PaginationParams;
use crate::domain::entities::{ImageInput, ProductInput, ProductSort, SizeInput};
use crate::domain::shipping::ShippingFeeMethod;

/// Stock keeping units: letters, digits, dashes and underscores.
static SKU_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid SKU pattern"));

/// Body of `POST /api/seller/stores/{url}/products`.
///
/// Without `product_id` a product is created together with its first variant.
/// With `product_id` the product is updated and the variant is added, or
/// updated when `variant_id` is given as well.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    pub product_id: Option<i64>,
    pub variant_id: Option<i64>,

    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(length(min = 10, max = 5000))]
    pub description: String,

    #[validate(length(min = 1, max = 50))]
    pub brand: String,

    pub category_id: i64,
    pub sub_category_id: i64,
    pub shipping_fee_method: ShippingFeeMethod,

    #[serde(default)]
    pub free_shipping_country_ids: Vec<i64>,

    #[validate(length(min = 2, max = 100))]
    pub variant_name: String,

    #[serde(default)]
    pub variant_description: String,

    #[validate(url(message = "Invalid variant image URL"))]
    pub variant_image: String,

    #[validate(length(min = 3, max = 50))]
    #[validate(regex(path = "*SKU_REGEX", message = "Invalid SKU"))]
    pub sku: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    pub weight: Option<Decimal>,

    #[serde(default)]
    pub is_sale: bool,

    pub sale_end_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "At least one size is required"))]
    #[validate(nested)]
    pub sizes: Vec<SizeRequest>,

    #[validate(length(min = 1, message = "At least one color is required"))]
    pub colors: Vec<String>,

    #[validate(length(min = 1, max = 10, message = "Between 1 and 10 images are required"))]
    #[validate(nested)]
    pub images: Vec<ImageRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SizeRequest {
    #[validate(length(min = 1, max = 20))]
    pub size: String,

    #[validate(range(min = 0))]
    pub quantity: i32,

    pub price: Decimal,

    #[serde(default)]
    pub discount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ImageRequest {
    #[validate(url(message = "Invalid image URL"))]
    pub url: String,

    #[serde(default)]
    pub alt: String,
}

impl From<ProductRequest> for ProductInput {
    fn from(r: ProductRequest) -> Self {
        ProductInput {
            product_id: r.product_id,
            variant_id: r.variant_id,
            name: r.name,
            description: r.description,
            brand: r.brand,
            category_id: r.category_id,
            sub_category_id: r.sub_category_id,
            shipping_fee_method: r.shipping_fee_method,
            free_shipping_country_ids: r.free_shipping_country_ids,
            variant_name: r.variant_name,
            variant_description: r.variant_description,
            variant_image: r.variant_image,
            sku: r.sku,
            keywords: r.keywords,
            weight: r.weight,
            is_sale: r.is_sale,
            sale_end_date: r.sale_end_date,
            sizes: r
                .sizes
                .into_iter()
                .map(|s| SizeInput {
                    size: s.size,
                    quantity: s.quantity,
                    price: s.price,
                    discount: s.discount,
                })
                .collect(),
            colors: r.colors,
            images: r
                .images
                .into_iter()
                .map(|i| ImageInput {
                    url: i.url,
                    alt: i.alt,
                })
                .collect(),
        }
    }
}

/// Query of `GET /api/products`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ProductSearchQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub store: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub min_price: Option<Decimal>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub max_price: Option<Decimal>,

    #[serde(default)]
    pub sort: ProductSort,
}

/// Query of `GET /api/products/{slug}`.
#[derive(Debug, Deserialize)]
pub struct ProductPageQuery {
    pub variant: Option<String>,
    pub country: Option<String>,
}
