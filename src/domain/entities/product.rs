//! Catalog entities: products, variants and their sizes, colors and images.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::discounted_price;
use crate::domain::shipping::ShippingFeeMethod;

/// A product listed by a store. Prices and stock live on its variants' sizes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub store_id: i64,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub brand: String,
    #[sqlx(try_from = "String")]
    pub shipping_fee_method: ShippingFeeMethod,
    pub rating: Decimal,
    pub num_reviews: i32,
    pub sales: i32,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One configuration (color/name) of a product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub image: String,
    pub sku: String,
    /// Comma-separated search keywords.
    pub keywords: String,
    /// Kilograms; required only for the `WEIGHT` shipping method.
    pub weight: Option<Decimal>,
    pub is_sale: bool,
    pub sale_end_date: Option<DateTime<Utc>>,
    pub sales: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Size {
    pub id: i64,
    pub variant_id: i64,
    pub size: String,
    pub quantity: i32,
    pub price: Decimal,
    /// Percent off `price`, `0..=100`.
    pub discount: Decimal,
}

impl Size {
    /// Unit price after the size discount.
    pub fn final_price(&self) -> Decimal {
        discounted_price(self.price, self.discount)
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Color {
    pub id: i64,
    pub variant_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantImage {
    pub id: i64,
    pub variant_id: i64,
    pub url: String,
    pub alt: String,
    pub position: i32,
}

/// A variant with all of its children loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDetails {
    pub variant: ProductVariant,
    pub sizes: Vec<Size>,
    pub colors: Vec<Color>,
    pub images: Vec<VariantImage>,
}

impl VariantDetails {
    pub fn size(&self, size_id: i64) -> Option<&Size> {
        self.sizes.iter().find(|s| s.id == size_id)
    }

    /// Cheapest discounted price among sizes in stock, falling back to all sizes.
    pub fn min_price(&self) -> Option<Decimal> {
        let in_stock = self
            .sizes
            .iter()
            .filter(|s| s.in_stock())
            .map(Size::final_price)
            .min();

        in_stock.or_else(|| self.sizes.iter().map(Size::final_price).min())
    }

    pub fn total_stock(&self) -> i64 {
        self.sizes.iter().map(|s| i64::from(s.quantity.max(0))).sum()
    }

    /// Whether the variant is flagged on sale and the sale has not ended.
    pub fn is_on_sale_at(&self, now: DateTime<Utc>) -> bool {
        self.variant.is_sale && self.variant.sale_end_date.is_none_or(|end| now < end)
    }
}

#[derive(Debug, Clone)]
pub struct SizeInput {
    pub size: String,
    pub quantity: i32,
    pub price: Decimal,
    pub discount: Decimal,
}

#[derive(Debug, Clone)]
pub struct ImageInput {
    pub url: String,
    pub alt: String,
}

/// Seller payload for creating a product, adding a variant, or updating a variant.
///
/// - `product_id: None` creates the product with this as its first variant
/// - `product_id: Some, variant_id: None` adds a variant to the product
/// - `product_id: Some, variant_id: Some` updates the product and that variant
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub product_id: Option<i64>,
    pub variant_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub shipping_fee_method: ShippingFeeMethod,
    pub free_shipping_country_ids: Vec<i64>,
    pub variant_name: String,
    pub variant_description: String,
    pub variant_image: String,
    pub sku: String,
    pub keywords: Vec<String>,
    pub weight: Option<Decimal>,
    pub is_sale: bool,
    pub sale_end_date: Option<DateTime<Utc>>,
    pub sizes: Vec<SizeInput>,
    pub colors: Vec<String>,
    pub images: Vec<ImageInput>,
}

/// Product row ready for insertion or update.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_id: i64,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub brand: String,
    pub shipping_fee_method: ShippingFeeMethod,
    pub free_shipping_country_ids: Vec<i64>,
}

/// Variant row plus children, ready for insertion or replacement.
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub name: String,
    pub description: String,
    pub slug: String,
    pub image: String,
    pub sku: String,
    pub keywords: String,
    pub weight: Option<Decimal>,
    pub is_sale: bool,
    pub sale_end_date: Option<DateTime<Utc>>,
    pub sizes: Vec<SizeInput>,
    pub colors: Vec<String>,
    pub images: Vec<ImageInput>,
}

/// Listing card returned by catalog search.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductCard {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub brand: String,
    pub rating: Decimal,
    pub num_reviews: i32,
    pub sales: i32,
    pub views: i64,
    pub store_url: String,
    pub store_name: String,
    pub variant_slug: String,
    pub image: String,
    pub min_price: Option<Decimal>,
    pub total_stock: i64,
}

text_enum! {
    /// Catalog ordering. Spelled as it appears in storefront query strings.
    ProductSort {
        MostPopular => "most-popular",
        NewArrivals => "new-arrivals",
        TopRated => "top-rated",
        PriceLowToHigh => "price-low-to-high",
        PriceHighToLow => "price-high-to-low",
    }
}

impl Default for ProductSort {
    fn default() -> Self {
        Self::NewArrivals
    }
}

/// Catalog search filters. Text search matches name, brand, description and
/// variant keywords case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ProductSearchFilters {
    pub search: Option<String>,
    pub category_url: Option<String>,
    pub sub_category_url: Option<String>,
    pub store_url: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ProductSort,
    pub offset: i64,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn size(id: i64, quantity: i32, price: &str, discount: &str) -> Size {
        Size {
            id,
            variant_id: 1,
            size: format!("S{id}"),
            quantity,
            price: dec(price),
            discount: dec(discount),
        }
    }

    fn details(sizes: Vec<Size>) -> VariantDetails {
        let now = Utc::now();
        VariantDetails {
            variant: ProductVariant {
                id: 1,
                product_id: 1,
                name: "Blue".to_string(),
                description: String::new(),
                slug: "shirt-blue".to_string(),
                image: "https://cdn.example.com/blue.png".to_string(),
                sku: "SH-BL".to_string(),
                keywords: "shirt,blue".to_string(),
                weight: None,
                is_sale: true,
                sale_end_date: Some(now + Duration::days(1)),
                sales: 0,
                created_at: now,
                updated_at: now,
            },
            sizes,
            colors: vec![],
            images: vec![],
        }
    }

    #[test]
    fn test_size_final_price() {
        assert_eq!(size(1, 1, "40.00", "25").final_price(), dec("30.00"));
        assert_eq!(size(1, 1, "40.00", "0").final_price(), dec("40.00"));
    }

    #[test]
    fn test_min_price_prefers_sizes_in_stock() {
        let d = details(vec![
            size(1, 0, "10.00", "0"),
            size(2, 3, "20.00", "10"),
            size(3, 1, "25.00", "0"),
        ]);

        assert_eq!(d.min_price(), Some(dec("18.00")));
        assert_eq!(d.total_stock(), 4);
    }

    #[test]
    fn test_min_price_when_sold_out() {
        let d = details(vec![size(1, 0, "10.00", "0"), size(2, 0, "8.00", "0")]);
        assert_eq!(d.min_price(), Some(dec("8.00")));
        assert_eq!(d.total_stock(), 0);
    }

    #[test]
    fn test_size_lookup() {
        let d = details(vec![size(5, 1, "10.00", "0")]);
        assert!(d.size(5).is_some());
        assert!(d.size(6).is_none());
    }

    #[test]
    fn test_sale_window() {
        let d = details(vec![]);
        assert!(d.is_on_sale_at(Utc::now()));
        assert!(!d.is_on_sale_at(Utc::now() + Duration::days(2)));
    }

    #[test]
    fn test_sort_spelling() {
        assert_eq!(
            "price-low-to-high".parse::<ProductSort>().unwrap(),
            ProductSort::PriceLowToHigh
        );
        assert_eq!(ProductSort::default(), ProductSort::NewArrivals);
    }
}
