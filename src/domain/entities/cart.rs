//! Shopping cart. One cart per user; items carry denormalized product data so
//! the cart renders without joins.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::pricing::PricedLine;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub coupon_id: Option<i64>,
    pub shipping_fees: Decimal,
    pub sub_total: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub store_id: i64,
    pub product_id: i64,
    pub variant_id: i64,
    pub size_id: i64,
    pub product_slug: String,
    pub variant_slug: String,
    pub sku: String,
    pub name: String,
    pub image: String,
    pub size: String,
    pub price: Decimal,
    pub quantity: i32,
    pub shipping_fee: Decimal,
    pub total_price: Decimal,
}

impl CartItem {
    pub fn priced_line(&self) -> PricedLine {
        PricedLine {
            price: self.price,
            quantity: self.quantity,
            shipping_fee: self.shipping_fee,
        }
    }
}

/// A line the client wants in its cart. Everything else is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLineInput {
    pub product_id: i64,
    pub variant_id: i64,
    pub size_id: i64,
    pub quantity: i32,
}

/// A validated, priced cart line ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub store_id: i64,
    pub product_id: i64,
    pub variant_id: i64,
    pub size_id: i64,
    pub product_slug: String,
    pub variant_slug: String,
    pub sku: String,
    pub name: String,
    pub image: String,
    pub size: String,
    pub price: Decimal,
    pub quantity: i32,
    pub shipping_fee: Decimal,
    pub total_price: Decimal,
}

impl NewCartItem {
    pub fn priced_line(&self) -> PricedLine {
        PricedLine {
            price: self.price,
            quantity: self.quantity,
            shipping_fee: self.shipping_fee,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartDetails {
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

impl CartDetails {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items sold by `store_id`.
    pub fn store_items(&self, store_id: i64) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(move |i| i.store_id == store_id)
    }
}
