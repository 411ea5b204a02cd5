//! Store entity: a seller-owned catalog unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

text_enum! {
    /// Moderation status. Only `ACTIVE` stores are visible on the storefront.
    StoreStatus {
        Pending => "PENDING",
        Active => "ACTIVE",
        Banned => "BANNED",
        Disabled => "DISABLED",
    }
}

/// A seller's store with its default shipping terms.
///
/// The `default_*` fields apply to every country the store has no explicit
/// [`crate::domain::entities::ShippingRate`] for.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Store {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub url: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub logo: String,
    pub cover: String,
    #[sqlx(try_from = "String")]
    pub status: StoreStatus,
    pub featured: bool,
    pub average_rating: Decimal,
    pub num_reviews: i32,
    pub return_policy: String,
    pub default_shipping_service: String,
    pub default_shipping_fee_per_item: Decimal,
    pub default_shipping_fee_for_additional_item: Decimal,
    pub default_shipping_fee_per_kg: Decimal,
    pub default_shipping_fee_fixed: Decimal,
    pub default_delivery_time_min: i32,
    pub default_delivery_time_max: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn is_active(&self) -> bool {
        self.status == StoreStatus::Active
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Create-or-update payload for a store's profile. `id: None` creates.
#[derive(Debug, Clone)]
pub struct StoreInput {
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub logo: String,
    pub cover: String,
    pub featured: bool,
}

/// Default shipping settings edited from the seller dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreShippingDefaults {
    pub shipping_service: String,
    pub fee_per_item: Decimal,
    pub fee_for_additional_item: Decimal,
    pub fee_per_kg: Decimal,
    pub fee_fixed: Decimal,
    pub delivery_time_min: i32,
    pub delivery_time_max: i32,
    pub return_policy: String,
}
