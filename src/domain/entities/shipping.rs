//! Countries, per-country shipping rates and customer addresses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
}

/// A store's shipping terms for one country. Unique per (store, country).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShippingRate {
    pub id: i64,
    pub store_id: i64,
    pub country_id: i64,
    pub shipping_service: String,
    pub shipping_fee_per_item: Decimal,
    pub shipping_fee_for_additional_item: Decimal,
    pub shipping_fee_per_kg: Decimal,
    pub shipping_fee_fixed: Decimal,
    pub delivery_time_min: i32,
    pub delivery_time_max: i32,
    pub return_policy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for a shipping rate; the key is `(store_id, country_id)`.
#[derive(Debug, Clone)]
pub struct ShippingRateInput {
    pub country_id: i64,
    pub shipping_service: String,
    pub shipping_fee_per_item: Decimal,
    pub shipping_fee_for_additional_item: Decimal,
    pub shipping_fee_per_kg: Decimal,
    pub shipping_fee_fixed: Decimal,
    pub delivery_time_min: i32,
    pub delivery_time_max: i32,
    pub return_policy: String,
}

/// Dashboard row: every country, with the store's rate when one is configured.
#[derive(Debug, Clone, Serialize)]
pub struct CountryShippingRate {
    pub country: Country,
    pub rate: Option<ShippingRate>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShippingAddress {
    pub id: i64,
    pub user_id: i64,
    pub country_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShippingAddress {
    /// Whether `input` describes the same recipient and location, ignoring the
    /// default flag.
    pub fn same_destination(&self, input: &AddressInput) -> bool {
        self.country_id == input.country_id
            && self.first_name == input.first_name
            && self.last_name == input.last_name
            && self.phone == input.phone
            && self.address1 == input.address1
            && self.address2 == input.address2
            && self.city == input.city
            && self.state == input.state
            && self.zip_code == input.zip_code
    }
}

/// Create-or-update payload for an address. `id: None` creates.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub id: Option<i64>,
    pub country_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub is_default: bool,
}
