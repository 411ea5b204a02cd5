//! Shipping fee rules.
//!
//! A store ships under a set of [`ShippingTerms`]: the country-specific
//! [`ShippingRate`] when one exists, otherwise the store defaults. A product's
//! [`ShippingFeeMethod`] then decides which arithmetic applies:
//!
//! | Method   | First unit          | Each additional unit    |
//! |----------|---------------------|-------------------------|
//! | `ITEM`   | fee per item        | fee for additional item |
//! | `WEIGHT` | fee per kg × weight | fee per kg × weight     |
//! | `FIXED`  | fixed fee per line  | nothing                 |

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::entities::{ShippingRate, Store};

text_enum! {
    /// How a product's shipping cost is computed.
    ShippingFeeMethod {
        Item => "ITEM",
        Weight => "WEIGHT",
        Fixed => "FIXED",
    }
}

/// Resolved shipping terms for one store shipping to one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingTerms {
    pub shipping_service: String,
    pub fee_per_item: Decimal,
    pub fee_for_additional_item: Decimal,
    pub fee_per_kg: Decimal,
    pub fee_fixed: Decimal,
    pub delivery_time_min: i32,
    pub delivery_time_max: i32,
    pub return_policy: String,
}

impl ShippingTerms {
    /// Terms used when neither a rate nor store defaults are available.
    pub fn zero() -> Self {
        Self {
            shipping_service: String::new(),
            fee_per_item: Decimal::ZERO,
            fee_for_additional_item: Decimal::ZERO,
            fee_per_kg: Decimal::ZERO,
            fee_fixed: Decimal::ZERO,
            delivery_time_min: 0,
            delivery_time_max: 0,
            return_policy: String::new(),
        }
    }

    /// Terms taken from the store's default shipping settings.
    pub fn from_store_defaults(store: &Store) -> Self {
        Self {
            shipping_service: store.default_shipping_service.clone(),
            fee_per_item: store.default_shipping_fee_per_item,
            fee_for_additional_item: store.default_shipping_fee_for_additional_item,
            fee_per_kg: store.default_shipping_fee_per_kg,
            fee_fixed: store.default_shipping_fee_fixed,
            delivery_time_min: store.default_delivery_time_min,
            delivery_time_max: store.default_delivery_time_max,
            return_policy: store.return_policy.clone(),
        }
    }
}

impl From<&ShippingRate> for ShippingTerms {
    fn from(rate: &ShippingRate) -> Self {
        Self {
            shipping_service: rate.shipping_service.clone(),
            fee_per_item: rate.shipping_fee_per_item,
            fee_for_additional_item: rate.shipping_fee_for_additional_item,
            fee_per_kg: rate.shipping_fee_per_kg,
            fee_fixed: rate.shipping_fee_fixed,
            delivery_time_min: rate.delivery_time_min,
            delivery_time_max: rate.delivery_time_max,
            return_policy: rate.return_policy.clone(),
        }
    }
}

/// Picks the country-specific rate when present, otherwise the store defaults.
pub fn resolve_terms(store: &Store, rate: Option<&ShippingRate>) -> ShippingTerms {
    match rate {
        Some(rate) => ShippingTerms::from(rate),
        None => ShippingTerms::from_store_defaults(store),
    }
}

/// Per-unit shipping quote for a product variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingDetails {
    pub shipping_fee_method: ShippingFeeMethod,
    pub shipping_service: String,
    /// Fee for the first unit (or the whole line for `FIXED`).
    pub shipping_fee: Decimal,
    /// Fee for every unit after the first (`ITEM` only).
    pub extra_shipping_fee: Decimal,
    pub delivery_time_min: i32,
    pub delivery_time_max: i32,
    pub return_policy: String,
    pub is_free_shipping: bool,
}

impl ShippingDetails {
    /// Computes the quote for one variant.
    ///
    /// `weight` is the variant weight in kilograms; a missing weight under the
    /// `WEIGHT` method yields a zero fee.
    pub fn compute(
        method: ShippingFeeMethod,
        terms: &ShippingTerms,
        weight: Option<Decimal>,
        is_free_shipping: bool,
    ) -> Self {
        let (shipping_fee, extra_shipping_fee) = if is_free_shipping {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            match method {
                ShippingFeeMethod::Item => (terms.fee_per_item, terms.fee_for_additional_item),
                ShippingFeeMethod::Weight => {
                    let fee = round_money(terms.fee_per_kg * weight.unwrap_or(Decimal::ZERO));
                    (fee, fee)
                }
                ShippingFeeMethod::Fixed => (terms.fee_fixed, Decimal::ZERO),
            }
        };

        Self {
            shipping_fee_method: method,
            shipping_service: terms.shipping_service.clone(),
            shipping_fee,
            extra_shipping_fee,
            delivery_time_min: terms.delivery_time_min,
            delivery_time_max: terms.delivery_time_max,
            return_policy: terms.return_policy.clone(),
            is_free_shipping,
        }
    }

    /// Shipping fee for a cart/order line of `quantity` units.
    pub fn line_fee(&self, quantity: i32) -> Decimal {
        if quantity <= 0 {
            return Decimal::ZERO;
        }

        let qty = Decimal::from(quantity);
        match self.shipping_fee_method {
            ShippingFeeMethod::Item => {
                self.shipping_fee + self.extra_shipping_fee * (qty - Decimal::ONE)
            }
            ShippingFeeMethod::Weight => self.shipping_fee * qty,
            ShippingFeeMethod::Fixed => self.shipping_fee,
        }
    }
}

/// Rounds a money amount to cents, midpoints away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
