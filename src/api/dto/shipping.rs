//! DTOs for shipping rates and customer addresses.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::{AddressInput, ShippingRateInput};

/// Body of `PUT /api/seller/stores/{url}/shipping-rates`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShippingRateRequest {
    pub country_id: i64,

    #[validate(length(min = 2, max = 100, message = "Shipping service is required"))]
    pub shipping_service: String,

    pub shipping_fee_per_item: Decimal,
    pub shipping_fee_for_additional_item: Decimal,
    pub shipping_fee_per_kg: Decimal,
    pub shipping_fee_fixed: Decimal,

    #[validate(range(min = 0, max = 365))]
    pub delivery_time_min: i32,

    #[validate(range(min = 0, max = 365))]
    pub delivery_time_max: i32,

    #[serde(default)]
    pub return_policy: String,
}

impl From<ShippingRateRequest> for ShippingRateInput {
    fn from(r: ShippingRateRequest) -> Self {
        ShippingRateInput {
            country_id: r.country_id,
            shipping_service: r.shipping_service,
            shipping_fee_per_item: r.shipping_fee_per_item,
            shipping_fee_for_additional_item: r.shipping_fee_for_additional_item,
            shipping_fee_per_kg: r.shipping_fee_per_kg,
            shipping_fee_fixed: r.shipping_fee_fixed,
            delivery_time_min: r.delivery_time_min,
            delivery_time_max: r.delivery_time_max,
            return_policy: r.return_policy,
        }
    }
}

/// Body of `POST /api/addresses`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddressRequest {
    pub id: Option<i64>,

    pub country_id: i64,

    #[validate(length(min = 1, max = 50))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50))]
    pub last_name: String,

    #[validate(length(min = 5, max = 30, message = "Invalid phone number"))]
    pub phone: String,

    #[validate(length(min = 2, max = 100))]
    pub address1: String,

    #[validate(length(max = 100))]
    pub address2: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub city: String,

    #[validate(length(min = 2, max = 50))]
    pub state: String,

    #[validate(length(min = 2, max = 12))]
    pub zip_code: String,

    #[serde(default)]
    pub is_default: bool,
}

impl From<AddressRequest> for AddressInput {
    fn from(r: AddressRequest) -> Self {
        AddressInput {
            id: r.id,
            country_id: r.country_id,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            address1: r.address1,
            address2: r.address2.filter(|a| !a.trim().is_empty()),
            city: r.city,
            state: r.state,
            zip_code: r.zip_code,
            is_default: r.is_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fees_accept_strings_and_numbers() {
        let r: Result<ShippingRateRequest, _> = serde_json::from_str(
            r#"{
                "country_id": 1,
                "shipping_service": "DHL",
                "shipping_fee_per_item": "4.50",
                "shipping_fee_for_additional_item": 1,
                "shipping_fee_per_kg": 0,
                "shipping_fee_fixed": "12"
            }"#,
        );
        assert!(r.is_err(), "delivery times are required");

        let r: ShippingRateRequest = serde_json::from_str(
            r#"{
                "country_id": 1,
                "shipping_service": "DHL",
                "shipping_fee_per_item": "4.50",
                "shipping_fee_for_additional_item": 1,
                "shipping_fee_per_kg": 0,
                "shipping_fee_fixed": "12",
                "delivery_time_min": 2,
                "delivery_time_max": 5
            }"#,
        )
        .unwrap();
        assert!(r.validate().is_ok());

        let input = ShippingRateInput::from(r);
        assert_eq!(input.shipping_fee_per_item, Decimal::new(450, 2));
        assert_eq!(input.shipping_fee_for_additional_item, Decimal::ONE);
        assert!(input.return_policy.is_empty());
    }

    #[test]
    fn test_blank_second_address_line_is_dropped() {
        let r: AddressRequest = serde_json::from_str(
            r#"{
                "country_id": 1,
                "first_name": "Jane",
                "last_name": "Doe",
                "phone": "+15550001",
                "address1": "1 Main St",
                "address2": "  ",
                "city": "Springfield",
                "state": "IL",
                "zip_code": "62701"
            }"#,
        )
        .unwrap();

        assert!(r.validate().is_ok());
        assert!(AddressInput::from(r).address2.is_none());
    }
}
