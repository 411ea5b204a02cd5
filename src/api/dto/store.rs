//! DTOs for store management.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::{StoreInput, StoreShippingDefaults, StoreStatus};

/// Body of `POST /api/seller/stores`.
#[derive(Debug, Deserialize, Validate)]
pub struct StoreRequest {
    pub id: Option<i64>,

    #[validate(length(min = 2, max = 50, message = "Name must be 2 to 50 characters"))]
    pub name: String,

    pub url: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 5, max = 30, message = "Invalid phone number"))]
    pub phone: String,

    #[validate(length(min = 30, max = 500, message = "Description must be 30 to 500 characters"))]
    pub description: String,

    #[validate(url(message = "Invalid logo URL"))]
    pub logo: String,

    #[validate(url(message = "Invalid cover URL"))]
    pub cover: String,

    #[serde(default)]
    pub featured: bool,
}

impl From<StoreRequest> for StoreInput {
    fn from(r: StoreRequest) -> Self {
        StoreInput {
            id: r.id,
            name: r.name,
            url: r.url,
            email: r.email,
            phone: r.phone,
            description: r.description,
            logo: r.logo,
            cover: r.cover,
            featured: r.featured,
        }
    }
}

/// Body of `PATCH /api/admin/stores/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StoreStatusRequest {
    pub status: StoreStatus,
}

/// Body of `PUT /api/seller/stores/{url}/shipping`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShippingDefaultsRequest {
    #[validate(length(min = 2, max = 100, message = "Shipping service is required"))]
    pub shipping_service: String,
    pub fee_per_item: Decimal,
    pub fee_for_additional_item: Decimal,
    pub fee_per_kg: Decimal,
    pub fee_fixed: Decimal,

    #[validate(range(min = 0, max = 365))]
    pub delivery_time_min: i32,

    #[validate(range(min = 0, max = 365))]
    pub delivery_time_max: i32,

    #[serde(default)]
    pub return_policy: String,
}

impl From<ShippingDefaultsRequest> for StoreShippingDefaults {
    fn from(r: ShippingDefaultsRequest) -> Self {
        StoreShippingDefaults {
            shipping_service: r.shipping_service,
            fee_per_item: r.fee_per_item,
            fee_for_additional_item: r.fee_for_additional_item,
            fee_per_kg: r.fee_per_kg,
            fee_fixed: r.fee_fixed,
            delivery_time_min: r.delivery_time_min,
            delivery_time_max: r.delivery_time_max,
            return_policy: r.return_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_status_uses_database_spelling() {
        let r: StoreStatusRequest = serde_json::from_str(r#"{"status": "BANNED"}"#).unwrap();
        assert_eq!(r.status, StoreStatus::Banned);
        assert!(serde_json::from_str::<StoreStatusRequest>(r#"{"status": "banned"}"#).is_err());
    }

    #[test]
    fn test_store_request_rejects_bad_email() {
        let r: StoreRequest = serde_json::from_str(
            r#"{
                "name": "Linen House",
                "url": "linen-house",
                "email": "not-an-email",
                "phone": "+15550100",
                "description": "Linen clothing woven in small batches since 1998.",
                "logo": "https://img.example.com/logo.png",
                "cover": "https://img.example.com/cover.png"
            }"#,
        )
        .unwrap();

        let errors = r.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(errors.field_errors().contains_key("email"));
    }
}
