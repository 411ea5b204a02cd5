//! DTOs for the shopping cart.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::CartLineInput;

/// Body of `PUT /api/cart`. Replaces the cart contents.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveCartRequest {
    #[validate(length(max = 100, message = "A cart holds at most 100 lines"))]
    #[validate(nested)]
    pub items: Vec<CartLineRequest>,

    /// ISO country code to quote shipping for; defaults to the caller's
    /// default address.
    #[validate(length(equal = 2))]
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CartLineRequest {
    pub product_id: i64,
    pub variant_id: i64,
    pub size_id: i64,

    #[validate(range(min = 1, max = 1000))]
    pub quantity: i32,
}

impl From<&CartLineRequest> for CartLineInput {
    fn from(r: &CartLineRequest) -> Self {
        CartLineInput {
            product_id: r.product_id,
            variant_id: r.variant_id,
            size_id: r.size_id,
            quantity: r.quantity,
        }
    }
}

/// Body of `POST /api/cart/coupon` and `POST /api/orders/{id}/groups/{group_id}/coupon`.
#[derive(Debug, Deserialize, Validate)]
pub struct CouponCodeRequest {
    #[validate(length(min = 2, max = 50))]
    pub code: String,
}
