//! DTOs for store coupons.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::CouponInput;

/// Body of `POST /api/seller/stores/{url}/coupons`.
///
/// The code is upper-cased by the service, so `summer10` and `SUMMER10` are
/// the same coupon.
#[derive(Debug, Deserialize, Validate)]
pub struct CouponRequest {
    pub id: Option<i64>,

    #[validate(length(min = 2, max = 50))]
    pub code: String,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[validate(range(min = 1, max = 99, message = "Discount must be between 1 and 99"))]
    pub discount: i32,
}

impl From<CouponRequest> for CouponInput {
    fn from(r: CouponRequest) -> Self {
        CouponInput {
            id: r.id,
            code: r.code,
            start_date: r.start_date,
            end_date: r.end_date,
            discount: r.discount,
        }
    }
}
