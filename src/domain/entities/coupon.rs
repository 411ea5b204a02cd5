//! Store discount coupons.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A percentage discount redeemable on one store's items.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Coupon {
    pub id: i64,
    pub store_id: i64,
    pub code: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Whole percent, `1..=99`.
    pub discount: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether the coupon can be redeemed at `now` (inclusive bounds).
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

/// Create-or-update payload. `id: None` creates.
#[derive(Debug, Clone)]
pub struct CouponInput {
    pub id: Option<i64>,
    pub code: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub discount: i32,
}
