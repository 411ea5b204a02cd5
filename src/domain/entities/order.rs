//! Orders, per-store order groups, order items and payment records.
//!
//! An order is split into one [`OrderGroup`] per store. Each group carries its
//! own shipping service, delivery window, status and coupon; money amounts of
//! groups and orders are always derived from their items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::entities::ShippingAddress;
use crate::domain::pricing::{PricedLine, Totals, coupon_discount};

text_enum! {
    /// Fulfilment status of an order or an order group.
    OrderStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Processing => "PROCESSING",
        Shipped => "SHIPPED",
        OutForDelivery => "OUT_FOR_DELIVERY",
        Delivered => "DELIVERED",
        Cancelled => "CANCELLED",
        Failed => "FAILED",
        Refunded => "REFUNDED",
        Returned => "RETURNED",
        PartiallyShipped => "PARTIALLY_SHIPPED",
        OnHold => "ON_HOLD",
    }
}

text_enum! {
    PaymentStatus {
        Pending => "PENDING",
        Paid => "PAID",
        Failed => "FAILED",
        Declined => "DECLINED",
        Cancelled => "CANCELLED",
        Refunded => "REFUNDED",
        PartiallyRefunded => "PARTIALLY_REFUNDED",
        Chargeback => "CHARGEBACK",
    }
}

text_enum! {
    /// Fulfilment status of a single order item.
    ProductStatus {
        Pending => "PENDING",
        Processing => "PROCESSING",
        ReadyForShipment => "READY_FOR_SHIPMENT",
        Shipped => "SHIPPED",
        Delivered => "DELIVERED",
        Canceled => "CANCELED",
        Returned => "RETURNED",
        Refunded => "REFUNDED",
        FailedDelivery => "FAILED_DELIVERY",
        OnHold => "ON_HOLD",
        Backordered => "BACKORDERED",
        PartiallyShipped => "PARTIALLY_SHIPPED",
        ExchangeRequested => "EXCHANGE_REQUESTED",
        AwaitingPickup => "AWAITING_PICKUP",
    }
}

text_enum! {
    /// Outcome reported by the payment provider's webhook.
    PaymentOutcome {
        Succeeded => "succeeded",
        Failed => "failed",
        Refunded => "refunded",
    }
}

impl PaymentOutcome {
    /// Payment status to store and, when the outcome moves the order
    /// forward, the new order status.
    pub fn statuses(&self) -> (PaymentStatus, Option<OrderStatus>) {
        match self {
            PaymentOutcome::Succeeded => (PaymentStatus::Paid, Some(OrderStatus::Confirmed)),
            PaymentOutcome::Failed => (PaymentStatus::Failed, None),
            PaymentOutcome::Refunded => (PaymentStatus::Refunded, None),
        }
    }

    /// Payment statuses the outcome may replace. A paid order only moves on
    /// to refunded; a refund needs a paid order.
    pub fn allowed_from(&self) -> &'static [PaymentStatus] {
        match self {
            PaymentOutcome::Succeeded | PaymentOutcome::Failed => {
                &[PaymentStatus::Pending, PaymentStatus::Failed, PaymentStatus::Declined]
            }
            PaymentOutcome::Refunded => &[PaymentStatus::Paid],
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub shipping_address_id: i64,
    pub shipping_fees: Decimal,
    pub sub_total: Decimal,
    pub total: Decimal,
    #[sqlx(try_from = "String")]
    pub order_status: OrderStatus,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderGroup {
    pub id: i64,
    pub order_id: i64,
    pub store_id: i64,
    pub coupon_id: Option<i64>,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub shipping_service: String,
    pub shipping_delivery_min: i32,
    pub shipping_delivery_max: i32,
    pub shipping_fees: Decimal,
    pub sub_total: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_group_id: i64,
    pub product_id: i64,
    pub variant_id: i64,
    pub size_id: i64,
    pub product_slug: String,
    pub variant_slug: String,
    pub sku: String,
    pub name: String,
    pub image: String,
    pub size: String,
    pub quantity: i32,
    pub shipping_fee: Decimal,
    pub price: Decimal,
    pub total_price: Decimal,
    #[sqlx(try_from = "String")]
    pub product_status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn priced_line(&self) -> PricedLine {
        PricedLine {
            price: self.price,
            quantity: self.quantity,
            shipping_fee: self.shipping_fee,
        }
    }
}

/// Totals of a group of items with an optional coupon percentage applied to
/// the group's merchandise and shipping.
pub fn group_totals<'a>(
    lines: impl IntoIterator<Item = &'a PricedLine>,
    coupon_percent: Option<i32>,
) -> Totals {
    let totals = Totals::from_lines(lines);
    match coupon_percent {
        Some(percent) => totals.with_discount(coupon_discount(totals.total, percent)),
        None => totals,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderGroupDetails {
    #[serde(flatten)]
    pub group: OrderGroup,
    pub store_name: String,
    pub store_url: String,
    pub coupon_code: Option<String>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub shipping_address: Option<ShippingAddress>,
    pub payment: Option<PaymentDetails>,
    pub groups: Vec<OrderGroupDetails>,
}

/// An order group as seen from the selling store's dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct StoreOrderGroup {
    #[serde(flatten)]
    pub group: OrderGroup,
    pub customer_name: String,
    pub customer_email: String,
    pub payment_status: PaymentStatus,
    pub items: Vec<OrderItem>,
}

/// Narrowing and paging of a user's order history.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub order_status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub variant_id: i64,
    pub size_id: i64,
    pub product_slug: String,
    pub variant_slug: String,
    pub sku: String,
    pub name: String,
    pub image: String,
    pub size: String,
    pub quantity: i32,
    pub shipping_fee: Decimal,
    pub price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderGroup {
    pub store_id: i64,
    pub coupon_id: Option<i64>,
    pub shipping_service: String,
    pub shipping_delivery_min: i32,
    pub shipping_delivery_max: i32,
    pub totals: Totals,
    pub items: Vec<NewOrderItem>,
}

/// A fully computed order ready to be written in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub shipping_address_id: i64,
    pub totals: Totals,
    pub groups: Vec<NewOrderGroup>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentDetails {
    pub id: i64,
    pub order_id: i64,
    pub payment_intent_id: String,
    pub payment_method: String,
    pub status: String,
    pub amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment outcome to persist for an order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub order_id: i64,
    pub payment_intent_id: String,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub amount: Decimal,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn lines() -> Vec<PricedLine> {
        vec![
            PricedLine {
                price: dec("20.00"),
                quantity: 2,
                shipping_fee: dec("4.00"),
            },
            PricedLine {
                price: dec("6.00"),
                quantity: 1,
                shipping_fee: dec("0"),
            },
        ]
    }

    #[test]
    fn test_payment_outcome_statuses() {
        let outcome: PaymentOutcome = serde_json::from_str("\"succeeded\"").unwrap();
        assert_eq!(
            outcome.statuses(),
            (PaymentStatus::Paid, Some(OrderStatus::Confirmed))
        );
        assert_eq!(PaymentOutcome::Failed.statuses().0, PaymentStatus::Failed);
        assert_eq!(PaymentOutcome::Refunded.statuses(), (PaymentStatus::Refunded, None));
    }

    #[test]
    fn test_payment_transitions() {
        let paid = PaymentStatus::Paid;
        assert!(!PaymentOutcome::Failed.allowed_from().contains(&paid));
        assert!(!PaymentOutcome::Succeeded.allowed_from().contains(&paid));
        assert!(PaymentOutcome::Refunded.allowed_from().contains(&paid));
        assert!(!PaymentOutcome::Refunded
            .allowed_from()
            .contains(&PaymentStatus::Pending));
        assert!(PaymentOutcome::Succeeded
            .allowed_from()
            .contains(&PaymentStatus::Failed));
    }

    #[test]
    fn test_group_totals_without_coupon() {
        let totals = group_totals(&lines(), None);
        assert_eq!(totals.sub_total, dec("46.00"));
        assert_eq!(totals.shipping_fees, dec("4.00"));
        assert_eq!(totals.total, dec("50.00"));
    }

    #[test]
    fn test_group_totals_with_coupon() {
        let totals = group_totals(&lines(), Some(10));
        assert_eq!(totals.sub_total, dec("46.00"));
        assert_eq!(totals.total, dec("45.00"));
    }

    #[test]
    fn test_status_spellings() {
        assert_eq!(OrderStatus::OutForDelivery.as_str(), "OUT_FOR_DELIVERY");
        assert_eq!(
            "PARTIALLY_REFUNDED".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::PartiallyRefunded
        );
        assert_eq!(
            "AWAITING_PICKUP".parse::<ProductStatus>().unwrap(),
            ProductStatus::AwaitingPickup
        );
        assert!("CANCELED".parse::<OrderStatus>().is_err());
    }
}
