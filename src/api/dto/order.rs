//! DTOs for checkout, order history and fulfilment.

use serde::Deserialize;

use super::pagination::PaginationParams;
use crate::domain::entities::{OrderStatus, PaymentStatus, ProductStatus};

/// Body of `POST /api/orders`.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address_id: i64,
}

/// Query of `GET /api/orders`.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    pub order_status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Body of `PATCH /api/seller/stores/{url}/orders/{group_id}/status`.
#[derive(Debug, Deserialize)]
pub struct GroupStatusRequest {
    pub status: OrderStatus,
}

/// Body of `PATCH /api/seller/stores/{url}/order-items/{item_id}/status`.
#[derive(Debug, Deserialize)]
pub struct ItemStatusRequest {
    pub status: ProductStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_filters() {
        let q: OrderListQuery =
            serde_json::from_str(r#"{"page": "1", "payment_status": "PAID"}"#).unwrap();
        assert_eq!(q.payment_status, Some(PaymentStatus::Paid));
        assert!(q.order_status.is_none());
    }

    #[test]
    fn test_item_status_spelling() {
        let r: ItemStatusRequest =
            serde_json::from_str(r#"{"status": "READY_FOR_SHIPMENT"}"#).unwrap();
        assert_eq!(r.status, ProductStatus::ReadyForShipment);
    }
}
