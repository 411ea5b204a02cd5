//! Repository trait for orders, order groups and payments.

use crate::domain::entities::{
    NewOrder, NewPayment, Order, OrderDetails, OrderFilter, OrderGroup, OrderItem, OrderStatus,
    PaymentDetails, PaymentStatus, ProductStatus, StoreOrderGroup,
};
use crate::domain::pricing::Totals;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for checkout data.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgOrderRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_order.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Writes the order in one transaction: order, groups and items are
    /// inserted, size stock is decremented, variant and product sales are
    /// incremented and the user's cart is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any size no longer has enough stock;
    /// nothing is written in that case.
    async fn create(&self, order: NewOrder) -> Result<Order, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, AppError>;

    /// Loads the order with its address, payment and groups with items.
    async fn find_details(&self, id: i64) -> Result<Option<OrderDetails>, AppError>;

    /// A user's orders, newest first.
    ///
    /// # Returns
    ///
    /// The requested page and the total number of matches.
    async fn list_by_user(
        &self,
        user_id: i64,
        filter: OrderFilter,
    ) -> Result<(Vec<Order>, i64), AppError>;

    /// Stores a group coupon with the recomputed group totals and re-sums the
    /// order totals from its groups, in one transaction.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] if the group already has a coupon
    /// - [`AppError::Validation`] if the order is no longer unpaid
    ///
    /// Nothing is written in either case.
    async fn apply_group_coupon(
        &self,
        order_id: i64,
        group_id: i64,
        coupon_id: i64,
        group_totals: Totals,
    ) -> Result<(), AppError>;

    /// Order groups sold by a store, newest first, with their items and customer.
    async fn list_store_groups(&self, store_id: i64) -> Result<Vec<StoreOrderGroup>, AppError>;

    /// Sets the status of a group belonging to `store_id`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the group does not exist or belongs to another store.
    async fn update_group_status(
        &self,
        store_id: i64,
        group_id: i64,
        status: OrderStatus,
    ) -> Result<Option<OrderGroup>, AppError>;

    /// Sets the status of an item whose group belongs to `store_id`.
    async fn update_item_status(
        &self,
        store_id: i64,
        item_id: i64,
        status: ProductStatus,
    ) -> Result<Option<OrderItem>, AppError>;

    /// Upserts the payment record and updates the order's payment status,
    /// method and (when given) order status in one transaction.
    ///
    /// # Returns
    ///
    /// `Ok(None)` without writing anything if the order's payment status is
    /// no longer one of `from`.
    async fn record_payment(
        &self,
        payment: NewPayment,
        from: &[PaymentStatus],
        order_status: Option<OrderStatus>,
    ) -> Result<Option<PaymentDetails>, AppError>;
}
