//! Checkout, order history, seller fulfilment and payment outcomes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::application::services::auth_service::find_owned_store;
use crate::application::services::catalog_lookup::{CatalogLookup, QuotedLine};
use crate::domain::entities::{
    CartLineInput, CurrentUser, NewOrder, NewOrderGroup, NewOrderItem, NewPayment, Order,
    OrderDetails, OrderFilter, OrderGroup, OrderItem, OrderStatus, PaymentDetails,
    PaymentOutcome, PaymentStatus, ProductStatus, StoreOrderGroup, group_totals,
};
use crate::domain::pricing::{PricedLine, Totals};
use crate::domain::repositories::{
    AddressRepository, CartRepository, CouponRepository, OrderRepository, StoreRepository,
};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::signing::verify_hmac_hex;

/// Body of a payment webhook call.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    pub order_id: i64,
    pub payment_intent_id: String,
    pub status: PaymentOutcome,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "card".to_string()
}

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
    addresses: Arc<dyn AddressRepository>,
    coupons: Arc<dyn CouponRepository>,
    stores: Arc<dyn StoreRepository>,
    catalog: CatalogLookup,
    cache: Arc<dyn CacheService>,
    webhook_secret: String,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartRepository>,
        addresses: Arc<dyn AddressRepository>,
        coupons: Arc<dyn CouponRepository>,
        stores: Arc<dyn StoreRepository>,
        catalog: CatalogLookup,
        cache: Arc<dyn CacheService>,
        webhook_secret: String,
    ) -> Self {
        Self {
            orders,
            carts,
            addresses,
            coupons,
            stores,
            catalog,
            cache,
            webhook_secret,
        }
    }

    /// Turns the actor's cart into an order shipped to one of their addresses.
    ///
    /// Every line is re-priced for the address's country and must still be
    /// fully in stock. Lines are split into one group per store, each with its
    /// own shipping service, delivery window and totals; the cart coupon
    /// discounts the group of its store. Stock, sales and the cart are updated
    /// in the same transaction as the insert; cached pages of the ordered
    /// products are dropped afterwards.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the address is not the actor's
    /// - [`AppError::Validation`] if the cart is empty or a line lacks stock
    pub async fn place_order(
        &self,
        actor: &CurrentUser,
        shipping_address_id: i64,
    ) -> Result<Order, AppError> {
        let address = self
            .addresses
            .find_by_id(shipping_address_id)
            .await?
            .filter(|a| a.user_id == actor.id)
            .ok_or_else(|| {
                AppError::not_found("Address not found", json!({ "id": shipping_address_id }))
            })?;

        let cart = self
            .carts
            .find_by_user(actor.id)
            .await?
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::bad_request("Cart is empty", json!({})))?;

        let mut by_store: BTreeMap<i64, Vec<QuotedLine>> = BTreeMap::new();
        for item in &cart.items {
            let line = CartLineInput {
                product_id: item.product_id,
                variant_id: item.variant_id,
                size_id: item.size_id,
                quantity: item.quantity,
            };

            let quoted = self
                .catalog
                .quote_line(line, Some(address.country_id))
                .await?
                .filter(|q| !q.is_clamped())
                .ok_or_else(|| {
                    AppError::bad_request(
                        "Insufficient stock",
                        json!({ "sku": item.sku, "size": item.size, "requested": item.quantity }),
                    )
                })?;

            by_store.entry(quoted.item.store_id).or_default().push(quoted);
        }

        let coupon = match cart.cart.coupon_id {
            Some(id) => self
                .coupons
                .find_by_id(id)
                .await?
                .filter(|c| c.is_active_at(Utc::now())),
            None => None,
        };

        let groups: Vec<NewOrderGroup> = by_store
            .into_iter()
            .map(|(store_id, lines)| {
                let group_coupon = coupon.as_ref().filter(|c| c.store_id == store_id);
                build_group(store_id, lines, group_coupon.map(|c| (c.id, c.discount)))
            })
            .collect();

        let totals = Totals::sum(groups.iter().map(|g| &g.totals));

        let order = self
            .orders
            .create(NewOrder {
                user_id: actor.id,
                shipping_address_id: address.id,
                totals,
                groups,
            })
            .await?;

        let slugs: BTreeSet<&str> = cart.items.iter().map(|i| i.product_slug.as_str()).collect();
        for slug in slugs {
            if let Err(e) = self.cache.invalidate_product(slug).await {
                warn!("Failed to invalidate cache for {}: {}", slug, e);
            }
        }

        info!(
            order_id = order.id,
            user_id = actor.id,
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }

    /// Loads an order with its groups, address and payment.
    pub async fn get_order(&self, actor: &CurrentUser, id: i64) -> Result<OrderDetails, AppError> {
        let details = self
            .orders
            .find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found", json!({ "id": id })))?;

        if details.order.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::forbidden("Unauthorized", json!({ "order_id": id })));
        }

        Ok(details)
    }

    pub async fn list_user_orders(
        &self,
        actor: &CurrentUser,
        mut filter: OrderFilter,
    ) -> Result<(Vec<Order>, i64), AppError> {
        filter.offset = filter.offset.max(0);
        filter.limit = filter.limit.clamp(1, 100);
        self.orders.list_by_user(actor.id, filter).await
    }

    /// Applies a coupon to one store's group of an unpaid order.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] if the group already has a coupon
    /// - [`AppError::Validation`] if the order is paid, the coupon is not
    ///   active or belongs to another store
    pub async fn apply_group_coupon(
        &self,
        actor: &CurrentUser,
        order_id: i64,
        group_id: i64,
        code: &str,
    ) -> Result<OrderDetails, AppError> {
        let details = self.get_order(actor, order_id).await?;

        if details.order.payment_status != PaymentStatus::Pending {
            return Err(AppError::bad_request(
                "Coupons can only be applied to unpaid orders",
                json!({ "order_id": order_id }),
            ));
        }

        let group = details
            .groups
            .iter()
            .find(|g| g.group.id == group_id)
            .ok_or_else(|| AppError::not_found("Order group not found", json!({ "id": group_id })))?;

        if group.group.coupon_id.is_some() {
            return Err(AppError::conflict(
                "Coupon already applied to this group",
                json!({ "group_id": group_id }),
            ));
        }

        let code = code.trim().to_ascii_uppercase();
        let coupon = self
            .coupons
            .find_by_code(&code)
            .await?
            .ok_or_else(|| AppError::not_found("Coupon not found", json!({ "code": code })))?;

        if !coupon.is_active_at(Utc::now()) {
            return Err(AppError::bad_request("Coupon is not active", json!({ "code": code })));
        }

        if coupon.store_id != group.group.store_id {
            return Err(AppError::bad_request(
                "Coupon does not belong to this store",
                json!({ "code": code }),
            ));
        }

        let lines: Vec<PricedLine> = group.items.iter().map(OrderItem::priced_line).collect();
        let new_group_totals = group_totals(&lines, Some(coupon.discount));

        self.orders
            .apply_group_coupon(order_id, group_id, coupon.id, new_group_totals)
            .await?;

        info!(order_id, group_id, code = %coupon.code, "Coupon applied to order group");
        self.get_order(actor, order_id).await
    }

    pub async fn list_store_orders(
        &self,
        actor: &CurrentUser,
        store_url: &str,
    ) -> Result<Vec<StoreOrderGroup>, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;
        self.orders.list_store_groups(store.id).await
    }

    pub async fn update_group_status(
        &self,
        actor: &CurrentUser,
        store_url: &str,
        group_id: i64,
        status: OrderStatus,
    ) -> Result<OrderGroup, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;

        let group = self
            .orders
            .update_group_status(store.id, group_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Order group not found", json!({ "id": group_id })))?;

        info!(group_id, status = %status, "Order group status updated");
        Ok(group)
    }

    pub async fn update_item_status(
        &self,
        actor: &CurrentUser,
        store_url: &str,
        item_id: i64,
        status: ProductStatus,
    ) -> Result<OrderItem, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;

        let item = self
            .orders
            .update_item_status(store.id, item_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Order item not found", json!({ "id": item_id })))?;

        info!(item_id, status = %status, "Order item status updated");
        Ok(item)
    }

    /// Records a payment outcome sent by the payment provider.
    ///
    /// `signature` is the hex HMAC-SHA256 of the raw `body` under the webhook
    /// secret.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] if the signature is missing or wrong
    /// - [`AppError::Validation`] for a malformed body or an amount that
    ///   differs from the order total
    /// - [`AppError::NotFound`] for an unknown order
    /// - [`AppError::Conflict`] if the outcome cannot follow the order's
    ///   payment status (a failure after payment, a refund before it)
    ///
    /// A repeated event for the payment intent already recorded with the
    /// same status returns the stored payment unchanged.
    pub async fn record_payment(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<PaymentDetails, AppError> {
        let verified = signature
            .is_some_and(|sig| verify_hmac_hex(&self.webhook_secret, body, sig));
        if !verified {
            warn!("Rejected payment webhook with invalid signature");
            return Err(AppError::unauthorized(
                "Unauthenticated",
                json!({ "reason": "Invalid webhook signature" }),
            ));
        }

        let event: PaymentEvent = serde_json::from_slice(body).map_err(|e| {
            AppError::bad_request("Malformed payment event", json!({ "reason": e.to_string() }))
        })?;

        let order = self
            .orders
            .find_by_id(event.order_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Order not found", json!({ "id": event.order_id }))
            })?;

        if event.amount != order.total {
            return Err(AppError::bad_request(
                "Payment amount does not match the order total",
                json!({ "amount": event.amount, "total": order.total }),
            ));
        }

        let (payment_status, order_status) = event.status.statuses();

        if order.payment_status == payment_status
            && let Some(existing) = self
                .orders
                .find_details(order.id)
                .await?
                .and_then(|d| d.payment)
                .filter(|p| p.payment_intent_id == event.payment_intent_id)
        {
            info!(
                order_id = order.id,
                payment_status = %payment_status,
                "Repeated payment event ignored"
            );
            return Ok(existing);
        }

        let transition_conflict = || {
            warn!(
                order_id = order.id,
                from = %order.payment_status,
                to = %payment_status,
                "Rejected payment status change"
            );
            AppError::conflict(
                "Payment status cannot change",
                json!({ "from": order.payment_status, "to": payment_status }),
            )
        };

        let from = event.status.allowed_from();
        if !from.contains(&order.payment_status) {
            return Err(transition_conflict());
        }

        let payment = self
            .orders
            .record_payment(
                NewPayment {
                    order_id: order.id,
                    payment_intent_id: event.payment_intent_id,
                    payment_method: event.payment_method,
                    status: payment_status,
                    amount: event.amount,
                    currency: event.currency.to_ascii_uppercase(),
                },
                from,
                order_status,
            )
            .await?
            .ok_or_else(transition_conflict)?;

        info!(
            order_id = order.id,
            payment_status = %payment_status,
            "Payment recorded"
        );
        Ok(payment)
    }
}

fn build_group(
    store_id: i64,
    lines: Vec<QuotedLine>,
    coupon: Option<(i64, i32)>,
) -> NewOrderGroup {
    let priced: Vec<PricedLine> = lines.iter().map(|l| l.item.priced_line()).collect();
    let totals = group_totals(&priced, coupon.map(|(_, percent)| percent));

    let (shipping_service, delivery_min, delivery_max) = lines
        .first()
        .map(|l| {
            (
                l.shipping.shipping_service.clone(),
                l.shipping.delivery_time_min,
                l.shipping.delivery_time_max,
            )
        })
        .unwrap_or_default();

    let items = lines
        .into_iter()
        .map(|l| NewOrderItem {
            product_id: l.item.product_id,
            variant_id: l.item.variant_id,
            size_id: l.item.size_id,
            product_slug: l.item.product_slug,
            variant_slug: l.item.variant_slug,
            sku: l.item.sku,
            name: l.item.name,
            image: l.item.image,
            size: l.item.size,
            quantity: l.item.quantity,
            shipping_fee: l.item.shipping_fee,
            price: l.item.price,
            total_price: l.item.total_price,
        })
        .collect();

    NewOrderGroup {
        store_id,
        coupon_id: coupon.map(|(id, _)| id),
        shipping_service,
        shipping_delivery_min: delivery_min,
        shipping_delivery_max: delivery_max,
        totals,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fixtures::{self, dec};
    use crate::domain::entities::{Cart, CartDetails, CartItem, OrderGroupDetails, Role};
    use crate::domain::repositories::{
        MockAddressRepository, MockCartRepository, MockCouponRepository, MockOrderRepository,
        MockProductRepository, MockShippingRepository, MockStoreRepository,
    };
    use crate::domain::shipping::ShippingFeeMethod;
    use crate::infrastructure::cache::MockCacheService;
    use crate::utils::signing::hmac_hex;

    const SECRET: &str = "whsec_test";

    struct Mocks {
        orders: MockOrderRepository,
        carts: MockCartRepository,
        addresses: MockAddressRepository,
        coupons: MockCouponRepository,
        stores: MockStoreRepository,
        products: MockProductRepository,
        shipping: MockShippingRepository,
        cache: MockCacheService,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                orders: MockOrderRepository::new(),
                carts: MockCartRepository::new(),
                addresses: MockAddressRepository::new(),
                coupons: MockCouponRepository::new(),
                stores: MockStoreRepository::new(),
                products: MockProductRepository::new(),
                shipping: MockShippingRepository::new(),
                cache: MockCacheService::new(),
            }
        }

        /// Product `n` (odd) sells variant `n + 1` from store 7 for product 1
        /// and store 8 otherwise, with `stock` units at 10.00.
        fn with_catalog(mut self, stock: i32) -> Self {
            self.products.expect_find_by_id().returning(|id| {
                let store_id = if id == 1 { 7 } else { 8 };
                Ok(Some(fixtures::product(id, store_id, ShippingFeeMethod::Item)))
            });
            self.products
                .expect_find_variant()
                .returning(move |id| Ok(Some(fixtures::variant(id, id - 1, &[(stock, "10.00")]))));
            self.stores
                .expect_find_by_id()
                .returning(|id| Ok(Some(fixtures::store(id, 1))));
            self.shipping.expect_find_rate().returning(|_, _| Ok(None));
            self.shipping
                .expect_is_free_shipping()
                .returning(|_, _| Ok(false));
            self
        }

        fn with_cart(mut self, items: Vec<CartItem>, coupon_id: Option<i64>) -> Self {
            self.addresses
                .expect_find_by_id()
                .returning(|id| Ok(Some(fixtures::address(id, 3, 1))));
            self.carts.expect_find_by_user().returning(move |user_id| {
                let now = Utc::now();
                Ok(Some(CartDetails {
                    cart: Cart {
                        id: 1,
                        user_id,
                        coupon_id,
                        shipping_fees: Decimal::ZERO,
                        sub_total: Decimal::ZERO,
                        total: Decimal::ZERO,
                        created_at: now,
                        updated_at: now,
                    },
                    items: items.clone(),
                }))
            });
            self
        }

        fn build(self) -> OrderService {
            let stores: Arc<dyn StoreRepository> = Arc::new(self.stores);
            let catalog = CatalogLookup::new(
                Arc::new(self.products),
                stores.clone(),
                Arc::new(self.shipping),
            );

            OrderService::new(
                Arc::new(self.orders),
                Arc::new(self.carts),
                Arc::new(self.addresses),
                Arc::new(self.coupons),
                stores,
                catalog,
                Arc::new(self.cache),
                SECRET.to_string(),
            )
        }
    }

    fn buyer() -> CurrentUser {
        fixtures::current_user(3, Role::User)
    }

    fn cart_item(product_id: i64, quantity: i32) -> CartItem {
        let variant_id = product_id + 1;
        CartItem {
            id: product_id,
            cart_id: 1,
            store_id: 0,
            product_id,
            variant_id,
            size_id: variant_id * 10,
            product_slug: "linen-shirt".to_string(),
            variant_slug: format!("linen-shirt-blue-{variant_id}"),
            sku: format!("SKU-{variant_id}"),
            name: "Linen Shirt - Blue".to_string(),
            image: String::new(),
            size: "S0".to_string(),
            price: dec("10.00"),
            quantity,
            shipping_fee: Decimal::ZERO,
            total_price: dec("10.00") * Decimal::from(quantity),
        }
    }

    fn order(id: i64, user_id: i64, total: &str) -> Order {
        let now = Utc::now();
        Order {
            id,
            user_id,
            shipping_address_id: 5,
            shipping_fees: Decimal::ZERO,
            sub_total: dec(total),
            total: dec(total),
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn group(id: i64, store_id: i64, coupon_id: Option<i64>, total: &str) -> OrderGroupDetails {
        let now = Utc::now();
        OrderGroupDetails {
            group: OrderGroup {
                id,
                order_id: 1,
                store_id,
                coupon_id,
                status: OrderStatus::Pending,
                shipping_service: "Post".to_string(),
                shipping_delivery_min: 1,
                shipping_delivery_max: 3,
                shipping_fees: Decimal::ZERO,
                sub_total: dec(total),
                total: dec(total),
                created_at: now,
                updated_at: now,
            },
            store_name: format!("Store {store_id}"),
            store_url: format!("store-{store_id}"),
            coupon_code: None,
            items: vec![OrderItem {
                id: id * 100,
                order_group_id: id,
                product_id: 1,
                variant_id: 2,
                size_id: 20,
                product_slug: "p".to_string(),
                variant_slug: "v".to_string(),
                sku: "SKU".to_string(),
                name: "Item".to_string(),
                image: String::new(),
                size: "M".to_string(),
                quantity: 1,
                shipping_fee: Decimal::ZERO,
                price: dec(total),
                total_price: dec(total),
                product_status: ProductStatus::Pending,
                created_at: now,
                updated_at: now,
            }],
        }
    }

    fn details(user_id: i64, groups: Vec<OrderGroupDetails>) -> OrderDetails {
        let total: Decimal = groups.iter().map(|g| g.group.total).sum();
        OrderDetails {
            order: order(1, user_id, &total.to_string()),
            shipping_address: None,
            payment: None,
            groups,
        }
    }

    #[tokio::test]
    async fn test_place_order_groups_by_store_with_coupon() {
        let mut mocks = Mocks::new()
            .with_catalog(10)
            .with_cart(vec![cart_item(1, 2), cart_item(3, 2)], Some(9));

        mocks
            .coupons
            .expect_find_by_id()
            .returning(|id| Ok(Some(fixtures::coupon(id, 7, "TEN", 10))));

        mocks
            .orders
            .expect_create()
            .withf(|order| {
                let by_store = |store_id| order.groups.iter().find(|g| g.store_id == store_id);
                let (Some(a), Some(b)) = (by_store(7), by_store(8)) else {
                    return false;
                };

                // Each line: 2 x 10.00 + shipping 5.00 + 2.00 = 27.00
                order.user_id == 3
                    && order.shipping_address_id == 5
                    && a.coupon_id == Some(9)
                    && a.totals.total == dec("24.30")
                    && b.coupon_id.is_none()
                    && b.totals.total == dec("27.00")
                    && a.shipping_service == "International Delivery"
                    && order.totals.total == dec("51.30")
                    && order.totals.sub_total == dec("40.00")
            })
            .times(1)
            .returning(|new_order| Ok(order(1, new_order.user_id, "51.30")));
        mocks
            .cache
            .expect_invalidate_product()
            .withf(|slug| slug == "linen-shirt")
            .times(1)
            .returning(|_| Ok(()));

        let placed = mocks.build().place_order(&buyer(), 5).await.unwrap();

        assert_eq!(placed.total, dec("51.30"));
    }

    #[tokio::test]
    async fn test_place_order_drops_cached_product_pages() {
        let mut other = cart_item(3, 1);
        other.product_slug = "wool-scarf".to_string();
        let mut mocks = Mocks::new()
            .with_catalog(10)
            .with_cart(vec![cart_item(1, 1), other, cart_item(5, 1)], None);

        mocks
            .orders
            .expect_create()
            .times(1)
            .returning(|new_order| Ok(order(1, new_order.user_id, "51.00")));
        mocks
            .cache
            .expect_invalidate_product()
            .withf(|slug| slug == "linen-shirt")
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .cache
            .expect_invalidate_product()
            .withf(|slug| slug == "wool-scarf")
            .times(1)
            .returning(|_| {
                Err(crate::infrastructure::cache::CacheError::ConnectionError(
                    "down".to_string(),
                ))
            });

        let placed = mocks.build().place_order(&buyer(), 5).await;

        assert!(placed.is_ok());
    }

    #[tokio::test]
    async fn test_place_order_insufficient_stock() {
        let mut mocks = Mocks::new()
            .with_catalog(1)
            .with_cart(vec![cart_item(1, 2)], None);
        mocks.orders.expect_create().never();

        let err = mocks.build().place_order(&buyer(), 5).await.unwrap_err();

        match err {
            AppError::Validation { message, .. } => assert_eq!(message, "Insufficient stock"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_place_order_with_foreign_address() {
        let mut mocks = Mocks::new();
        mocks
            .addresses
            .expect_find_by_id()
            .returning(|id| Ok(Some(fixtures::address(id, 42, 1))));

        let err = mocks.build().place_order(&buyer(), 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_place_order_empty_cart() {
        let mocks = Mocks::new().with_cart(vec![], None);

        let err = mocks.build().place_order(&buyer(), 5).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_order_of_other_user_forbidden() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_details()
            .returning(|_| Ok(Some(details(42, vec![]))));

        let service = mocks.build();

        let err = service.get_order(&buyer(), 1).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let admin = fixtures::current_user(1, Role::Admin);
        assert!(service.get_order(&admin, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_apply_group_coupon_discounts_group() {
        let mut mocks = Mocks::new();
        mocks.orders.expect_find_details().returning(|_| {
            Ok(Some(details(
                3,
                vec![group(10, 7, None, "100.00"), group(11, 8, None, "50.00")],
            )))
        });
        mocks
            .coupons
            .expect_find_by_code()
            .withf(|code| code == "SAVE25")
            .returning(|code| Ok(Some(fixtures::coupon(4, 7, code, 25))));
        mocks
            .orders
            .expect_apply_group_coupon()
            .withf(|order_id, group_id, coupon_id, group_totals| {
                *order_id == 1
                    && *group_id == 10
                    && *coupon_id == 4
                    && group_totals.total == dec("75.00")
                    && group_totals.sub_total == dec("100.00")
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let result = mocks
            .build()
            .apply_group_coupon(&buyer(), 1, 10, " save25 ")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_apply_group_coupon_twice_conflicts() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_details()
            .returning(|_| Ok(Some(details(3, vec![group(10, 7, Some(4), "100.00")]))));

        let err = mocks
            .build()
            .apply_group_coupon(&buyer(), 1, 10, "SAVE25")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_apply_coupon_of_other_store() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_details()
            .returning(|_| Ok(Some(details(3, vec![group(10, 7, None, "100.00")]))));
        mocks
            .coupons
            .expect_find_by_code()
            .returning(|code| Ok(Some(fixtures::coupon(4, 8, code, 25))));
        mocks.orders.expect_apply_group_coupon().never();

        let err = mocks
            .build()
            .apply_group_coupon(&buyer(), 1, 10, "SAVE25")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_group_status_requires_owner() {
        let mut mocks = Mocks::new();
        mocks
            .stores
            .expect_find_by_url()
            .returning(|_| Ok(Some(fixtures::store(7, 1))));
        mocks.orders.expect_update_group_status().never();

        let err = mocks
            .build()
            .update_group_status(
                &fixtures::current_user(2, Role::Seller),
                "store-7",
                10,
                OrderStatus::Shipped,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    fn payment_body(amount: &str, status: &str) -> Vec<u8> {
        json!({
            "order_id": 1,
            "payment_intent_id": "pi_123",
            "status": status,
            "amount": amount,
            "currency": "usd",
        })
        .to_string()
        .into_bytes()
    }

    fn stored_payment(payment: &NewPayment) -> PaymentDetails {
        let now = Utc::now();
        PaymentDetails {
            id: 1,
            order_id: payment.order_id,
            payment_intent_id: payment.payment_intent_id.clone(),
            payment_method: payment.payment_method.clone(),
            status: payment.status.to_string(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn order_with_payment(payment_status: PaymentStatus) -> Order {
        let mut paid = order(1, 3, "51.30");
        paid.payment_status = payment_status;
        paid
    }

    async fn send_payment(mocks: Mocks, status: &str) -> Result<PaymentDetails, AppError> {
        let body = payment_body("51.30", status);
        mocks
            .build()
            .record_payment(&body, Some(&hmac_hex(SECRET, &body)))
            .await
    }

    #[tokio::test]
    async fn test_failed_event_after_payment_keeps_order_paid() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order_with_payment(PaymentStatus::Paid))));
        mocks.orders.expect_record_payment().never();

        let err = send_payment(mocks, "failed").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_refund_requires_paid_order() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order_with_payment(PaymentStatus::Pending))));
        mocks.orders.expect_record_payment().never();

        let err = send_payment(mocks, "refunded").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order_with_payment(PaymentStatus::Paid))));
        mocks
            .orders
            .expect_record_payment()
            .withf(|payment, from, order_status| {
                payment.status == PaymentStatus::Refunded
                    && from.to_vec() == vec![PaymentStatus::Paid]
                    && order_status.is_none()
            })
            .times(1)
            .returning(|payment, _, _| Ok(Some(stored_payment(&payment))));

        let payment = send_payment(mocks, "refunded").await.unwrap();
        assert_eq!(payment.status, "REFUNDED");
    }

    #[tokio::test]
    async fn test_repeated_success_event_is_idempotent() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order_with_payment(PaymentStatus::Paid))));
        mocks.orders.expect_find_details().returning(|_| {
            let mut paid = details(3, vec![]);
            paid.payment = Some(stored_payment(&NewPayment {
                order_id: 1,
                payment_intent_id: "pi_123".to_string(),
                payment_method: "card".to_string(),
                status: PaymentStatus::Paid,
                amount: dec("51.30"),
                currency: "USD".to_string(),
            }));
            Ok(Some(paid))
        });
        mocks.orders.expect_record_payment().never();

        let payment = send_payment(mocks, "succeeded").await.unwrap();

        assert_eq!(payment.payment_intent_id, "pi_123");
        assert_eq!(payment.status, "PAID");
    }

    #[tokio::test]
    async fn test_payment_status_changed_concurrently() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order_with_payment(PaymentStatus::Pending))));
        mocks
            .orders
            .expect_record_payment()
            .times(1)
            .returning(|_, _, _| Ok(None));

        let err = send_payment(mocks, "failed").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_payment_webhook_rejects_bad_signature() {
        let mut mocks = Mocks::new();
        mocks.orders.expect_find_by_id().never();
        let service = mocks.build();

        let body = payment_body("51.30", "succeeded");

        let err = service
            .record_payment(&body, Some(&hmac_hex("wrong", &body)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));

        let err = service.record_payment(&body, None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_payment_webhook_amount_must_match() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(order(id, 3, "51.30"))));
        mocks.orders.expect_record_payment().never();

        let body = payment_body("10.00", "succeeded");
        let err = mocks
            .build()
            .record_payment(&body, Some(&hmac_hex(SECRET, &body)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_payment_webhook_success_confirms_order() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(order(id, 3, "51.30"))));
        mocks
            .orders
            .expect_record_payment()
            .withf(|payment, from, order_status| {
                payment.status == PaymentStatus::Paid
                    && payment.currency == "USD"
                    && payment.payment_method == "card"
                    && from.contains(&PaymentStatus::Pending)
                    && *order_status == Some(OrderStatus::Confirmed)
            })
            .times(1)
            .returning(|payment, _, _| Ok(Some(stored_payment(&payment))));

        let body = payment_body("51.30", "succeeded");
        let payment = mocks
            .build()
            .record_payment(&body, Some(&hmac_hex(SECRET, &body)))
            .await
            .unwrap();

        assert_eq!(payment.status, "PAID");
    }
}
