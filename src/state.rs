//! Shared application state handed to every handler.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{
    AddressService, AuthService, CartService, CatalogLookup, CategoryService, CouponService,
    OrderService, ProductService, ReviewService, ShippingService, StoreService,
};
use crate::config::Config;
use crate::domain::repositories::{
    AddressRepository, CartRepository, CouponRepository, ProductRepository, ShippingRepository,
    StoreRepository,
};
use crate::domain::view_event::ProductView;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{
    PgAddressRepository, PgCartRepository, PgCategoryRepository, PgCouponRepository,
    PgOrderRepository, PgProductRepository, PgReviewRepository, PgShippingRepository,
    PgStoreRepository, PgTokenRepository,
};

/// Services and handles shared across requests.
///
/// Cloning is cheap: every field is an `Arc` or a channel sender.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub cache: Arc<dyn CacheService>,
    pub view_sender: mpsc::Sender<ProductView>,

    pub auth_service: Arc<AuthService>,
    pub category_service: Arc<CategoryService>,
    pub store_service: Arc<StoreService>,
    pub shipping_service: Arc<ShippingService>,
    pub product_service: Arc<ProductService>,
    pub review_service: Arc<ReviewService>,
    pub address_service: Arc<AddressService>,
    pub coupon_service: Arc<CouponService>,
    pub cart_service: Arc<CartService>,
    pub order_service: Arc<OrderService>,
}

impl AppState {
    /// Wires the PostgreSQL repositories into the services.
    ///
    /// `view_sender` feeds the product view worker; the caller owns the
    /// receiving end.
    pub fn new(
        pool: Arc<PgPool>,
        view_sender: mpsc::Sender<ProductView>,
        cache: Arc<dyn CacheService>,
        config: &Config,
    ) -> Self {
        let products: Arc<dyn ProductRepository> =
            Arc::new(PgProductRepository::new(pool.clone()));
        let stores: Arc<dyn StoreRepository> = Arc::new(PgStoreRepository::new(pool.clone()));
        let shipping: Arc<dyn ShippingRepository> =
            Arc::new(PgShippingRepository::new(pool.clone()));
        let addresses: Arc<dyn AddressRepository> =
            Arc::new(PgAddressRepository::new(pool.clone()));
        let coupons: Arc<dyn CouponRepository> = Arc::new(PgCouponRepository::new(pool.clone()));
        let carts: Arc<dyn CartRepository> = Arc::new(PgCartRepository::new(pool.clone()));
        let categories = Arc::new(PgCategoryRepository::new(pool.clone()));
        let reviews = Arc::new(PgReviewRepository::new(pool.clone()));

        let catalog = CatalogLookup::new(products.clone(), stores.clone(), shipping.clone());
        let country = config.default_country_code.clone();

        let auth_service = AuthService::new(
            Arc::new(PgTokenRepository::new(pool.clone())),
            config.token_signing_secret.clone(),
        );

        let product_service = ProductService::new(
            products.clone(),
            stores.clone(),
            categories.clone(),
            reviews.clone(),
            catalog.clone(),
            cache.clone(),
            view_sender.clone(),
        )
        .with_default_country(country.clone());

        let cart_service = CartService::new(
            carts.clone(),
            addresses.clone(),
            coupons.clone(),
            catalog.clone(),
        )
        .with_default_country(country);

        let order_service = OrderService::new(
            Arc::new(PgOrderRepository::new(pool.clone())),
            carts,
            addresses.clone(),
            coupons.clone(),
            stores.clone(),
            catalog,
            cache.clone(),
            config.payment_webhook_secret.clone(),
        );

        Self {
            auth_service: Arc::new(auth_service),
            category_service: Arc::new(CategoryService::new(categories.clone())),
            store_service: Arc::new(StoreService::new(stores.clone())),
            shipping_service: Arc::new(ShippingService::new(shipping.clone(), stores.clone())),
            product_service: Arc::new(product_service),
            review_service: Arc::new(ReviewService::new(reviews, products, cache.clone())),
            address_service: Arc::new(AddressService::new(addresses, shipping)),
            coupon_service: Arc::new(CouponService::new(coupons, stores)),
            cart_service: Arc::new(cart_service),
            order_service: Arc::new(order_service),
            pool,
            cache,
            view_sender,
        }
    }
}
