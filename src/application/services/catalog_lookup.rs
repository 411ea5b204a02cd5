//! Live catalog lookups shared by the product, cart and order services.
//!
//! Cart lines are never trusted: every time a cart is saved or an order is
//! placed each line is re-read from the catalog, clamped to the remaining
//! stock and re-priced with the current discount and shipping terms.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::entities::{
    CartLineInput, Country, NewCartItem, Product, Store, VariantDetails,
};
use crate::domain::repositories::{ProductRepository, ShippingRepository, StoreRepository};
use crate::domain::shipping::{ShippingDetails, resolve_terms, round_money};
use crate::error::AppError;

/// A cart line re-priced against the current catalog.
#[derive(Debug, Clone)]
pub struct QuotedLine {
    pub item: NewCartItem,
    pub shipping: ShippingDetails,
    /// Quantity the caller asked for, before clamping to stock.
    pub requested: i32,
}

impl QuotedLine {
    pub fn is_clamped(&self) -> bool {
        self.item.quantity < self.requested
    }
}

#[derive(Clone)]
pub struct CatalogLookup {
    products: Arc<dyn ProductRepository>,
    stores: Arc<dyn StoreRepository>,
    shipping: Arc<dyn ShippingRepository>,
}

impl CatalogLookup {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        stores: Arc<dyn StoreRepository>,
        shipping: Arc<dyn ShippingRepository>,
    ) -> Self {
        Self {
            products,
            stores,
            shipping,
        }
    }

    /// Looks up a country by ISO code (case-insensitive).
    pub async fn find_country(&self, code: &str) -> Result<Option<Country>, AppError> {
        self.shipping
            .find_country_by_code(&code.trim().to_ascii_uppercase())
            .await
    }

    /// Shipping quote for one variant of `product` sold by `store`.
    ///
    /// Without a country the store defaults apply and nothing ships free.
    pub async fn shipping_details(
        &self,
        store: &Store,
        product: &Product,
        variant: &VariantDetails,
        country_id: Option<i64>,
    ) -> Result<ShippingDetails, AppError> {
        let (rate, is_free) = match country_id {
            Some(country_id) => (
                self.shipping.find_rate(store.id, country_id).await?,
                self.shipping
                    .is_free_shipping(product.id, country_id)
                    .await?,
            ),
            None => (None, false),
        };

        let terms = resolve_terms(store, rate.as_ref());

        Ok(ShippingDetails::compute(
            product.shipping_fee_method,
            &terms,
            variant.variant.weight,
            is_free,
        ))
    }

    /// Re-prices one line.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the size is sold out; otherwise the line with its
    /// quantity clamped to the stock left.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a non-positive quantity or an inactive store
    /// - [`AppError::NotFound`] if the product, variant or size no longer exists
    pub async fn quote_line(
        &self,
        line: CartLineInput,
        country_id: Option<i64>,
    ) -> Result<Option<QuotedLine>, AppError> {
        if line.quantity <= 0 {
            return Err(AppError::bad_request(
                "Quantity must be at least 1",
                json!({ "size_id": line.size_id, "quantity": line.quantity }),
            ));
        }

        let product = self
            .products
            .find_by_id(line.product_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Product not found",
                    json!({ "product_id": line.product_id }),
                )
            })?;

        let variant = self
            .products
            .find_variant(line.variant_id)
            .await?
            .filter(|v| v.variant.product_id == product.id)
            .ok_or_else(|| {
                AppError::not_found(
                    "Variant not found",
                    json!({ "variant_id": line.variant_id }),
                )
            })?;

        let size = variant.size(line.size_id).cloned().ok_or_else(|| {
            AppError::not_found("Size not found", json!({ "size_id": line.size_id }))
        })?;

        let store = self
            .stores
            .find_by_id(product.store_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Store not found", json!({ "store_id": product.store_id }))
            })?;

        if !store.is_active() {
            return Err(AppError::bad_request(
                "Store is not accepting orders",
                json!({ "store": store.url }),
            ));
        }

        if !size.in_stock() {
            return Ok(None);
        }

        let quantity = line.quantity.min(size.quantity);
        let price = size.final_price();
        let shipping = self
            .shipping_details(&store, &product, &variant, country_id)
            .await?;
        let shipping_fee = shipping.line_fee(quantity);

        let image = variant
            .images
            .first()
            .map(|i| i.url.clone())
            .unwrap_or_else(|| variant.variant.image.clone());

        let item = NewCartItem {
            store_id: store.id,
            product_id: product.id,
            variant_id: variant.variant.id,
            size_id: size.id,
            product_slug: product.slug.clone(),
            variant_slug: variant.variant.slug.clone(),
            sku: variant.variant.sku.clone(),
            name: format!("{} - {}", product.name, variant.variant.name),
            image,
            size: size.size.clone(),
            price,
            quantity,
            shipping_fee,
            total_price: round_money(price * Decimal::from(quantity) + shipping_fee),
        };

        Ok(Some(QuotedLine {
            item,
            shipping,
            requested: line.quantity,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fixtures::{self, dec};
    use crate::domain::entities::StoreStatus;
    use crate::domain::repositories::{
        MockProductRepository, MockShippingRepository, MockStoreRepository,
    };
    use crate::domain::shipping::ShippingFeeMethod;

    fn lookup(
        products: MockProductRepository,
        stores: MockStoreRepository,
        shipping: MockShippingRepository,
    ) -> CatalogLookup {
        CatalogLookup::new(Arc::new(products), Arc::new(stores), Arc::new(shipping))
    }

    fn line(quantity: i32) -> CartLineInput {
        CartLineInput {
            product_id: 1,
            variant_id: 2,
            size_id: 20,
            quantity,
        }
    }

    fn catalog_with_stock(
        stock: i32,
        status: StoreStatus,
    ) -> (MockProductRepository, MockStoreRepository) {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|_| Ok(Some(fixtures::product(1, 7, ShippingFeeMethod::Item))));
        products
            .expect_find_variant()
            .returning(move |_| Ok(Some(fixtures::variant(2, 1, &[(stock, "20.00")]))));

        let mut stores = MockStoreRepository::new();
        stores.expect_find_by_id().returning(move |_| {
            let mut store = fixtures::store(7, 3);
            store.status = status;
            Ok(Some(store))
        });

        (products, stores)
    }

    #[tokio::test]
    async fn test_quote_clamps_to_stock_with_store_defaults() {
        let (products, stores) = catalog_with_stock(2, StoreStatus::Active);
        let lookup = lookup(products, stores, MockShippingRepository::new());

        let quoted = lookup.quote_line(line(5), None).await.unwrap().unwrap();

        assert!(quoted.is_clamped());
        assert_eq!(quoted.item.quantity, 2);
        assert_eq!(quoted.item.price, dec("20.00"));
        // Store defaults: 5.00 first item + 2.00 additional.
        assert_eq!(quoted.item.shipping_fee, dec("7.00"));
        assert_eq!(quoted.item.total_price, dec("47.00"));
        assert_eq!(quoted.item.store_id, 7);
    }

    #[tokio::test]
    async fn test_quote_drops_sold_out_size() {
        let (products, stores) = catalog_with_stock(0, StoreStatus::Active);
        let lookup = lookup(products, stores, MockShippingRepository::new());

        assert!(lookup.quote_line(line(1), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quote_rejects_inactive_store() {
        let (products, stores) = catalog_with_stock(3, StoreStatus::Banned);
        let lookup = lookup(products, stores, MockShippingRepository::new());

        let err = lookup.quote_line(line(1), None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_quote_rejects_zero_quantity() {
        let lookup = lookup(
            MockProductRepository::new(),
            MockStoreRepository::new(),
            MockShippingRepository::new(),
        );

        let err = lookup.quote_line(line(0), None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_quote_unknown_size() {
        let (products, stores) = catalog_with_stock(3, StoreStatus::Active);
        let lookup = lookup(products, stores, MockShippingRepository::new());

        let mut input = line(1);
        input.size_id = 999;

        let err = lookup.quote_line(input, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_country_free_shipping() {
        let (products, stores) = catalog_with_stock(3, StoreStatus::Active);
        let mut shipping = MockShippingRepository::new();
        shipping.expect_find_rate().returning(|_, _| Ok(None));
        shipping
            .expect_is_free_shipping()
            .withf(|product_id, country_id| *product_id == 1 && *country_id == 44)
            .returning(|_, _| Ok(true));

        let lookup = lookup(products, stores, shipping);

        let quoted = lookup.quote_line(line(3), Some(44)).await.unwrap().unwrap();

        assert!(quoted.shipping.is_free_shipping);
        assert_eq!(quoted.item.shipping_fee, Decimal::ZERO);
        assert_eq!(quoted.item.total_price, dec("60.00"));
    }
}
