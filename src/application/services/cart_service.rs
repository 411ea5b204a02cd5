//! Shopping cart.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::application::services::catalog_lookup::CatalogLookup;
use crate::domain::entities::{CartDetails, CartLineInput, Coupon, CurrentUser, NewCartItem};
use crate::domain::pricing::{PricedLine, Totals, coupon_discount};
use crate::domain::repositories::{AddressRepository, CartRepository, CouponRepository};
use crate::error::AppError;

pub struct CartService {
    carts: Arc<dyn CartRepository>,
    addresses: Arc<dyn AddressRepository>,
    coupons: Arc<dyn CouponRepository>,
    catalog: CatalogLookup,
    default_country_code: String,
}

impl CartService {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        addresses: Arc<dyn AddressRepository>,
        coupons: Arc<dyn CouponRepository>,
        catalog: CatalogLookup,
    ) -> Self {
        Self {
            carts,
            addresses,
            coupons,
            catalog,
            default_country_code: "US".to_string(),
        }
    }

    pub fn with_default_country(mut self, code: impl Into<String>) -> Self {
        self.default_country_code = code.into();
        self
    }

    /// Loads the actor's cart with totals derived from its lines and the
    /// coupon as it stands now. A coupon that was deleted, has expired or no
    /// longer matches an item is left out.
    pub async fn get_cart(&self, actor: &CurrentUser) -> Result<Option<CartDetails>, AppError> {
        let Some(mut details) = self.carts.find_by_user(actor.id).await? else {
            return Ok(None);
        };

        let coupon = match details.cart.coupon_id {
            Some(coupon_id) => self
                .coupons
                .find_by_id(coupon_id)
                .await?
                .filter(|c| c.is_active_at(Utc::now()))
                .filter(|c| details.store_items(c.store_id).next().is_some()),
            None => None,
        };

        let lines: Vec<(i64, PricedLine)> = details
            .items
            .iter()
            .map(|i| (i.store_id, i.priced_line()))
            .collect();
        let totals = cart_totals(&lines, coupon.as_ref());

        details.cart.coupon_id = coupon.map(|c| c.id);
        details.cart.sub_total = totals.sub_total;
        details.cart.shipping_fees = totals.shipping_fees;
        details.cart.total = totals.total;

        Ok(Some(details))
    }

    /// Replaces the cart contents with `lines`, re-priced against the live
    /// catalog.
    ///
    /// Lines for the same size are merged, quantities are clamped to stock and
    /// sold-out sizes are dropped. Shipping is quoted for `country_code`, else
    /// the actor's default address, else the default country. A coupon already
    /// on the cart is kept while it is active and still matches an item.
    pub async fn save_cart(
        &self,
        actor: &CurrentUser,
        lines: Vec<CartLineInput>,
        country_code: Option<&str>,
    ) -> Result<CartDetails, AppError> {
        let country_id = self.resolve_country(actor, country_code).await?;

        let mut items: Vec<NewCartItem> = Vec::with_capacity(lines.len());
        for line in merge_lines(lines) {
            match self.catalog.quote_line(line, country_id).await? {
                Some(quoted) => items.push(quoted.item),
                None => debug!(size_id = line.size_id, "Dropping sold out cart line"),
            }
        }

        let kept_coupon_id = self
            .carts
            .find_by_user(actor.id)
            .await?
            .and_then(|d| d.cart.coupon_id);

        let coupon = match kept_coupon_id {
            Some(coupon_id) => self
                .coupons
                .find_by_id(coupon_id)
                .await?
                .filter(|c| c.is_active_at(Utc::now()))
                .filter(|c| items.iter().any(|i| i.store_id == c.store_id)),
            None => None,
        };

        let lines: Vec<(i64, PricedLine)> = items
            .iter()
            .map(|i| (i.store_id, i.priced_line()))
            .collect();
        let totals = cart_totals(&lines, coupon.as_ref());

        self.carts
            .save(actor.id, items, coupon.map(|c| c.id), totals)
            .await
    }

    /// Applies a coupon code to the items of its store.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown code
    /// - [`AppError::Validation`] if the cart is empty, the coupon is not
    ///   active, or no item comes from the coupon's store
    pub async fn apply_cart_coupon(
        &self,
        actor: &CurrentUser,
        code: &str,
    ) -> Result<CartDetails, AppError> {
        let details = self
            .carts
            .find_by_user(actor.id)
            .await?
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::bad_request("Cart is empty", json!({})))?;

        let code = code.trim().to_ascii_uppercase();
        let coupon = self
            .coupons
            .find_by_code(&code)
            .await?
            .ok_or_else(|| AppError::not_found("Coupon not found", json!({ "code": code })))?;

        if !coupon.is_active_at(Utc::now()) {
            return Err(AppError::bad_request(
                "Coupon is not active",
                json!({ "code": code }),
            ));
        }

        if details.store_items(coupon.store_id).next().is_none() {
            return Err(AppError::bad_request(
                "Coupon does not apply to any item in the cart",
                json!({ "code": code }),
            ));
        }

        let lines: Vec<(i64, PricedLine)> = details
            .items
            .iter()
            .map(|i| (i.store_id, i.priced_line()))
            .collect();
        let totals = cart_totals(&lines, Some(&coupon));

        let cart = self
            .carts
            .apply_coupon(details.cart.id, coupon.id, totals)
            .await?;

        Ok(CartDetails {
            cart,
            items: details.items,
        })
    }

    pub async fn clear_cart(&self, actor: &CurrentUser) -> Result<(), AppError> {
        self.carts.clear(actor.id).await
    }

    async fn resolve_country(
        &self,
        actor: &CurrentUser,
        country_code: Option<&str>,
    ) -> Result<Option<i64>, AppError> {
        if let Some(code) = country_code {
            let country = self.catalog.find_country(code).await?.ok_or_else(|| {
                AppError::bad_request("Unknown country", json!({ "country": code }))
            })?;
            return Ok(Some(country.id));
        }

        if let Some(address) = self.addresses.find_default(actor.id).await? {
            return Ok(Some(address.country_id));
        }

        Ok(self
            .catalog
            .find_country(&self.default_country_code)
            .await?
            .map(|c| c.id))
    }
}

/// Folds lines for the same size into one, keeping first-seen order.
fn merge_lines(lines: Vec<CartLineInput>) -> Vec<CartLineInput> {
    let mut merged: Vec<CartLineInput> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.size_id == line.size_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

/// Cart totals; a coupon discounts only the lines of its own store.
pub(crate) fn cart_totals(lines: &[(i64, PricedLine)], coupon: Option<&Coupon>) -> Totals {
    let totals = Totals::from_lines(lines.iter().map(|(_, line)| line));

    match coupon {
        Some(coupon) => {
            let store_total = Totals::from_lines(
                lines
                    .iter()
                    .filter(|(store_id, _)| *store_id == coupon.store_id)
                    .map(|(_, line)| line),
            )
            .total;
            totals.with_discount(coupon_discount(store_total, coupon.discount))
        }
        None => totals,
    }
}
