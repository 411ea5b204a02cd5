//! Product catalog: seller writes, public search and product pages.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::services::auth_service::{find_owned_store, require_store_owner};
use crate::application::services::catalog_lookup::CatalogLookup;
use crate::domain::delivery::{DeliveryRange, delivery_date_range};
use crate::domain::entities::{
    Country, CurrentUser, NewProduct, NewVariant, Product, ProductCard, ProductInput,
    ProductSearchFilters, RatingStatistics, Size, Store, VariantDetails,
};
use crate::domain::repositories::{
    CategoryRepository, ProductRepository, ReviewRepository, StoreRepository,
};
use crate::domain::shipping::{ShippingDetails, ShippingFeeMethod};
use crate::domain::slug::{slug_candidates, slugify};
use crate::domain::view_event::ProductView;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// What the product cache stores per slug: the product and its variants.
///
/// The store is read on every request, so status and shipping defaults
/// apply at once. Writers of products, variants and stock drop the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductBundle {
    product: Product,
    variants: Vec<VariantDetails>,
}

/// Public view of the store selling a product.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub logo: String,
    pub average_rating: Decimal,
    pub num_reviews: i32,
}

impl From<&Store> for StoreSummary {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id,
            name: store.name.clone(),
            url: store.url.clone(),
            logo: store.logo.clone(),
            average_rating: store.average_rating,
            num_reviews: store.num_reviews,
        }
    }
}

/// Everything the product page renders.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub product: Product,
    pub store: StoreSummary,
    pub variants: Vec<VariantDetails>,
    /// The variant being shown.
    pub variant: VariantDetails,
    pub is_on_sale: bool,
    pub country: Option<Country>,
    pub shipping: ShippingDetails,
    pub delivery: DeliveryRange,
    pub rating: RatingStatistics,
}

impl ProductPage {
    /// Picks a size of the shown variant for the cart.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the size belongs to another variant
    /// - [`AppError::Validation`] if it is sold out
    pub fn select_size(&self, size_id: i64) -> Result<&Size, AppError> {
        let size = self
            .variant
            .size(size_id)
            .ok_or_else(|| AppError::not_found("Size not found", json!({ "size_id": size_id })))?;

        if !size.in_stock() {
            return Err(AppError::bad_request(
                "Size is out of stock",
                json!({ "size_id": size_id }),
            ));
        }

        Ok(size)
    }
}

/// A product together with the variant that was just written.
#[derive(Debug, Clone, Serialize)]
pub struct SavedProduct {
    pub product: Product,
    pub variant: VariantDetails,
}

pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    stores: Arc<dyn StoreRepository>,
    categories: Arc<dyn CategoryRepository>,
    reviews: Arc<dyn ReviewRepository>,
    catalog: CatalogLookup,
    cache: Arc<dyn CacheService>,
    view_sender: mpsc::Sender<ProductView>,
    default_country_code: String,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        stores: Arc<dyn StoreRepository>,
        categories: Arc<dyn CategoryRepository>,
        reviews: Arc<dyn ReviewRepository>,
        catalog: CatalogLookup,
        cache: Arc<dyn CacheService>,
        view_sender: mpsc::Sender<ProductView>,
    ) -> Self {
        Self {
            products,
            stores,
            categories,
            reviews,
            catalog,
            cache,
            view_sender,
            default_country_code: "US".to_string(),
        }
    }

    /// Country used for shipping quotes when the visitor gives none.
    pub fn with_default_country(mut self, code: impl Into<String>) -> Self {
        self.default_country_code = code.into();
        self
    }

    /// Creates a product with its first variant, or updates a product and
    /// adds or updates one of its variants.
    ///
    /// Slugs come from the names on creation and never change afterwards.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] unless `actor` owns the store (or the product's store)
    /// - [`AppError::Validation`] for invalid sizes, colors, images, sale data
    ///   or a subcategory outside the category
    /// - [`AppError::NotFound`] for an unknown product or variant id
    /// - [`AppError::Conflict`] if no free slug is found
    pub async fn upsert_product(
        &self,
        actor: &CurrentUser,
        store_url: &str,
        mut input: ProductInput,
    ) -> Result<SavedProduct, AppError> {
        let store = find_owned_store(self.stores.as_ref(), actor, store_url).await?;

        input.name = input.name.trim().to_string();
        input.variant_name = input.variant_name.trim().to_string();
        validate_product(&input)?;
        self.validate_categories(input.category_id, input.sub_category_id)
            .await?;

        let Some(product_id) = input.product_id else {
            let slug = self.unique_product_slug(&slugify(&input.name)).await?;
            let variant_slug = self
                .unique_variant_slug(&slugify(&format!("{} {}", input.name, input.variant_name)))
                .await?;

            let (product, variant) = self
                .products
                .create(
                    new_product(store.id, slug, &input),
                    new_variant(variant_slug, input),
                )
                .await?;

            info!(
                product_id = product.id,
                slug = %product.slug,
                store_id = store.id,
                "Product created"
            );
            return Ok(SavedProduct { product, variant });
        };

        let existing = self.find_product(product_id).await?;
        if existing.store_id != store.id {
            return Err(AppError::forbidden(
                "Unauthorized",
                json!({ "product_id": product_id }),
            ));
        }

        let product = self
            .products
            .update(
                existing.id,
                new_product(store.id, existing.slug.clone(), &input),
            )
            .await?;

        let variant = match input.variant_id {
            Some(variant_id) => {
                let current = self
                    .products
                    .find_variant(variant_id)
                    .await?
                    .filter(|v| v.variant.product_id == product.id)
                    .ok_or_else(|| {
                        AppError::not_found("Variant not found", json!({ "variant_id": variant_id }))
                    })?;

                self.products
                    .update_variant(variant_id, new_variant(current.variant.slug, input))
                    .await?
            }
            None => {
                let variant_slug = self
                    .unique_variant_slug(&slugify(&format!(
                        "{} {}",
                        product.name, input.variant_name
                    )))
                    .await?;
                self.products
                    .add_variant(product.id, new_variant(variant_slug, input))
                    .await?
            }
        };

        self.invalidate(&product.slug).await;
        info!(product_id = product.id, variant_id = variant.variant.id, "Product updated");

        Ok(SavedProduct { product, variant })
    }

    pub async fn delete_product(&self, actor: &CurrentUser, product_id: i64) -> Result<(), AppError> {
        let product = self.find_product(product_id).await?;

        let store = self
            .stores
            .find_by_id(product.store_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Store not found", json!({ "id": product.store_id }))
            })?;
        require_store_owner(actor, &store)?;

        if !self.products.delete(product.id).await? {
            return Err(AppError::not_found(
                "Product not found",
                json!({ "product_id": product_id }),
            ));
        }

        self.invalidate(&product.slug).await;
        info!(product_id, "Product deleted");
        Ok(())
    }

    /// Searches products of active stores.
    ///
    /// # Returns
    ///
    /// The requested page of cards and the total number of matches.
    pub async fn search_products(
        &self,
        mut filters: ProductSearchFilters,
    ) -> Result<(Vec<ProductCard>, i64), AppError> {
        if let (Some(min), Some(max)) = (filters.min_price, filters.max_price)
            && min > max
        {
            return Err(AppError::bad_request(
                "Minimum price cannot exceed maximum price",
                json!({ "min_price": min, "max_price": max }),
            ));
        }

        filters.search = filters
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        filters.offset = filters.offset.max(0);
        filters.limit = filters.limit.clamp(1, 100);

        self.products.search(filters).await
    }

    /// Loads the product page for `slug`.
    ///
    /// The visitor-independent part is served from the product cache when
    /// possible. Shipping is quoted for `country_code` (or the default
    /// country) and a view is queued for the view worker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product does not exist, its store
    /// is not active, or `variant_slug` names no variant of it.
    pub async fn get_product_page(
        &self,
        slug: &str,
        variant_slug: Option<&str>,
        country_code: Option<&str>,
    ) -> Result<ProductPage, AppError> {
        let bundle = self.load_bundle(slug).await?;

        let store = self
            .stores
            .find_by_id(bundle.product.store_id)
            .await?
            .filter(Store::is_active)
            .ok_or_else(|| AppError::not_found("Product not found", json!({ "slug": slug })))?;

        let variant = match variant_slug {
            Some(wanted) => bundle
                .variants
                .iter()
                .find(|v| v.variant.slug == wanted)
                .ok_or_else(|| {
                    AppError::not_found("Variant not found", json!({ "variant": wanted }))
                })?,
            None => bundle.variants.first().ok_or_else(|| {
                AppError::not_found("Product has no variants", json!({ "slug": slug }))
            })?,
        }
        .clone();

        let code = country_code.unwrap_or(&self.default_country_code);
        let country = self.catalog.find_country(code).await?;

        let shipping = self
            .catalog
            .shipping_details(
                &store,
                &bundle.product,
                &variant,
                country.as_ref().map(|c| c.id),
            )
            .await?;

        let delivery = delivery_date_range(
            Utc::now().date_naive(),
            shipping.delivery_time_min,
            shipping.delivery_time_max,
        );

        let rating = self.reviews.rating_statistics(bundle.product.id).await?;

        if let Err(e) = self.view_sender.try_send(ProductView::new(bundle.product.id)) {
            debug!("View not queued for product {}: {}", bundle.product.id, e);
        }

        Ok(ProductPage {
            is_on_sale: variant.is_on_sale_at(Utc::now()),
            store: StoreSummary::from(&store),
            product: bundle.product,
            variants: bundle.variants,
            variant,
            country,
            shipping,
            delivery,
            rating,
        })
    }

    async fn load_bundle(&self, slug: &str) -> Result<ProductBundle, AppError> {
        if let Ok(Some(payload)) = self.cache.get_product(slug).await {
            match serde_json::from_str::<ProductBundle>(&payload) {
                Ok(bundle) => return Ok(bundle),
                Err(e) => warn!("Discarding unreadable cache entry for {}: {}", slug, e),
            }
        }

        let product = self
            .products
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found", json!({ "slug": slug })))?;

        let variants = self.products.list_variants(product.id).await?;

        let bundle = ProductBundle { product, variants };

        match serde_json::to_string(&bundle) {
            Ok(payload) => {
                let _ = self.cache.set_product(slug, &payload, None).await;
            }
            Err(e) => warn!("Failed to serialize product {} for cache: {}", slug, e),
        }

        Ok(bundle)
    }

    async fn find_product(&self, product_id: i64) -> Result<Product, AppError> {
        self.products.find_by_id(product_id).await?.ok_or_else(|| {
            AppError::not_found("Product not found", json!({ "product_id": product_id }))
        })
    }

    async fn validate_categories(
        &self,
        category_id: i64,
        sub_category_id: i64,
    ) -> Result<(), AppError> {
        if self
            .categories
            .find_category_by_id(category_id)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request(
                "Unknown category",
                json!({ "category_id": category_id }),
            ));
        }

        let sub = self
            .categories
            .find_subcategory_by_id(sub_category_id)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(
                    "Unknown subcategory",
                    json!({ "sub_category_id": sub_category_id }),
                )
            })?;

        if sub.category_id != category_id {
            return Err(AppError::bad_request(
                "Subcategory does not belong to the category",
                json!({ "category_id": category_id, "sub_category_id": sub_category_id }),
            ));
        }

        Ok(())
    }

    async fn unique_product_slug(&self, base: &str) -> Result<String, AppError> {
        for candidate in slug_candidates(base) {
            if !self.products.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(slug_exhausted(base))
    }

    async fn unique_variant_slug(&self, base: &str) -> Result<String, AppError> {
        for candidate in slug_candidates(base) {
            if !self.products.variant_slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(slug_exhausted(base))
    }

    async fn invalidate(&self, slug: &str) {
        if let Err(e) = self.cache.invalidate_product(slug).await {
            warn!("Failed to invalidate cache for {}: {}", slug, e);
        }
    }
}

fn slug_exhausted(base: &str) -> AppError {
    AppError::conflict(
        "Could not find a free slug, choose a different name",
        json!({ "slug": base }),
    )
}

fn new_product(store_id: i64, slug: String, input: &ProductInput) -> NewProduct {
    NewProduct {
        store_id,
        category_id: input.category_id,
        sub_category_id: input.sub_category_id,
        name: input.name.clone(),
        description: input.description.clone(),
        slug,
        brand: input.brand.trim().to_string(),
        shipping_fee_method: input.shipping_fee_method,
        free_shipping_country_ids: input.free_shipping_country_ids.clone(),
    }
}

fn new_variant(slug: String, input: ProductInput) -> NewVariant {
    let keywords = input
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    NewVariant {
        name: input.variant_name,
        description: input.variant_description,
        slug,
        image: input.variant_image,
        sku: input.sku.trim().to_string(),
        keywords,
        weight: input.weight,
        is_sale: input.is_sale,
        sale_end_date: if input.is_sale { input.sale_end_date } else { None },
        sizes: input.sizes,
        colors: input
            .colors
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect(),
        images: input.images,
    }
}

fn invalid(message: &str, details: serde_json::Value) -> AppError {
    AppError::bad_request(message, details)
}

fn validate_product(input: &ProductInput) -> Result<(), AppError> {
    let name_len = input.name.chars().count();
    if !(2..=200).contains(&name_len) {
        return Err(invalid(
            "Product name must be 2-200 characters",
            json!({ "provided_length": name_len }),
        ));
    }

    if input.variant_name.is_empty() {
        return Err(invalid("Variant name is required", json!({})));
    }

    if input.sizes.is_empty() {
        return Err(invalid("At least one size is required", json!({})));
    }

    for size in &input.sizes {
        if size.size.trim().is_empty()
            || size.price <= Decimal::ZERO
            || size.quantity < 0
            || size.discount < Decimal::ZERO
            || size.discount > Decimal::ONE_HUNDRED
        {
            return Err(invalid(
                "Each size needs a label, a positive price, a discount of 0-100 and a non-negative quantity",
                json!({ "size": size.size }),
            ));
        }
    }

    if input.colors.iter().all(|c| c.trim().is_empty()) {
        return Err(invalid("At least one color is required", json!({})));
    }

    if input.images.is_empty() {
        return Err(invalid("At least one image is required", json!({})));
    }

    if input.is_sale && input.sale_end_date.is_none() {
        return Err(invalid(
            "A sale end date is required for products on sale",
            json!({}),
        ));
    }

    match input.weight {
        Some(weight) if weight < Decimal::ZERO => {
            return Err(invalid("Weight cannot be negative", json!({ "weight": weight })));
        }
        None if input.shipping_fee_method == ShippingFeeMethod::Weight => {
            return Err(invalid(
                "Weight is required when shipping is charged by weight",
                json!({}),
            ));
        }
        _ => {}
    }

    Ok(())
}
