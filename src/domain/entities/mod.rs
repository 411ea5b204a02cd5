//! Core domain entities representing the marketplace data model.
//!
//! Entities map one-to-one onto table rows and derive [`sqlx::FromRow`] so the
//! PostgreSQL repositories can load them directly. Status-like columns are
//! stored as text and converted through `#[sqlx(try_from = "String")]`.
//!
//! # Entity Types
//!
//! - [`User`], [`AuthToken`], [`CurrentUser`] - Accounts and role claims
//! - [`Category`], [`SubCategory`] - Catalog taxonomy
//! - [`Store`] - Seller-owned catalog unit with its shipping defaults
//! - [`Product`], [`ProductVariant`], [`Size`], [`Color`], [`VariantImage`] - Catalog
//! - [`Country`], [`ShippingRate`], [`ShippingAddress`] - Shipping
//! - [`Cart`], [`CartItem`] - Shopping cart
//! - [`Order`], [`OrderGroup`], [`OrderItem`], [`PaymentDetails`] - Checkout
//! - [`Coupon`] - Store discount codes
//! - [`Review`] - Product reviews
//!
//! # Design Pattern
//!
//! Loaded rows use plain structs; writes use `*Input` (validated request data
//! owned by services) or `New*` (fully computed rows handed to repositories).

pub mod cart;
pub mod category;
pub mod coupon;
pub mod order;
pub mod product;
pub mod review;
pub mod shipping;
pub mod store;
pub mod user;

pub use cart::{Cart, CartDetails, CartItem, CartLineInput, NewCartItem};
pub use category::{Category, CategoryInput, SubCategory, SubCategoryInput};
pub use coupon::{Coupon, CouponInput};
pub use order::{
    NewOrder, NewOrderGroup, NewOrderItem, NewPayment, Order, OrderDetails, OrderFilter,
    OrderGroup, OrderGroupDetails, OrderItem, OrderStatus, PaymentDetails, PaymentOutcome,
    PaymentStatus, ProductStatus, StoreOrderGroup, group_totals,
};
pub use product::{
    Color, ImageInput, NewProduct, NewVariant, Product, ProductCard, ProductInput,
    ProductSearchFilters, ProductSort, ProductVariant, Size, SizeInput, VariantDetails,
    VariantImage,
};
pub use review::{
    RatingStatistics, Review, ReviewFilter, ReviewInput, ReviewSort, ReviewWithImages,
};
pub use shipping::{
    AddressInput, Country, CountryShippingRate, ShippingAddress, ShippingRate, ShippingRateInput,
};
pub use store::{Store, StoreInput, StoreShippingDefaults, StoreStatus};
pub use user::{AuthToken, CurrentUser, NewUser, Role, User};
