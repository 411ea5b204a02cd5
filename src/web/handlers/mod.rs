//! HTML template rendering handlers for the storefront and seller dashboard.

mod home;
mod login;
mod product;
mod seller;
mod store;

pub use home::home_handler;
pub use login::login_handler;
pub use product::product_handler;
pub use seller::{seller_dashboard_handler, seller_orders_handler};
pub use store::store_handler;

use crate::domain::entities::ProductSearchFilters;
use crate::domain::entities::ProductSort;

/// Number of product cards on listing pages.
const CARD_LIMIT: i64 = 24;

fn listing_filters(store_url: Option<String>, sort: ProductSort) -> ProductSearchFilters {
    ProductSearchFilters {
        store_url,
        sort,
        offset: 0,
        limit: CARD_LIMIT,
        ..Default::default()
    }
}
