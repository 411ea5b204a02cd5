//! Product view event model.

/// A product page view, sent from the page handler to the view worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductView {
    pub product_id: i64,
}

impl ProductView {
    pub fn new(product_id: i64) -> Self {
        Self { product_id }
    }
}
