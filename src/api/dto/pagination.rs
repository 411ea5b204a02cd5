//! Pagination query parameters and paged responses.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers,
/// which keeps them working inside `#[serde(flatten)]` query structs.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts to database offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 20
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 100
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), String> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}"));
        }

        let offset = (page as i64 - 1) * page_size as i64;
        Ok((offset, page_size as i64))
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total_items: i64) -> Self {
        let page_size = params.page_size().max(1);
        let total_pages = (total_items.max(0) as u64).div_ceil(page_size as u64) as u32;

        Self {
            page: params.page(),
            page_size,
            total_items,
            total_pages,
        }
    }
}

/// A page of results with its pagination metadata.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub pagination: PaginationMeta,
    pub items: Vec<T>,
}

impl<T> PagedResponse<T> {
    pub fn new(params: &PaginationParams, items: Vec<T>, total_items: i64) -> Self {
        Self {
            pagination: PaginationMeta::new(params, total_items),
            items,
        }
    }
}
