//! Slugs and URL segments.
//!
//! Products and variants get slugs derived from their names; stores,
//! categories and subcategories carry a seller/admin chosen `url` segment that
//! must already be in canonical form.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

/// Canonical URL segment: lowercase letters, digits, single hyphens between words.
static URL_SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Number of numbered suffixes tried before giving up on a unique slug.
pub const MAX_SLUG_ATTEMPTS: usize = 10;

/// Segments reserved for storefront routes.
const RESERVED_SEGMENTS: &[&str] = &["api", "admin", "dashboard", "login", "static", "health"];

/// Turns free text into a slug.
///
/// Non-alphanumeric runs become a single hyphen; the result is trimmed and
/// lowercased. Text without any ASCII alphanumerics yields `"item"`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}

/// Candidate slugs in the order they are tried: `base`, `base-1`, `base-2`, ...
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string())
        .chain((1..MAX_SLUG_ATTEMPTS).map(move |n| format!("{base}-{n}")))
}

/// Validates a store/category/subcategory URL segment.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the segment is not 2-60 characters
/// of canonical form or collides with a reserved route.
pub fn validate_url_segment(url: &str) -> Result<(), AppError> {
    if url.len() < 2 || url.len() > 60 {
        return Err(AppError::bad_request(
            "URL must be 2-60 characters",
            json!({ "url": url, "provided_length": url.len() }),
        ));
    }

    if !URL_SEGMENT_REGEX.is_match(url) {
        return Err(AppError::bad_request(
            "URL can only contain lowercase letters, digits, and single hyphens",
            json!({ "url": url }),
        ));
    }

    if RESERVED_SEGMENTS.contains(&url) {
        return Err(AppError::bad_request(
            "This URL is reserved",
            json!({ "url": url }),
        ));
    }

    Ok(())
}
