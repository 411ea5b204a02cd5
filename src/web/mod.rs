//! Server-rendered storefront and seller dashboard.
//!
//! Uses Askama templates from `templates/`.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Cookie authentication for the dashboard
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
