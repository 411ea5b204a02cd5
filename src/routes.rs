//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /health`             - Health check: DB, cache, view queue (public)
//! - `POST /webhooks/payments`  - Payment provider callback (HMAC signed)
//! - `/api/*`                   - REST API (catalog public, the rest Bearer token)
//! - `/`, `/products/*`, `/stores/*`, `/login` - Storefront pages
//! - `/seller/*`                - Seller dashboard (cookie session required)
//! - `/static/*`                - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token (API) or cookie session (web)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, payment_webhook_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_public = api::routes::public_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_layer,
        ))
        .layer(rate_limit::layer(behind_proxy));

    let api_protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer(behind_proxy));

    let api_router = Router::new().merge(api_public).merge(api_protected);

    let webhooks = Router::new()
        .route("/payments", post(payment_webhook_handler))
        .layer(rate_limit::secure_layer(behind_proxy));

    let web_protected = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .layer(rate_limit::secure_layer(behind_proxy));

    let web_public = web::routes::public_routes().layer(rate_limit::layer(behind_proxy));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest("/webhooks", webhooks)
        .merge(web_public)
        .merge(web_protected)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
