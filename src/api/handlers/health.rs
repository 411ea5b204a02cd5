//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Counts the seeded countries
/// 2. **View Queue**: Checks if the channel is open and reports free capacity
/// 3. **Cache**: Redis PING (always healthy when caching is disabled)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 249 countries" },
///     "view_queue": { "status": "ok", "message": "Capacity: 10000" },
///     "cache": { "status": "ok", "message": "Cache reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let queue_check = check_view_queue(&state);
    let cache_check = check_cache(&state).await;

    let all_healthy = db_check.is_ok() && queue_check.is_ok() && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            view_queue: queue_check,
            cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    let result: Result<i64, sqlx::Error> = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
        .fetch_one(state.pool.as_ref())
        .await;

    match result {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} countries")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

fn check_view_queue(state: &AppState) -> CheckStatus {
    if state.view_sender.is_closed() {
        CheckStatus::error("View queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.view_sender.capacity()))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache connection failed")
    }
}
