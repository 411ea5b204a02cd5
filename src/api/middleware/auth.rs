//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Resolve the token hash to its user
/// 3. Insert the [`crate::domain::entities::CurrentUser`] into request extensions
/// 4. Continue to next middleware/handler
///
/// Handlers read the caller with `Extension<CurrentUser>`; role checks are
/// left to the services.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token is not found or revoked
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthenticated",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Like [`layer`] but never rejects: a valid token adds the caller to the
/// request extensions, anything else leaves the request anonymous.
///
/// Used on public routes whose output depends on who asks (e.g. store owners
/// can see their pending store).
pub async fn optional_layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    if let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(&mut parts, &()).await
        && let Ok(user) = st.auth_service.authenticate(&token).await
    {
        parts.extensions.insert(user);
    }

    next.run(Request::from_parts(parts, body)).await
}
