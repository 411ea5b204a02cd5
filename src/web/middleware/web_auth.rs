//! Cookie-based authentication middleware for the seller dashboard.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;

/// Name of the cookie holding the raw API token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticates dashboard requests using the `auth_token` cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: auth_token=<token>
/// ```
///
/// On success the [`crate::domain::entities::CurrentUser`] is inserted into
/// the request extensions, like the API auth middleware does.
///
/// # Errors
///
/// Redirects to `/login` if the cookie is missing or the token is invalid or
/// revoked. Role checks stay with the handlers, which answer 403.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let Some(token) = cookie_value(req.headers(), AUTH_COOKIE) else {
        return Err(Redirect::to("/login"));
    };

    match st.auth_service.authenticate(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(_) => Err(Redirect::to("/login")),
    }
}

/// Finds `name` in the `Cookie` header, which may carry several
/// `key=value` pairs separated by semicolons.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(COOKIE)
        .and_then(|header| header.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let (key, value) = cookie.trim().split_once('=')?;
                (key == name && !value.is_empty()).then(|| value.to_string())
            })
        })
}
