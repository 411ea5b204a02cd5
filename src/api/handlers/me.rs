//! Handler describing the authenticated caller.

use axum::{Extension, Json};

use crate::domain::entities::CurrentUser;

/// `GET /api/me` - the user the bearer token belongs to, with its role.
pub async fn me_handler(Extension(actor): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(actor)
}
