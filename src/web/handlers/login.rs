//! Login page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Template for the login page.
///
/// Renders `templates/login.html` with a token form that stores the token
/// in the `auth_token` cookie.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /login`
pub async fn login_handler() -> impl IntoResponse {
    LoginTemplate {}
}
