//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::OptionalAuth;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Whether the visitor already has a session (switches the CTA).
    pub logged_in: bool,
}

/// Display the landing page.
pub async fn home(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        logged_in: user.is_some(),
    }
}
