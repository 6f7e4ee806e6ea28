//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB ping)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/signup            - Signup page
//! POST /auth/signup            - Signup action
//! POST /auth/logout            - Logout action
//!
//! # Dashboard (requires auth)
//! GET  /dashboard                           - Projects + entries, full reload
//! POST /dashboard/projects                  - Create project (quota-gated)
//! POST /dashboard/projects/{id}/delete      - Delete project
//! POST /dashboard/projects/{id}/entries     - Add proof entry
//! POST /dashboard/entries/{id}/delete       - Delete proof entry
//!
//! # Billing (out-of-band collaborator)
//! POST /api/billing/webhook    - Signed upgrade confirmation
//! ```

pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/projects", post(dashboard::create_project))
        .route("/projects/{id}/delete", post(dashboard::delete_project))
        .route("/projects/{id}/entries", post(dashboard::add_entry))
        .route("/entries/{id}/delete", post(dashboard::delete_entry))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home::home))
        // Auth routes
        .nest("/auth", auth_routes())
        // Dashboard routes
        .nest("/dashboard", dashboard_routes())
        // Billing webhook
        .route("/api/billing/webhook", post(billing::webhook))
}
