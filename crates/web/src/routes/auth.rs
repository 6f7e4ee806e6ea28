//! Authentication route handlers.
//!
//! Login, signup, and logout. Failed attempts redirect back to the form
//! with a short error code that the page maps to a friendly message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    // Already logged in? Go straight to the dashboard.
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let error = query.error.as_deref().map(|e| match e {
        "credentials" => "Invalid email or password.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        _ => format!("Error: {e}"),
    });

    let success = query.success.as_deref().map(|s| match s {
        "registered" => "Account created! Sign in to get started.".to_string(),
        "logged_out" => "You have been signed out.".to_string(),
        _ => format!("Success: {s}"),
    });

    LoginTemplate { error, success }.into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                email: user.email,
            };

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let error = query.error.as_deref().map(|e| match e {
        "password_mismatch" => "Passwords do not match.".to_string(),
        "password_too_short" => "Password must be at least 8 characters.".to_string(),
        "email_taken" => "An account with this email already exists.".to_string(),
        "invalid_email" => "That email address doesn't look right.".to_string(),
        "failed" => "Could not create your account. Please try again.".to_string(),
        _ => format!("Error: {e}"),
    });

    SignupTemplate { error }.into_response()
}

/// Handle signup form submission.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Response {
    // Validate passwords match before touching the store
    if form.password != form.password_confirm {
        return Redirect::to("/auth/signup?error=password_mismatch").into_response();
    }

    let auth = AuthService::new(state.pool());

    match auth.register(&form.email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "account created");
            Redirect::to("/auth/login?success=registered").into_response()
        }
        Err(e) => {
            tracing::warn!("Signup failed: {}", e);
            let code = match e {
                AuthError::UserAlreadyExists => "email_taken",
                AuthError::WeakPassword(_) => "password_too_short",
                AuthError::InvalidEmail(_) => "invalid_email",
                _ => "failed",
            };
            Redirect::to(&format!("/auth/signup?error={code}")).into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("Failed to clear session on logout: {}", e);
    }

    Redirect::to("/auth/login?success=logged_out").into_response()
}
