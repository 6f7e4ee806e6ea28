//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new user
//! proofy-cli user create -e freelancer@example.com -p "a strong password"
//!
//! # Mark an existing user as premium
//! proofy-cli user premium -e freelancer@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `PROOFY_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use proofy_core::Email;
use proofy_web::db::{ProfileRepository, RepositoryError, UserRepository};
use proofy_web::services::auth::{AuthError, AuthService};

/// Errors that can occur during user management.
#[derive(Debug, Error)]
pub enum UserCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Registration failure (invalid email, weak password, duplicate).
    #[error("Registration failed: {0}")]
    Auth(#[from] AuthError),

    /// Repository failure.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No user with the given email.
    #[error("No user found with email: {0}")]
    NotFound(String),
}

/// Create a new user with an email and password.
///
/// # Errors
///
/// Returns `UserCommandError` if the email is invalid, the password is too
/// weak, or the email is already registered.
pub async fn create(email: &str, password: &str) -> Result<(), UserCommandError> {
    dotenvy::dotenv().ok();

    let pool = connect().await?;

    tracing::info!("Creating user: {}", email);
    let user = AuthService::new(&pool).register(email, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(())
}

/// Mark a user's profile as premium.
///
/// This is the manual upgrade path used when support activates premium on
/// behalf of a user.
///
/// # Errors
///
/// Returns `UserCommandError::NotFound` if no user has the given email.
pub async fn set_premium(email: &str) -> Result<(), UserCommandError> {
    dotenvy::dotenv().ok();

    let parsed =
        Email::parse(email).map_err(|_| UserCommandError::InvalidEmail(email.to_owned()))?;

    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .get_by_email(&parsed)
        .await?
        .ok_or_else(|| UserCommandError::NotFound(email.to_owned()))?;

    ProfileRepository::new(&pool)
        .set_premium(user.id, true)
        .await?;

    tracing::info!("User {} is now premium", user.email);
    Ok(())
}

async fn connect() -> Result<PgPool, UserCommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(&database_url).await?)
}

fn database_url() -> Result<String, UserCommandError> {
    if let Ok(value) = std::env::var("PROOFY_DATABASE_URL") {
        return Ok(value);
    }
    std::env::var("DATABASE_URL")
        .map_err(|_| UserCommandError::MissingEnvVar("PROOFY_DATABASE_URL"))
}
