//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! proofy-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PROOFY_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

fn database_url() -> Result<String, MigrationError> {
    if let Ok(value) = std::env::var("PROOFY_DATABASE_URL") {
        return Ok(value);
    }
    std::env::var("DATABASE_URL").map_err(|_| MigrationError::MissingEnvVar("PROOFY_DATABASE_URL"))
}
