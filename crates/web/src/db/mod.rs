//! Database operations for the Proofy `PostgreSQL` store.
//!
//! # Tables
//!
//! - `users` - Site authentication accounts
//! - `user_passwords` - Argon2 password hashes (one row per user)
//! - `profiles` - Tier flag per user, created lazily on first dashboard visit
//! - `projects` - Client projects owned by a user
//! - `entries` - Proof-of-work entries attached to a project
//! - `tower_sessions.session` - Session storage
//!
//! Referential integrity is enforced by the store: `entries` cascade when
//! their parent project is deleted, `projects` and `profiles` cascade when
//! the owning user is deleted.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p proofy-cli -- migrate
//! ```

pub mod entries;
pub mod profiles;
pub mod projects;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use entries::EntryRepository;
pub use profiles::ProfileRepository;
pub use projects::ProjectRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
