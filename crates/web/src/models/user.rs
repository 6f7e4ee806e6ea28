//! User domain type.

use chrono::{DateTime, Utc};

use proofy_core::{Email, UserId};

/// A Proofy account.
///
/// Authentication identity only; tier state lives on [`super::Profile`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
