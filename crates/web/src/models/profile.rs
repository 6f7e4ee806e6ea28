//! Profile domain type: a caller's tier record.

use chrono::{DateTime, Utc};
use proofy_core::UserId;

/// A user's tier-and-identity record.
///
/// Created lazily on first dashboard visit and never deleted in-app.
/// `is_premium` is flipped only by the billing webhook or manual support
/// action; the interactive path just re-reads it on each profile load.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    /// Owning user (primary key).
    pub user_id: UserId,
    /// Free tier when false (max 3 projects), unlimited when true.
    pub is_premium: bool,
    /// When the profile row was created.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Degraded fallback used when the profile cannot be loaded or created.
    ///
    /// Keeps the dashboard usable with the conservative assumption that the
    /// caller is on the free tier.
    #[must_use]
    pub fn degraded(user_id: UserId) -> Self {
        Self {
            user_id,
            is_premium: false,
            created_at: Utc::now(),
        }
    }
}
