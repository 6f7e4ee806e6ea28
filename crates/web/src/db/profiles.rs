//! Profile repository: the tier flag per user.

use sqlx::PgPool;

use proofy_core::UserId;

use super::RepositoryError;
use crate::models::Profile;

/// Repository for profile database operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by user ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r"
            SELECT user_id, is_premium, created_at
            FROM profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Get a profile, creating the row with `is_premium = false` if absent.
    ///
    /// Idempotent: `ON CONFLICT DO NOTHING` guarantees repeat calls never
    /// create a duplicate, even when racing another request for the same user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    /// Returns `RepositoryError::NotFound` only if the row vanished between
    /// insert and re-read (owner deleted concurrently).
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Profile, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO profiles (user_id, is_premium)
            VALUES ($1, FALSE)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.get(user_id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Set a user's premium flag, creating the profile row if absent.
    ///
    /// Used by the billing webhook; the interactive path never calls this.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_premium(
        &self,
        user_id: UserId,
        is_premium: bool,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO profiles (user_id, is_premium)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET is_premium = EXCLUDED.is_premium
            ",
        )
        .bind(user_id)
        .bind(is_premium)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
