//! Proof-entry repository.
//!
//! Ownership is enforced through the parent project: inserts and deletes
//! join against `projects.user_id`, so an entry under someone else's project
//! reads as not found.

use sqlx::PgPool;

use proofy_core::{EntryId, ProjectId, UserId};

use super::RepositoryError;
use crate::models::ProofEntry;

/// Repository for proof-entry database operations.
pub struct EntryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EntryRepository<'a> {
    /// Create a new entry repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List entries for a set of projects, insertion-ordered.
    ///
    /// One query for the whole dashboard; the caller groups rows by project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ProofEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, ProofEntry>(
            r"
            SELECT e.id, e.project_id, e.note, e.proof_link, e.created_at
            FROM entries e
            JOIN projects p ON p.id = e.project_id
            WHERE p.user_id = $1
            ORDER BY e.created_at ASC, e.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Insert an entry under one of the caller's projects.
    ///
    /// `note` and `proof_link` are stored as given; callers default omitted
    /// fields to empty strings before reaching here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist or
    /// belongs to a different user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        note: &str,
        proof_link: &str,
    ) -> Result<ProofEntry, RepositoryError> {
        let entry = sqlx::query_as::<_, ProofEntry>(
            r"
            INSERT INTO entries (project_id, note, proof_link)
            SELECT p.id, $3, $4
            FROM projects p
            WHERE p.id = $1 AND p.user_id = $2
            RETURNING id, project_id, note, proof_link, created_at
            ",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(note)
        .bind(proof_link)
        .fetch_optional(self.pool)
        .await?;

        entry.ok_or(RepositoryError::NotFound)
    }

    /// Delete an entry by id, scoped to the owner of its parent project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched - never a
    /// silent success.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, user_id: UserId, entry_id: EntryId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM entries e
            USING projects p
            WHERE e.id = $1 AND e.project_id = p.id AND p.user_id = $2
            ",
        )
        .bind(entry_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
