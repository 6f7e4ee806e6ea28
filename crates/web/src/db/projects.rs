//! Project repository: CRUD scoped to the owning user.
//!
//! Every query filters by `user_id`; a project belonging to someone else is
//! indistinguishable from one that does not exist.

use sqlx::PgPool;

use proofy_core::{ProjectId, UserId};

use super::RepositoryError;
use crate::models::Project;

/// Repository for project database operations.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's projects, newest-created-first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Project>, RepositoryError> {
        let projects = sqlx::query_as::<_, Project>(
            r"
            SELECT id, user_id, title, client_name, description, created_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(projects)
    }

    /// Count a user's projects.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Insert a new project with an empty description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        title: &str,
        client_name: &str,
    ) -> Result<Project, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(
            r"
            INSERT INTO projects (user_id, title, client_name, description)
            VALUES ($1, $2, $3, '')
            RETURNING id, user_id, title, client_name, description, created_at
            ",
        )
        .bind(user_id)
        .bind(title)
        .bind(client_name)
        .fetch_one(self.pool)
        .await?;

        Ok(project)
    }

    /// Delete a project by id, scoped to its owner.
    ///
    /// Entries under the project are removed by the store's FK cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched (unknown id or
    /// a different owner) - never a silent success.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM projects
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
