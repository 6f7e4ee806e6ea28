//! Project/entry façade: all project and proof-entry CRUD plus tier
//! enforcement, over the repositories.
//!
//! Every mutation is followed by a full dashboard reload at the route layer;
//! the service never maintains a local mirror of remote rows.

use sqlx::PgPool;
use thiserror::Error;
use tracing::warn;

use proofy_core::{EntryId, ProjectId, UserId};

use crate::db::{
    EntryRepository, ProfileRepository, ProjectRepository, RepositoryError,
};
use crate::models::{Profile, Project, ProjectWithEntries, ProofEntry};

/// Maximum number of projects a free-tier profile may own.
pub const FREE_PROJECT_LIMIT: i64 = 3;

/// Errors surfaced by the façade.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Free plan limit reached; no write was performed.
    #[error("free plan limit reached ({FREE_PROJECT_LIMIT} projects)")]
    QuotaExceeded,

    /// Store failure; surfaced to the caller as a display-level message.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Decide whether a profile may create another project.
///
/// The check applies at creation time only: the limit is on creating new
/// projects, not on keeping existing ones (a downgrade never deletes rows).
#[must_use]
pub const fn can_create_project(is_premium: bool, current_count: i64) -> bool {
    is_premium || current_count < FREE_PROJECT_LIMIT
}

/// The project/entry store façade.
pub struct ProjectService<'a> {
    profiles: ProfileRepository<'a>,
    projects: ProjectRepository<'a>,
    entries: EntryRepository<'a>,
}

impl<'a> ProjectService<'a> {
    /// Create a new façade over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool),
            projects: ProjectRepository::new(pool),
            entries: EntryRepository::new(pool),
        }
    }

    /// Load the caller's profile, creating it on first visit.
    ///
    /// Degrades rather than fails: any store error is logged as a warning
    /// and the caller gets a free-tier view. The premium flag is re-read
    /// here on every dashboard load, which is how out-of-band upgrades
    /// (billing webhook, manual support action) become visible.
    pub async fn load_profile(&self, user_id: UserId) -> Profile {
        match self.profiles.get_or_create(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "profile load failed, using free-tier defaults");
                Profile::degraded(user_id)
            }
        }
    }

    /// Full reload of the caller's projects, newest-first, each with its
    /// entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Repository` if either query fails.
    pub async fn list_projects(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ProjectWithEntries>, ProjectError> {
        let projects = self.projects.list_for_user(user_id).await?;
        let mut entries = self.entries.list_for_user(user_id).await?;

        let mut result: Vec<ProjectWithEntries> = projects
            .into_iter()
            .map(|project| ProjectWithEntries {
                project,
                entries: Vec::new(),
            })
            .collect();

        // Entries arrive insertion-ordered; distribute them per project.
        for entry in entries.drain(..) {
            if let Some(pw) = result.iter_mut().find(|pw| pw.project.id == entry.project_id) {
                pw.entries.push(entry);
            }
        }

        Ok(result)
    }

    /// Create a project for the caller, enforcing the free-tier quota.
    ///
    /// The quota check is read-then-write without transactional isolation:
    /// two concurrent creates can both observe count = 2 and briefly push a
    /// free profile past the limit. Accepted for a single-user-device app;
    /// last-write-wins at the store.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::QuotaExceeded` if a free-tier caller already
    /// owns [`FREE_PROJECT_LIMIT`] projects; no write is performed.
    /// Returns `ProjectError::Repository` if the store fails.
    pub async fn create_project(
        &self,
        user_id: UserId,
        title: &str,
        client_name: &str,
    ) -> Result<Project, ProjectError> {
        let profile = self.load_profile(user_id).await;
        let count = self.projects.count_for_user(user_id).await?;

        if !can_create_project(profile.is_premium, count) {
            return Err(ProjectError::QuotaExceeded);
        }

        let project = self.projects.create(user_id, title, client_name).await?;
        Ok(project)
    }

    /// Delete one of the caller's projects by id.
    ///
    /// Caller confirmation is a UI gate, not enforced here. Entries under
    /// the project are removed by the store's FK cascade.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Repository` with `NotFound` for an unknown or
    /// foreign id - never a silent success.
    pub async fn delete_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<(), ProjectError> {
        self.projects.delete(user_id, project_id).await?;
        Ok(())
    }

    /// Attach a proof entry to one of the caller's projects.
    ///
    /// Omitted note/link are stored as empty strings, never NULL.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Repository` with `NotFound` for an unknown or
    /// foreign project id.
    pub async fn add_entry(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        note: Option<&str>,
        proof_link: Option<&str>,
    ) -> Result<ProofEntry, ProjectError> {
        let entry = self
            .entries
            .create(
                user_id,
                project_id,
                note.unwrap_or_default(),
                proof_link.unwrap_or_default(),
            )
            .await?;
        Ok(entry)
    }

    /// Delete one of the caller's proof entries by id.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Repository` with `NotFound` for an unknown or
    /// foreign id.
    pub async fn delete_entry(
        &self,
        user_id: UserId,
        entry_id: EntryId,
    ) -> Result<(), ProjectError> {
        self.entries.delete(user_id, entry_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_below_limit_can_create() {
        assert!(can_create_project(false, 0));
        assert!(can_create_project(false, 1));
        assert!(can_create_project(false, 2));
    }

    #[test]
    fn test_free_tier_at_or_over_limit_cannot_create() {
        assert!(!can_create_project(false, 3));
        // Over-limit state can exist after the documented create race or a
        // premium downgrade; it still blocks new creates.
        assert!(!can_create_project(false, 4));
    }

    #[test]
    fn test_premium_never_quota_blocked() {
        assert!(can_create_project(true, 0));
        assert!(can_create_project(true, 3));
        assert!(can_create_project(true, 1000));
    }
}
