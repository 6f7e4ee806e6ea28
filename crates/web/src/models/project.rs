//! Project and proof-entry domain types.

use chrono::{DateTime, Utc};

use proofy_core::{EntryId, ProjectId, UserId};

/// A unit of client work tracked by its owner.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID.
    pub id: ProjectId,
    /// Owning user.
    pub user_id: UserId,
    /// Project title.
    pub title: String,
    /// Name of the client the work was done for.
    pub client_name: String,
    /// Free-form description; empty string on creation.
    pub description: String,
    /// When the project was created. Drives newest-first listing.
    pub created_at: DateTime<Utc>,
}

/// A note/link evidencing completed work, attached to a project.
///
/// Deleted by the store when its parent project is deleted (FK cascade).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProofEntry {
    /// Unique entry ID.
    pub id: EntryId,
    /// Parent project.
    pub project_id: ProjectId,
    /// Note text; empty string when omitted, never NULL.
    pub note: String,
    /// Evidence URL; empty string when omitted, never NULL.
    pub proof_link: String,
    /// When the entry was created. Drives insertion-order listing.
    pub created_at: DateTime<Utc>,
}

/// A project with its nested proof entries, as rendered on the dashboard.
#[derive(Debug, Clone)]
pub struct ProjectWithEntries {
    pub project: Project,
    pub entries: Vec<ProofEntry>,
}
