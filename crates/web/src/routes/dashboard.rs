//! Dashboard route handlers.
//!
//! The dashboard is a thin rendering of façade state: every mutation
//! redirects back to `GET /dashboard`, which does a full reload of the
//! caller's projects and entries. Store failures become `?error=` codes
//! mapped to display-level notices; none are fatal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::instrument;

use proofy_core::{EntryId, ProjectId};

use crate::db::RepositoryError;
use crate::middleware::RequireAuth;
use crate::services::{FREE_PROJECT_LIMIT, ProjectError, ProjectService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Create-project form data.
#[derive(Debug, Deserialize)]
pub struct CreateProjectForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client_name: String,
}

/// Add-entry form data. Omitted fields become empty strings downstream.
#[derive(Debug, Deserialize)]
pub struct AddEntryForm {
    pub note: Option<String>,
    pub proof_link: Option<String>,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub is_premium: bool,
    pub free_limit: i64,
    pub support_contact: String,
    pub projects: Vec<crate::models::ProjectWithEntries>,
    pub project_count: usize,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /dashboard - projects with nested entries, newest project first.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    let service = ProjectService::new(state.pool());

    // Profile load degrades to free-tier defaults on store failure
    let profile = service.load_profile(user.id).await;

    let projects = match service.list_projects(user.id).await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!("Failed to list projects: {}", e);
            Vec::new()
        }
    };

    let error = query.error.as_deref().map(|e| match e {
        "quota" => format!(
            "Free plan limit reached ({FREE_PROJECT_LIMIT} projects). Upgrade to Premium to add more!"
        ),
        "not_found" => "That item no longer exists.".to_string(),
        "create_failed" => "Could not create the project. Please try again.".to_string(),
        "entry_failed" => "Could not add the proof entry. Please try again.".to_string(),
        "delete_failed" => "Could not delete. Please try again.".to_string(),
        other => format!("Error: {other}"),
    });

    let success = query.success.as_deref().map(|s| match s {
        "project_created" => "Project created.".to_string(),
        "project_deleted" => "Project deleted.".to_string(),
        "entry_added" => "Proof entry added.".to_string(),
        "entry_deleted" => "Proof entry deleted.".to_string(),
        other => format!("Success: {other}"),
    });

    let project_count = projects.len();

    DashboardTemplate {
        email: user.email.into_inner(),
        is_premium: profile.is_premium,
        free_limit: FREE_PROJECT_LIMIT,
        support_contact: state.config().support_contact.clone(),
        projects,
        project_count,
        error,
        success,
    }
    .into_response()
}

/// POST /dashboard/projects - create a project (quota-gated).
#[instrument(skip(state, form))]
pub async fn create_project(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CreateProjectForm>,
) -> Response {
    let service = ProjectService::new(state.pool());

    match service
        .create_project(user.id, &form.title, &form.client_name)
        .await
    {
        Ok(project) => {
            tracing::info!(project_id = %project.id, "project created");
            Redirect::to("/dashboard?success=project_created").into_response()
        }
        Err(ProjectError::QuotaExceeded) => {
            Redirect::to("/dashboard?error=quota").into_response()
        }
        Err(e) => {
            tracing::error!("Project creation failed: {}", e);
            Redirect::to("/dashboard?error=create_failed").into_response()
        }
    }
}

/// POST /dashboard/projects/{id}/delete - delete a project.
///
/// The template gates this behind a `confirm()` dialog; the handler itself
/// does not re-confirm.
#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Response {
    let service = ProjectService::new(state.pool());

    match service.delete_project(user.id, ProjectId::new(id)).await {
        Ok(()) => Redirect::to("/dashboard?success=project_deleted").into_response(),
        Err(ProjectError::Repository(RepositoryError::NotFound)) => {
            Redirect::to("/dashboard?error=not_found").into_response()
        }
        Err(e) => {
            tracing::error!("Project deletion failed: {}", e);
            Redirect::to("/dashboard?error=delete_failed").into_response()
        }
    }
}

/// POST /dashboard/projects/{id}/entries - add a proof entry.
#[instrument(skip(state, form))]
pub async fn add_entry(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<AddEntryForm>,
) -> Response {
    let service = ProjectService::new(state.pool());

    match service
        .add_entry(
            user.id,
            ProjectId::new(id),
            form.note.as_deref(),
            form.proof_link.as_deref(),
        )
        .await
    {
        Ok(_) => Redirect::to("/dashboard?success=entry_added").into_response(),
        Err(ProjectError::Repository(RepositoryError::NotFound)) => {
            Redirect::to("/dashboard?error=not_found").into_response()
        }
        Err(e) => {
            tracing::error!("Entry creation failed: {}", e);
            Redirect::to("/dashboard?error=entry_failed").into_response()
        }
    }
}

/// POST /dashboard/entries/{id}/delete - delete a proof entry.
#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Response {
    let service = ProjectService::new(state.pool());

    match service.delete_entry(user.id, EntryId::new(id)).await {
        Ok(()) => Redirect::to("/dashboard?success=entry_deleted").into_response(),
        Err(ProjectError::Repository(RepositoryError::NotFound)) => {
            Redirect::to("/dashboard?error=not_found").into_response()
        }
        Err(e) => {
            tracing::error!("Entry deletion failed: {}", e);
            Redirect::to("/dashboard?error=delete_failed").into_response()
        }
    }
}
