//! Application services.
//!
//! - [`auth`] - Email/password authentication (argon2)
//! - [`projects`] - Project/entry façade with tier enforcement
//! - [`billing`] - Billing webhook verification

pub mod auth;
pub mod billing;
pub mod projects;

pub use auth::{AuthError, AuthService};
pub use billing::{BillingEvent, WebhookError, WebhookVerifier};
pub use projects::{FREE_PROJECT_LIMIT, ProjectError, ProjectService, can_create_project};
