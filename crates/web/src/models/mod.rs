//! Domain models for Proofy.

pub mod profile;
pub mod project;
pub mod session;
pub mod user;

pub use profile::Profile;
pub use project::{Project, ProjectWithEntries, ProofEntry};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
