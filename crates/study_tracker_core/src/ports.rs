//! crates/study_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use crate::domain::{NewStudySession, StudySession, Subject, SubjectColor, User, UserCredentials};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owner and expiry of a live session. Expired sessions are `Unauthorized`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<(Uuid, DateTime<Utc>)>;

    async fn extend_auth_session(&self, session_id: &str, expires_at: DateTime<Utc>) -> PortResult<()>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Subjects ---
    /// Lists the user's subjects ordered by name.
    async fn list_subjects(&self, user_id: Uuid) -> PortResult<Vec<Subject>>;

    async fn create_subject(&self, user_id: Uuid, name: &str, color: SubjectColor) -> PortResult<Subject>;

    // --- Study Sessions ---
    async fn create_study_session(&self, user_id: Uuid, session: NewStudySession) -> PortResult<StudySession>;

    /// Lists the user's most recent sessions, newest first.
    async fn list_study_sessions(&self, user_id: Uuid, limit: u32) -> PortResult<Vec<StudySession>>;

    /// Sessions whose start lies in `[from, to]`. An empty `subject_ids` means every subject.
    async fn get_sessions_in_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        subject_ids: &[Uuid],
    ) -> PortResult<Vec<StudySession>>;
}

/// The identity a request resolved to, plus the expiry of the credential it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    pub user_id: Uuid,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Turns the raw session token from a cookie into a user.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` means the token did not resolve to anyone; errors are backend failures.
    async fn resolve(&self, token: &str) -> PortResult<Option<ResolvedIdentity>>;
}
