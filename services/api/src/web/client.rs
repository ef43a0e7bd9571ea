//! services/api/src/web/client.rs
//!
//! A per-request data handle bound to the signed-in user. Handlers reach the
//! database only through this, so every read and write is scoped to the caller.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use study_tracker_core::{
    get_report_data, DatabaseService, NewStudySession, ReportData, StudySession, Subject,
    SubjectColor,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::{middleware::CurrentUser, state::AppState};

pub struct UserClient {
    db: Arc<dyn DatabaseService>,
    user_id: Uuid,
}

impl FromRequestParts<Arc<AppState>> for UserClient {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or(ApiError::Unauthorized)?;
        Ok(Self {
            db: state.db.clone(),
            user_id: user.user_id,
        })
    }
}

impl UserClient {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        Ok(self.db.list_subjects(self.user_id).await?)
    }

    /// Creates a subject. The name is trimmed and must not be empty.
    pub async fn create_subject(&self, name: &str, color: SubjectColor) -> Result<Subject, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("Subject name is required".to_string()));
        }
        Ok(self.db.create_subject(self.user_id, name, color).await?)
    }

    pub async fn log_session(&self, session: NewStudySession) -> Result<StudySession, ApiError> {
        Ok(self.db.create_study_session(self.user_id, session).await?)
    }

    pub async fn recent_sessions(&self, limit: u32) -> Result<Vec<StudySession>, ApiError> {
        Ok(self.db.list_study_sessions(self.user_id, limit).await?)
    }

    pub async fn report(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        subject_ids: &[Uuid],
    ) -> Result<ReportData, ApiError> {
        Ok(get_report_data(self.db.as_ref(), self.user_id, from, to, subject_ids).await?)
    }
}
