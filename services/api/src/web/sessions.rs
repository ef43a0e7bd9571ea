//! services/api/src/web/sessions.rs
//!
//! Logging and listing study sessions.

use axum::{extract::Query, http::StatusCode, Json};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use study_tracker_core::{NewStudySession, StudySession};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::client::UserClient;

const DEFAULT_LIST_LIMIT: u32 = 20;
const MAX_LIST_LIMIT: u32 = 100;
/// A single study session may not run longer than a day.
const MAX_SESSION_MINUTES: u32 = 24 * 60;

#[derive(Deserialize, ToSchema)]
pub struct LogSessionRequest {
    #[serde(default)]
    pub subject_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    /// Either `ended_at` or `duration_minutes` must be given.
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub focus_score: Option<u8>,
    #[serde(default)]
    pub honesty_score: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct StudySessionDto {
    pub id: Uuid,
    pub subject_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub focus_score: Option<u8>,
    pub honesty_score: Option<u8>,
    pub notes: Option<String>,
}

impl From<StudySession> for StudySessionDto {
    fn from(s: StudySession) -> Self {
        Self {
            id: s.id,
            subject_id: s.subject_id,
            started_at: s.started_at,
            ended_at: s.ended_at,
            duration_minutes: s.duration_minutes,
            focus_score: s.focus_score,
            honesty_score: s.honesty_score,
            notes: s.notes,
        }
    }
}

#[derive(Deserialize)]
pub struct ListSessionsQuery {
    pub limit: Option<u32>,
}

fn check_score(name: &str, score: Option<u8>) -> Result<(), ApiError> {
    match score {
        Some(s) if s > 100 => Err(ApiError::BadRequest(format!(
            "{} must be between 0 and 100",
            name
        ))),
        _ => Ok(()),
    }
}

fn session_too_long() -> ApiError {
    ApiError::BadRequest(format!(
        "A session may last at most {} minutes",
        MAX_SESSION_MINUTES
    ))
}

fn check_duration(minutes: u32) -> Result<(), ApiError> {
    if minutes > MAX_SESSION_MINUTES {
        return Err(session_too_long());
    }
    Ok(())
}

impl LogSessionRequest {
    /// Fills in whichever of end time and duration was left out, and checks ranges.
    fn into_new_session(self) -> Result<NewStudySession, ApiError> {
        check_score("focus_score", self.focus_score)?;
        check_score("honesty_score", self.honesty_score)?;

        let (ended_at, duration_minutes) = match (self.ended_at, self.duration_minutes) {
            (Some(end), duration) => {
                if end < self.started_at {
                    return Err(ApiError::BadRequest(
                        "ended_at must not be before started_at".to_string(),
                    ));
                }
                let duration = match duration {
                    Some(d) => d,
                    None => u32::try_from((end - self.started_at).num_minutes())
                        .map_err(|_| session_too_long())?,
                };
                check_duration(duration)?;
                (end, duration)
            }
            (None, Some(duration)) => {
                check_duration(duration)?;
                (self.started_at + Duration::minutes(i64::from(duration)), duration)
            }
            (None, None) => {
                return Err(ApiError::BadRequest(
                    "Either ended_at or duration_minutes is required".to_string(),
                ))
            }
        };

        Ok(NewStudySession {
            subject_id: self.subject_id,
            started_at: self.started_at,
            ended_at,
            duration_minutes,
            focus_score: self.focus_score,
            honesty_score: self.honesty_score,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Log a completed study session.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = LogSessionRequest,
    responses(
        (status = 201, description = "Session logged", body = StudySessionDto),
        (status = 400, description = "Invalid times or scores"),
        (status = 404, description = "Subject not found"),
        (status = 307, description = "Not signed in; redirected to sign-in")
    )
)]
pub async fn log_session_handler(
    client: UserClient,
    Json(req): Json<LogSessionRequest>,
) -> Result<(StatusCode, Json<StudySessionDto>), ApiError> {
    let session = client.log_session(req.into_new_session()?).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// List the caller's most recent study sessions.
#[utoipa::path(
    get,
    path = "/sessions",
    params(("limit" = Option<u32>, Query, description = "At most this many sessions (default 20, max 100).")),
    responses(
        (status = 200, description = "Recent sessions, newest first", body = [StudySessionDto]),
        (status = 307, description = "Not signed in; redirected to sign-in")
    )
)]
pub async fn list_sessions_handler(
    client: UserClient,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Vec<StudySessionDto>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let sessions = client.recent_sessions(limit).await?;
    Ok(Json(sessions.into_iter().map(StudySessionDto::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(ended: Option<DateTime<Utc>>, duration: Option<u32>) -> LogSessionRequest {
        LogSessionRequest {
            subject_id: None,
            started_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            ended_at: ended,
            duration_minutes: duration,
            focus_score: Some(80),
            honesty_score: None,
            notes: Some("  ".into()),
        }
    }

    #[test]
    fn duration_is_derived_from_end_time() {
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        let session = request(Some(end), None).into_new_session().unwrap();
        assert_eq!(session.duration_minutes, 90);
        assert_eq!(session.notes, None);
    }

    #[test]
    fn end_time_is_derived_from_duration() {
        let session = request(None, Some(25)).into_new_session().unwrap();
        assert_eq!(
            session.ended_at,
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 25, 0).unwrap()
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(request(None, None).into_new_session().is_err());
        let before = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        assert!(request(Some(before), None).into_new_session().is_err());
        let mut too_focused = request(None, Some(10));
        too_focused.focus_score = Some(101);
        assert!(too_focused.into_new_session().is_err());
    }

    #[test]
    fn rejects_sessions_longer_than_a_day() {
        let err = request(None, Some(3_000_000_000)).into_new_session();
        assert!(matches!(err, Err(ApiError::BadRequest(_))));

        let next_week = Utc.with_ymd_and_hms(2024, 6, 8, 9, 0, 0).unwrap();
        assert!(request(Some(next_week), None).into_new_session().is_err());

        let day_later = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let session = request(Some(day_later), None).into_new_session().unwrap();
        assert_eq!(session.duration_minutes, MAX_SESSION_MINUTES);
        let full_day = request(None, Some(MAX_SESSION_MINUTES)).into_new_session().unwrap();
        assert_eq!(full_day.duration_minutes, 1440);
    }
}
