//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Every subject and study-session query carries a `user_id` predicate; that is
//! the only tenant isolation the service has.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use study_tracker_core::domain::{
    NewStudySession, StudySession, Subject, SubjectColor, User, UserCredentials,
};
use study_tracker_core::ports::{DatabaseService, PortError, PortResult};
use tracing::warn;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}

#[derive(FromRow)]
struct AuthSessionRecord {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SubjectRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    color: String,
}
impl SubjectRecord {
    fn to_domain(self) -> Subject {
        let color = SubjectColor::from_hex(&self.color).unwrap_or_else(|| {
            warn!("Subject {} has off-palette color {}", self.id, self.color);
            SubjectColor::default()
        });
        Subject {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            color,
        }
    }
}

#[derive(FromRow)]
struct StudySessionRecord {
    id: Uuid,
    user_id: Uuid,
    subject_id: Option<Uuid>,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    duration_minutes: i32,
    focus_score: Option<i16>,
    honesty_score: Option<i16>,
    notes: Option<String>,
}
impl StudySessionRecord {
    fn to_domain(self) -> StudySession {
        let score = |s: Option<i16>| s.map(|v| v.clamp(0, 100) as u8);
        StudySession {
            id: self.id,
            user_id: self.user_id,
            subject_id: self.subject_id,
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_minutes: self.duration_minutes.max(0) as u32,
            focus_score: score(self.focus_score),
            honesty_score: score(self.honesty_score),
            notes: self.notes,
        }
    }
}

const STUDY_SESSION_COLUMNS: &str = "id, user_id, subject_id, started_at, ended_at, \
     duration_minutes, focus_score, honesty_score, notes";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                PortError::Invalid(format!("An account for {} already exists", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users \
             WHERE email = $1 AND hashed_password IS NOT NULL",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => unexpected(e),
        })?;
        Ok(UserCredentials {
            user_id: record.user_id,
            email: record.email,
            hashed_password: record.hashed_password,
        })
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<(Uuid, DateTime<Utc>)> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT user_id, expires_at FROM auth_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)?;

        if record.expires_at <= Utc::now() {
            return Err(PortError::Unauthorized);
        }
        Ok((record.user_id, record.expires_at))
    }

    async fn extend_auth_session(&self, session_id: &str, expires_at: DateTime<Utc>) -> PortResult<()> {
        let result = sqlx::query("UPDATE auth_sessions SET expires_at = $1 WHERE id = $2")
            .bind(expires_at)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Auth session not found".to_string()));
        }
        Ok(())
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn list_subjects(&self, user_id: Uuid) -> PortResult<Vec<Subject>> {
        let records = sqlx::query_as::<_, SubjectRecord>(
            "SELECT id, user_id, name, color FROM subjects WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_subject(&self, user_id: Uuid, name: &str, color: SubjectColor) -> PortResult<Subject> {
        let record = sqlx::query_as::<_, SubjectRecord>(
            "INSERT INTO subjects (id, user_id, name, color) VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, name, color",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(color.hex())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn create_study_session(&self, user_id: Uuid, session: NewStudySession) -> PortResult<StudySession> {
        if let Some(subject_id) = session.subject_id {
            let owned: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM subjects WHERE id = $1 AND user_id = $2")
                    .bind(subject_id)
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(unexpected)?;
            if owned.is_none() {
                return Err(PortError::NotFound(format!("Subject {} not found", subject_id)));
            }
        }

        let duration_minutes = i32::try_from(session.duration_minutes).map_err(|_| {
            PortError::Invalid(format!(
                "Duration of {} minutes is out of range",
                session.duration_minutes
            ))
        })?;

        let sql = format!(
            "INSERT INTO study_sessions (id, user_id, subject_id, started_at, ended_at, \
             duration_minutes, focus_score, honesty_score, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            STUDY_SESSION_COLUMNS
        );
        let record = sqlx::query_as::<_, StudySessionRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(session.subject_id)
            .bind(session.started_at)
            .bind(session.ended_at)
            .bind(duration_minutes)
            .bind(session.focus_score.map(i16::from))
            .bind(session.honesty_score.map(i16::from))
            .bind(session.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_study_sessions(&self, user_id: Uuid, limit: u32) -> PortResult<Vec<StudySession>> {
        let sql = format!(
            "SELECT {} FROM study_sessions WHERE user_id = $1 ORDER BY started_at DESC LIMIT $2",
            STUDY_SESSION_COLUMNS
        );
        let records = sqlx::query_as::<_, StudySessionRecord>(&sql)
            .bind(user_id)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_sessions_in_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        subject_ids: &[Uuid],
    ) -> PortResult<Vec<StudySession>> {
        let sql = format!(
            "SELECT {} FROM study_sessions \
             WHERE user_id = $1 AND started_at >= $2 AND started_at <= $3 \
             AND (cardinality($4::uuid[]) = 0 OR subject_id = ANY($4::uuid[])) \
             ORDER BY started_at ASC",
            STUDY_SESSION_COLUMNS
        );
        let records = sqlx::query_as::<_, StudySessionRecord>(&sql)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .bind(subject_ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
