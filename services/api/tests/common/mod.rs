// tests/common/mod.rs
//
// Shared fixtures for the router tests: an in-memory DatabaseService, a helper to
// build the app around it, and small request/response helpers.

#![allow(dead_code)]

use api_lib::{
    adapters::SessionResolver,
    config::Config,
    web::{router, AppState},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use study_tracker_core::{
    DatabaseService, GatewayMode, IdentityResolver, NewStudySession, PortError, PortResult,
    StudySession, Subject, SubjectColor, User, UserCredentials, WeekWindow,
};
use tower::ServiceExt;
use uuid::Uuid;

pub type RangeCall = (Uuid, DateTime<Utc>, DateTime<Utc>, Vec<Uuid>);

#[derive(Default)]
struct Inner {
    users: Vec<UserCredentials>,
    auth_sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    subjects: Vec<Subject>,
    study_sessions: Vec<StudySession>,
    create_subject_calls: usize,
    range_calls: Vec<RangeCall>,
    fail_extend: bool,
}

/// A `DatabaseService` kept in memory, with the same user scoping as the SQL adapter.
#[derive(Default)]
pub struct MemoryDb {
    inner: Mutex<Inner>,
}

impl MemoryDb {
    /// Opens a session for a fresh user and returns `(user_id, cookie token)`.
    pub fn sign_in_user(&self, expires_in: Duration) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = Uuid::new_v4().to_string();
        let mut inner = self.inner.lock().unwrap();
        inner.users.push(UserCredentials {
            user_id,
            email: format!("{}@example.test", user_id),
            hashed_password: String::new(),
        });
        inner
            .auth_sessions
            .insert(token.clone(), (user_id, Utc::now() + expires_in));
        (user_id, token)
    }

    pub fn session_expiry(&self, token: &str) -> Option<DateTime<Utc>> {
        self.inner
            .lock()
            .unwrap()
            .auth_sessions
            .get(token)
            .map(|(_, exp)| *exp)
    }

    pub fn create_subject_calls(&self) -> usize {
        self.inner.lock().unwrap().create_subject_calls
    }

    pub fn range_calls(&self) -> Vec<RangeCall> {
        self.inner.lock().unwrap().range_calls.clone()
    }

    pub fn fail_session_extension(&self) {
        self.inner.lock().unwrap().fail_extend = true;
    }

    pub fn insert_subject(&self, user_id: Uuid, name: &str) -> Subject {
        let subject = Subject {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            color: SubjectColor::default(),
        };
        self.inner.lock().unwrap().subjects.push(subject.clone());
        subject
    }
}

#[async_trait]
impl DatabaseService for MemoryDb {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(PortError::Invalid(format!("An account for {} already exists", email)));
        }
        let user_id = Uuid::new_v4();
        inner.users.push(UserCredentials {
            user_id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        });
        Ok(User {
            user_id,
            email: Some(email.to_string()),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email && !u.hashed_password.is_empty())
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.inner
            .lock()
            .unwrap()
            .auth_sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<(Uuid, DateTime<Utc>)> {
        match self.inner.lock().unwrap().auth_sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok((*user_id, *expires_at)),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn extend_auth_session(&self, session_id: &str, expires_at: DateTime<Utc>) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_extend {
            return Err(PortError::Unexpected("write refused".to_string()));
        }
        match inner.auth_sessions.get_mut(session_id) {
            Some(entry) => {
                entry.1 = expires_at;
                Ok(())
            }
            None => Err(PortError::NotFound("Auth session not found".to_string())),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.inner.lock().unwrap().auth_sessions.remove(session_id);
        Ok(())
    }

    async fn list_subjects(&self, user_id: Uuid) -> PortResult<Vec<Subject>> {
        let mut subjects: Vec<Subject> = self
            .inner
            .lock()
            .unwrap()
            .subjects
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn create_subject(&self, user_id: Uuid, name: &str, color: SubjectColor) -> PortResult<Subject> {
        let mut inner = self.inner.lock().unwrap();
        inner.create_subject_calls += 1;
        let subject = Subject {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            color,
        };
        inner.subjects.push(subject.clone());
        Ok(subject)
    }

    async fn create_study_session(&self, user_id: Uuid, session: NewStudySession) -> PortResult<StudySession> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(subject_id) = session.subject_id {
            if !inner
                .subjects
                .iter()
                .any(|s| s.id == subject_id && s.user_id == user_id)
            {
                return Err(PortError::NotFound(format!("Subject {} not found", subject_id)));
            }
        }
        let stored = StudySession {
            id: Uuid::new_v4(),
            user_id,
            subject_id: session.subject_id,
            started_at: session.started_at,
            ended_at: session.ended_at,
            duration_minutes: session.duration_minutes,
            focus_score: session.focus_score,
            honesty_score: session.honesty_score,
            notes: session.notes,
        };
        inner.study_sessions.push(stored.clone());
        Ok(stored)
    }

    async fn list_study_sessions(&self, user_id: Uuid, limit: u32) -> PortResult<Vec<StudySession>> {
        let mut sessions: Vec<StudySession> = self
            .inner
            .lock()
            .unwrap()
            .study_sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions.truncate(limit as usize);
        Ok(sessions)
    }

    async fn get_sessions_in_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        subject_ids: &[Uuid],
    ) -> PortResult<Vec<StudySession>> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .range_calls
            .push((user_id, from, to, subject_ids.to_vec()));
        Ok(inner
            .study_sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.started_at >= from && s.started_at <= to)
            .filter(|s| {
                subject_ids.is_empty()
                    || s.subject_id.map_or(false, |id| subject_ids.contains(&id))
            })
            .cloned()
            .collect())
    }
}

/// A resolver whose backend is always down.
pub struct BrokenResolver;

#[async_trait]
impl IdentityResolver for BrokenResolver {
    async fn resolve(&self, _token: &str) -> PortResult<Option<study_tracker_core::ResolvedIdentity>> {
        Err(PortError::Unexpected("auth backend unreachable".to_string()))
    }
}

pub fn test_config(mode: GatewayMode) -> Arc<Config> {
    let mode = match mode {
        GatewayMode::ProtectedPrefixes => "protected-prefixes",
        GatewayMode::PublicPrefixes => "public-prefixes",
    };
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused/test".to_string()),
        "GATEWAY_MODE" => Some(mode.to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.week_window, WeekWindow::Rolling);
    Arc::new(config)
}

pub fn app_with(db: Arc<MemoryDb>, mode: GatewayMode) -> Router {
    let identity = Arc::new(SessionResolver::new(db.clone()));
    router(Arc::new(AppState::new(db, identity, test_config(mode))))
}

pub fn app(db: Arc<MemoryDb>) -> Router {
    app_with(db, GatewayMode::ProtectedPrefixes)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session={}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session={}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
