//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, plus the small
//! handlers that do not belong to any feature.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::{auth, reports, sessions, subjects};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::sign_in_page_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        subjects::list_subjects_handler,
        subjects::create_subject_handler,
        sessions::log_session_handler,
        sessions::list_sessions_handler,
        reports::reports_handler,
        reports::dashboard_handler,
    ),
    components(
        schemas(
            HealthResponse,
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::SignInPage,
            subjects::SubjectDto,
            subjects::CreateSubjectRequest,
            subjects::CreateSubjectResponse,
            sessions::LogSessionRequest,
            sessions::StudySessionDto,
            reports::ReportView,
            reports::ReportSummary,
            reports::TimelinePointDto,
            reports::SummaryCardsDto,
            reports::SubjectOption,
            reports::DashboardView,
        )
    ),
    tags(
        (name = "Study Tracker API", description = "Study sessions, subjects and reports.")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
