//! services/api/src/web/subjects.rs
//!
//! Subject listing and the subject creation action used by the picker.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use study_tracker_core::{Subject, SubjectColor};
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::client::UserClient;

#[derive(Serialize, ToSchema)]
pub struct SubjectDto {
    pub id: Uuid,
    pub name: String,
    /// Palette hex value, e.g. `#06b6d4`.
    pub color: String,
}

impl From<Subject> for SubjectDto {
    fn from(s: Subject) -> Self {
        Self {
            id: s.id,
            name: s.name,
            color: s.color.hex().to_string(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSubjectRequest {
    pub name: String,
    /// One of the eight palette colors; cyan when omitted.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateSubjectResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectDto>,
}

/// List the caller's subjects, ordered by name.
#[utoipa::path(
    get,
    path = "/subjects",
    responses(
        (status = 200, description = "The caller's subjects", body = [SubjectDto]),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_subjects_handler(client: UserClient) -> Result<Json<Vec<SubjectDto>>, ApiError> {
    let subjects = client.subjects().await?;
    Ok(Json(subjects.into_iter().map(SubjectDto::from).collect()))
}

fn rejected() -> (StatusCode, Json<CreateSubjectResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(CreateSubjectResponse {
            success: false,
            subject: None,
        }),
    )
}

/// Create a subject.
#[utoipa::path(
    post,
    path = "/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = CreateSubjectResponse),
        (status = 400, description = "Blank name or unknown color", body = CreateSubjectResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn create_subject_handler(
    client: UserClient,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<CreateSubjectResponse>), ApiError> {
    if req.name.trim().is_empty() {
        return Ok(rejected());
    }

    let color = match req.color.as_deref() {
        Some(hex) => match SubjectColor::from_hex(hex) {
            Some(color) => color,
            None => {
                debug!("Rejected off-palette subject color '{}'", hex);
                return Ok(rejected());
            }
        },
        None => SubjectColor::default(),
    };

    let subject = client.create_subject(&req.name, color).await?;
    info!("User {} created subject {}", client.user_id(), subject.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateSubjectResponse {
            success: true,
            subject: Some(subject.into()),
        }),
    ))
}
