//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for sign-up, sign-in and sign-out.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_tracker_core::PortError;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::cookies::{cleared_session_cookie, read_session_cookie, session_cookie, session_ttl};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Where to go after signing in, as handed out by the gateway's `redirectTo`.
    #[serde(default)]
    pub redirect_to: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub redirect_to: String,
}

#[derive(Deserialize)]
pub struct SignInPageQuery {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SignInPage {
    pub redirect_to: Option<String>,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Only same-site absolute paths are honoured as return targets.
fn safe_redirect_target(target: Option<String>, landing: &str) -> String {
    match target {
        Some(t) if t.starts_with('/') && !t.starts_with("//") => t,
        _ => landing.to_string(),
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), (StatusCode, String)> {
    if !email.contains('@') || email.trim().len() < 3 {
        return Err((StatusCode::BAD_REQUEST, "A valid email is required".to_string()));
    }
    if password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "A password is required".to_string()));
    }
    Ok(())
}

/// Creates the stored auth session and the cookie that points at it.
async fn start_session(state: &AppState, user_id: Uuid) -> Result<String, (StatusCode, String)> {
    let auth_session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + session_ttl();

    state
        .db
        .create_auth_session(&auth_session_id, user_id, expires_at)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session".to_string())
        })?;

    Ok(session_cookie(&auth_session_id))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /sign-in - Describe the sign-in page, echoing the return target
#[utoipa::path(
    get,
    path = "/sign-in",
    params(("redirectTo" = Option<String>, Query, description = "Path to return to after signing in.")),
    responses((status = 200, description = "Sign-in page", body = SignInPage))
)]
pub async fn sign_in_page_handler(Query(query): Query<SignInPageQuery>) -> Json<SignInPage> {
    Json(SignInPage {
        redirect_to: query.redirect_to,
    })
}

/// POST /sign-up - Create a new user account
#[utoipa::path(
    post,
    path = "/sign-up",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let email = req.email.trim().to_lowercase();
    validate_credentials(&email, &req.password)?;

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password".to_string())
        })?
        .to_string();

    // 2. Create user in database
    let user = state
        .db
        .create_user_with_email(&email, &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
            e => {
                error!("Failed to create user: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user".to_string())
            }
        })?;

    // 3. Open a session for the new account
    let cookie = start_session(&state, user.user_id).await?;
    info!("Created account for user {}", user.user_id);

    let response = AuthResponse {
        user_id: user.user_id,
        email: user.email.unwrap_or(email),
        redirect_to: state.policy.landing_path.clone(),
    };

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /sign-in - Login with existing account
#[utoipa::path(
    post,
    path = "/sign-in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let email = req.email.trim().to_lowercase();

    // 1. Get user by email
    let user_creds = state.db.get_user_by_email(&email).await.map_err(|e| {
        error!("Failed to get user: {:?}", e);
        (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
    })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&user_creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Authentication error".to_string())
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err((StatusCode::UNAUTHORIZED, "Invalid email or password".to_string()));
    }

    // 3. Open a session
    let cookie = start_session(&state, user_creds.user_id).await?;

    let response = AuthResponse {
        user_id: user_creds.user_id,
        email: user_creds.email,
        redirect_to: safe_redirect_target(req.redirect_to, &state.policy.landing_path),
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /sign-out - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/sign-out",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Extract session cookie
    let auth_session_id = read_session_cookie(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    // 2. Delete auth session from database
    state
        .db
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
        })?;

    // 3. Clear cookie
    Ok((StatusCode::OK, [(header::SET_COOKIE, cleared_session_cookie())]))
}
