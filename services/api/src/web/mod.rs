pub mod auth;
pub mod client;
pub mod cookies;
pub mod middleware;
pub mod reports;
pub mod rest;
pub mod sessions;
pub mod state;
pub mod subjects;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use client::UserClient;
pub use middleware::{session_gateway, CurrentUser};
pub use state::AppState;

/// Builds the application routes with the session gateway in front of all of them,
/// including the fallback, so unknown protected paths still redirect.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(rest::health_handler))
        // Auth pages
        .route(
            "/sign-in",
            get(auth::sign_in_page_handler).post(auth::login_handler),
        )
        .route("/sign-up", post(auth::signup_handler))
        .route("/sign-out", post(auth::logout_handler))
        // Data
        .route(
            "/subjects",
            get(subjects::list_subjects_handler).post(subjects::create_subject_handler),
        )
        .route(
            "/sessions",
            get(sessions::list_sessions_handler).post(sessions::log_session_handler),
        )
        .route("/reports", get(reports::reports_handler))
        .route("/dashboard", get(reports::dashboard_handler))
        .fallback(rest::not_found_handler)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_gateway,
        ))
        .with_state(app_state)
}
