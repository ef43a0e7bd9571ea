//! services/api/src/web/middleware.rs
//!
//! The session gateway that runs in front of every route.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use std::sync::Arc;
use study_tracker_core::{GatewayDecision, ResolvedIdentity};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::web::cookies::{
    read_session_cookie, refresh_window, session_cookie, session_ttl, sets_session_cookie,
};
use crate::web::state::AppState;

/// The signed-in caller, inserted into request extensions by the gateway.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub session_id: String,
}

/// Resolves the caller from the `session` cookie and applies the gateway policy.
///
/// Anonymous callers on protected paths are sent to sign-in with the original path
/// as `redirectTo`; signed-in callers on sign-in/sign-up pages are sent to the
/// landing page. Everything else passes through with `CurrentUser` attached when
/// one resolved.
pub async fn session_gateway(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Resolve the caller. A failing backend counts as anonymous.
    let identity = match read_session_cookie(req.headers()) {
        Some(token) => match state.identity.resolve(token).await {
            Ok(identity) => identity,
            Err(e) => {
                error!("Failed to resolve session: {:?}", e);
                None
            }
        },
        None => None,
    };

    // 2. Apply the redirect policy.
    let path = req.uri().path().to_string();
    match state.policy.decide(&path, identity.is_some()) {
        GatewayDecision::RedirectToSignIn { redirect_to } => {
            debug!("Anonymous request to {}, redirecting to sign-in", path);
            let location = state.policy.sign_in_location(&redirect_to);
            return Redirect::temporary(&location).into_response();
        }
        GatewayDecision::RedirectToLanding => {
            debug!("Signed-in request to {}, redirecting to landing", path);
            return Redirect::temporary(&state.policy.landing_path).into_response();
        }
        GatewayDecision::Pass => {}
    }

    // 3. Extend sessions that are about to lapse.
    let refreshed_cookie = match &identity {
        Some(identity) => refresh_session(&state, identity).await,
        None => None,
    };

    if let Some(identity) = identity {
        req.extensions_mut().insert(CurrentUser {
            user_id: identity.user_id,
            session_id: identity.session_id,
        });
    }

    // 4. Continue to the handler
    let mut response = next.run(req).await;

    // Handlers that set or clear the cookie themselves win.
    if let Some(cookie) = refreshed_cookie {
        if !sets_session_cookie(response.headers()) {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => warn!("Dropping refreshed session cookie: {}", e),
            }
        }
    }
    response
}

/// Returns the cookie to send back when the session was extended. Failures are
/// logged and the request carries on with the old expiry.
async fn refresh_session(state: &AppState, identity: &ResolvedIdentity) -> Option<String> {
    let now = Utc::now();
    if identity.expires_at - now > refresh_window() {
        return None;
    }
    match state
        .db
        .extend_auth_session(&identity.session_id, now + session_ttl())
        .await
    {
        Ok(()) => {
            debug!("Extended auth session for user {}", identity.user_id);
            Some(session_cookie(&identity.session_id))
        }
        Err(e) => {
            warn!("Failed to extend auth session for user {}: {:?}", identity.user_id, e);
            None
        }
    }
}
