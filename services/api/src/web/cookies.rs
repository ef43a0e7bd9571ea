//! services/api/src/web/cookies.rs
//!
//! The `session` cookie: how it is written, cleared and read back.

use axum::http::{header, HeaderMap};
use chrono::Duration;

pub const SESSION_COOKIE: &str = "session";

/// Lifetime of a fresh or refreshed auth session.
pub fn session_ttl() -> Duration {
    Duration::days(30)
}

/// Sessions closer than this to expiry are extended by the gateway.
pub fn refresh_window() -> Duration {
    Duration::days(7)
}

pub fn session_cookie(auth_session_id: &str) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        auth_session_id,
        session_ttl().num_seconds()
    )
}

pub fn cleared_session_cookie() -> String {
    format!("{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Finds the session id in the request's `Cookie` headers.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            let (name, value) = c.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
        })
}

/// Whether a response already sets the session cookie.
pub fn sets_session_cookie(headers: &HeaderMap) -> bool {
    let prefix = format!("{}=", SESSION_COOKIE);
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}
