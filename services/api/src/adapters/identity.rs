//! services/api/src/adapters/identity.rs
//!
//! Resolves the `session` cookie value against the stored auth sessions.

use async_trait::async_trait;
use std::sync::Arc;
use study_tracker_core::ports::{
    DatabaseService, IdentityResolver, PortError, PortResult, ResolvedIdentity,
};

/// An `IdentityResolver` that treats the cookie as an opaque session id and asks
/// the database who owns it.
pub struct SessionResolver {
    db: Arc<dyn DatabaseService>,
}

impl SessionResolver {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityResolver for SessionResolver {
    async fn resolve(&self, token: &str) -> PortResult<Option<ResolvedIdentity>> {
        if token.is_empty() {
            return Ok(None);
        }
        match self.db.validate_auth_session(token).await {
            Ok((user_id, expires_at)) => Ok(Some(ResolvedIdentity {
                user_id,
                session_id: token.to_string(),
                expires_at,
            })),
            Err(PortError::Unauthorized) | Err(PortError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
