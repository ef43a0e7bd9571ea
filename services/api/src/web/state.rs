//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use study_tracker_core::{DatabaseService, GatewayPolicy, IdentityResolver};

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub config: Arc<Config>,
    pub policy: Arc<GatewayPolicy>,
}

impl AppState {
    /// Wires the state together, deriving the gateway policy from the configured mode.
    pub fn new(
        db: Arc<dyn DatabaseService>,
        identity: Arc<dyn IdentityResolver>,
        config: Arc<Config>,
    ) -> Self {
        let policy = Arc::new(GatewayPolicy::with_mode(config.gateway_mode));
        Self {
            db,
            identity,
            config,
            policy,
        }
    }
}
