//! crates/study_tracker_core/src/gateway.rs
//!
//! The path policy applied to every inbound request: which paths need a signed-in
//! user, which are only for signed-out users, and where each kind of caller is sent.

use std::str::FromStr;

/// Which list decides whether a path is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayMode {
    /// Only paths under `protected_prefixes` need a user.
    #[default]
    ProtectedPrefixes,
    /// Every path needs a user unless it matches `public_paths`.
    PublicPrefixes,
}

impl FromStr for GatewayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "protected-prefixes" => Ok(GatewayMode::ProtectedPrefixes),
            "public-prefixes" => Ok(GatewayMode::PublicPrefixes),
            other => Err(format!(
                "'{}' is not one of: protected-prefixes, public-prefixes",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    Exact(String),
    Prefix(String),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(p) => path == p,
            PathMatch::Prefix(p) => path.starts_with(p.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayDecision {
    Pass,
    /// `redirect_to` is the original path, to return to after signing in.
    RedirectToSignIn { redirect_to: String },
    RedirectToLanding,
}

#[derive(Debug, Clone)]
pub struct GatewayPolicy {
    pub mode: GatewayMode,
    pub protected_prefixes: Vec<String>,
    pub public_paths: Vec<PathMatch>,
    pub auth_only_prefixes: Vec<String>,
    pub sign_in_path: String,
    pub landing_path: String,
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        Self::with_mode(GatewayMode::default())
    }
}

impl GatewayPolicy {
    pub fn with_mode(mode: GatewayMode) -> Self {
        let owned = |paths: &[&str]| paths.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        let mut public_paths: Vec<PathMatch> = [
            "/sign-in",
            "/sign-up",
            "/sign-out",
            "/auth",
            "/health",
            "/api-docs",
            "/swagger-ui",
        ]
        .iter()
        .map(|p| PathMatch::Prefix(p.to_string()))
        .collect();
        public_paths.push(PathMatch::Exact("/".to_string()));

        Self {
            mode,
            protected_prefixes: owned(&[
                "/dashboard",
                "/sessions",
                "/my-decks",
                "/progress",
                "/timer",
                "/profile",
                "/settings",
                "/reports",
                "/goals",
                "/achievements",
            ]),
            public_paths,
            auth_only_prefixes: owned(&["/sign-in", "/sign-up"]),
            sign_in_path: "/sign-in".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        match self.mode {
            GatewayMode::ProtectedPrefixes => self
                .protected_prefixes
                .iter()
                .any(|p| path.starts_with(p.as_str())),
            GatewayMode::PublicPrefixes => !self.public_paths.iter().any(|m| m.matches(path)),
        }
    }

    pub fn is_auth_only(&self, path: &str) -> bool {
        self.auth_only_prefixes
            .iter()
            .any(|p| path.starts_with(p.as_str()))
    }

    pub fn decide(&self, path: &str, authenticated: bool) -> GatewayDecision {
        if !authenticated && self.is_protected(path) {
            return GatewayDecision::RedirectToSignIn {
                redirect_to: path.to_string(),
            };
        }
        if authenticated && self.is_auth_only(path) {
            return GatewayDecision::RedirectToLanding;
        }
        GatewayDecision::Pass
    }

    /// The sign-in location carrying `redirectTo`.
    pub fn sign_in_location(&self, redirect_to: &str) -> String {
        format!("{}?redirectTo={}", self.sign_in_path, encode_query_value(redirect_to))
    }
}

/// Percent-encodes everything except RFC 3986 unreserved characters and `/`.
pub fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
