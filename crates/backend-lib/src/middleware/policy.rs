// ============================
// crates/backend-lib/src/middleware/policy.rs
// ============================
//! Declarative route authorization.
//!
//! A static, ordered table maps route patterns to the authentication state
//! they require. The table is evaluated after the identity filter and
//! before handler dispatch; the first matching rule wins, so more specific
//! patterns must be listed before catch-alls. At this layer an absent
//! token and an invalid-but-present token are indistinguishable: both are
//! simply "no identity".

use axum::{extract::{Request, State}, middleware::Next, response::Response};
use crate::error::AppError;
use crate::models::{AuthenticatedUser, Role};
use crate::AppState;

/// Authentication state a route requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    /// Authenticated with the given role
    RequireRole(Role),
}

/// One pattern -> requirement rule.
/// A pattern is an exact path, or a prefix when it ends with `*`.
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    access: Access,
}

/// Ordered route-pattern -> required-state table
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<Rule>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; earlier rules take precedence
    pub fn rule(mut self, pattern: &str, access: Access) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            access,
        });
        self
    }

    /// The table used by the default router: auth and catalog reads are
    /// public, everything else requires an authenticated identity.
    pub fn standard() -> Self {
        Self::new()
            .rule("/health", Access::Public)
            .rule("/api/v1/auth/*", Access::Public)
            .rule("/api/v1/books", Access::Public)
            .rule("/api/v1/books/*", Access::Public)
            .rule("/api/v1/ratings", Access::Authenticated)
            .rule("/api/v1/private/*", Access::Authenticated)
            .rule("*", Access::Authenticated)
    }

    /// Required state for a path; unmatched paths require authentication
    pub fn access_for(&self, path: &str) -> Access {
        for rule in &self.rules {
            if pattern_matches(&rule.pattern, path) {
                return rule.access;
            }
        }
        Access::Authenticated
    }

    /// Evaluate the table against a resolved (or absent) identity
    pub fn check(
        &self,
        path: &str,
        identity: Option<&AuthenticatedUser>,
    ) -> Result<(), AppError> {
        match self.access_for(path) {
            Access::Public => Ok(()),
            Access::Authenticated => {
                identity.map(|_| ()).ok_or(AppError::Unauthorized)
            },
            Access::RequireRole(role) => match identity {
                None => Err(AppError::Unauthorized),
                Some(identity) if identity.has_role(role) => Ok(()),
                Some(_) => Err(AppError::Forbidden),
            },
        }
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path == pattern,
    }
}

/// Authorization gate middleware; runs after the identity filter
pub async fn authorize(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = request.extensions().get::<AuthenticatedUser>();
    state.policy.check(request.uri().path(), identity)?;

    Ok(next.run(request).await)
}
