// ============================
// crates/backend-lib/src/middleware/identity.rs
// ============================
//! Per-request identity establishment.
//!
//! Runs once per inbound request, before any handler. A presented bearer
//! token that validates is resolved to an account and stored in the
//! request extensions as an [`AuthenticatedUser`]; everything else - no
//! token, a failing token, an account deleted after issuance - leaves the
//! request unauthenticated and proceeds. Rejection is not this filter's
//! job; the policy gate decides, so public and protected routes share one
//! pipeline.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use crate::error::AppError;
use crate::models::AuthenticatedUser;
use crate::AppState;

/// Identity filter middleware; never rejects
pub async fn identify(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.auth.identify(token).await {
            Some(identity) => {
                request.extensions_mut().insert(identity);
            },
            None => {
                tracing::debug!("presented token did not resolve to an identity");
            },
        }
    }

    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor for handlers that need the request identity.
/// Rejects with `Unauthorized` when the identity filter left the request
/// unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
