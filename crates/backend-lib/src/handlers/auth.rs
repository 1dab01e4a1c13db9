// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Registration and login endpoints.

use axum::{extract::State, http::{HeaderMap, StatusCode}, Json};
use bookshelf_common::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::User;
use crate::validation;
use crate::AppState;

/// `POST /api/v1/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validation::validate_email(&request.email)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    validation::validate_password(&request.password)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let (user, token) = state.auth.register(&request.email, &request.password).await?;

    Ok((StatusCode::CREATED, Json(auth_response(user, token))))
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let client = client_key(&headers);
    if !state.auth_limiter.check_rate_limit(&client) {
        return Err(AppError::AuthRateLimited);
    }

    match state.auth.authenticate(&request.email, &request.password).await {
        Ok((user, token)) => {
            state.auth_limiter.record_success(&client);
            Ok(Json(auth_response(user, token)))
        },
        Err(err) => {
            if matches!(err, AppError::InvalidCredentials) {
                state.auth_limiter.record_failed_attempt(&client);
            }
            Err(err)
        },
    }
}

fn auth_response(user: User, token: String) -> AuthResponse {
    AuthResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    }
}

/// Client key for auth rate limiting: the proxy-provided address when
/// present, a shared bucket otherwise
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
