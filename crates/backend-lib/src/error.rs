// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// Registration against an email that already has an account
    #[error("Authentication failed")]
    DuplicateAccount,

    /// Unknown email or wrong password; the two causes are deliberately
    /// indistinguishable to the caller
    #[error("Authentication failed")]
    InvalidCredentials,

    /// Request to a protected route without an established identity
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated identity lacks the required role
    #[error("Forbidden")]
    Forbidden,

    #[error("Password does not meet complexity requirements")]
    WeakPassword,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Book not found")]
    BookNotFound,

    #[error("Authentication rate limit exceeded")]
    AuthRateLimited,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateAccount
            | AppError::InvalidCredentials
            | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::BookNotFound => StatusCode::NOT_FOUND,
            AppError::WeakPassword | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::AuthRateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    /// `DuplicateAccount` and `InvalidCredentials` share one code so that a
    /// failed registration and a failed login cannot be told apart by the
    /// response body (account enumeration).
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::DuplicateAccount | AppError::InvalidCredentials => "AUTH_001",
            AppError::Unauthorized => "AUTH_002",
            AppError::Forbidden => "AUTH_003",
            AppError::AuthRateLimited => "AUTH_004",
            AppError::WeakPassword => "VAL_001",
            AppError::InvalidInput(_) => "VAL_002",
            AppError::UserNotFound => "NF_001",
            AppError::BookNotFound => "NF_002",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::DuplicateAccount | AppError::InvalidCredentials => {
                "Authentication failed".to_string()
            },
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::AuthRateLimited => {
                "Too many authentication attempts, please try again later".to_string()
            },
            AppError::WeakPassword => {
                "Password does not meet complexity requirements".to_string()
            },
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::UserNotFound => "Resource not found".to_string(),
            AppError::BookNotFound => "Resource not found".to_string(),
            AppError::Io(_) => "Internal server error".to_string(),
            AppError::Json(_) => "Invalid request format".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    /// Whether the detailed `Display` output may be shown to callers.
    /// Authentication failures always use the sanitized message; their
    /// detail must not vary with the cause, even in debug builds.
    fn caller_safe_detail(&self) -> bool {
        !matches!(
            self,
            AppError::DuplicateAccount | AppError::InvalidCredentials
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) && self.caller_safe_detail() {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::DuplicateAccount.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::BookNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::WeakPassword.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::AuthRateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_and_invalid_credentials_indistinguishable() {
        // Same status, same code, same message in every build profile
        let dup = AppError::DuplicateAccount;
        let bad = AppError::InvalidCredentials;

        assert_eq!(dup.status_code(), bad.status_code());
        assert_eq!(dup.error_code(), bad.error_code());
        assert_eq!(dup.sanitized_message(), bad.sanitized_message());
        assert_eq!(dup.to_string(), bad.to_string());
    }

    #[test]
    fn test_app_error_into_response() {
        let response = AppError::BookNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
    }

    #[test]
    fn test_error_from_impls() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));

        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));

        let app_err: AppError = "boom".into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
