use async_trait::async_trait;
use crate::error::AppError;
use crate::models::{AuthenticatedUser, User};

/// Authentication workflow: credential registration, password login, and
/// per-request identity resolution from a presented bearer token.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account and issue its first token.
    /// Fails with `DuplicateAccount` when the email is already registered,
    /// whether detected by the lookup or by the store's uniqueness
    /// constraint on insert.
    async fn register(&self, email: &str, password: &str) -> Result<(User, String), AppError>;

    /// Verify credentials and issue a fresh token.
    /// Unknown email and wrong password both fail with
    /// `InvalidCredentials`; the causes are not distinguishable.
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<(User, String), AppError>;

    /// Resolve a presented token to an authenticated identity.
    /// Any failure - bad signature, malformed payload, expiry, or an
    /// account deleted after issuance - collapses to `None`.
    async fn identify(&self, token: &str) -> Option<AuthenticatedUser>;
}
