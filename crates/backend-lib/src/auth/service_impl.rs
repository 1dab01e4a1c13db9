use std::sync::Arc;
use async_trait::async_trait;
use crate::auth::password;
use crate::auth::token::TokenService;
use crate::auth::AuthService;
use crate::config::PasswordRequirements;
use crate::error::AppError;
use crate::models::{AuthenticatedUser, User};
use crate::store::UserStore;

pub struct DefaultAuth {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    requirements: PasswordRequirements,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: TokenService,
        requirements: PasswordRequirements,
    ) -> Self {
        Self {
            users,
            tokens,
            requirements,
        }
    }

    fn issue_token(&self, user: &User) -> Result<String, AppError> {
        self.tokens
            .issue(user.id)
            .map_err(|e| AppError::Internal(format!("token issuance failed: {e}")))
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        if !password::validate_password_strength(password, &self.requirements) {
            return Err(AppError::WeakPassword);
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateAccount);
        }

        // Hashing is deliberately slow; keep it off the async workers
        let mut plain = password.to_string();
        let hash = tokio::task::spawn_blocking(move || password::hash_password_secure(&mut plain))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        let user = User::registered(email.to_string(), hash);

        // The store's uniqueness constraint closes the window between the
        // lookup above and this insert
        let user = match self.users.insert(user).await? {
            Ok(user) => user,
            Err(_) => return Err(AppError::DuplicateAccount),
        };

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "account registered");

        Ok((user, token))
    }

    async fn authenticate(&self, email: &str, password: &str)
        -> Result<(User, String), AppError>
    {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let hash = user.password_hash.clone();
        let plain = password.to_string();
        let verified =
            tokio::task::spawn_blocking(move || password::verify_password(&hash, &plain))
                .await
                .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?;

        if !verified {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        tracing::debug!(user_id = %user.id, "login succeeded");

        Ok((user, token))
    }

    async fn identify(&self, token: &str) -> Option<AuthenticatedUser> {
        let subject = self.tokens.validate(token).ok()?;

        // An account deleted after issuance resolves to no identity, not
        // an error
        let user = self.users.find_by_id(subject).await.ok().flatten()?;

        Some(AuthenticatedUser::new(user))
    }
}
