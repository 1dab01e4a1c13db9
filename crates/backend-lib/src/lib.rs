// ============================
// bookshelf-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the Bookshelf catalog server.

pub mod auth;
pub mod config;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod store;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;
use crate::auth::{AuthRateLimiter, AuthService, DefaultAuth, TokenService};
use crate::config::Settings;
use crate::middleware::AccessPolicy;
use crate::store::{
    BookStore, MemoryBookStore, MemoryRatingStore, MemoryUserStore, RatingStore, UserStore,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication workflow
    pub auth: Arc<dyn AuthService>,
    /// Account store
    pub users: Arc<dyn UserStore>,
    /// Catalog store
    pub books: Arc<dyn BookStore>,
    /// Rating store
    pub ratings: Arc<dyn RatingStore>,
    /// Failed-login rate limiter
    pub auth_limiter: Arc<AuthRateLimiter>,
    /// Route authorization table
    pub policy: Arc<AccessPolicy>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create application state with in-memory stores and the standard
    /// authorization policy
    pub fn new(settings: Settings) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let books: Arc<dyn BookStore> = Arc::new(MemoryBookStore::new());
        let ratings: Arc<dyn RatingStore> = Arc::new(MemoryRatingStore::new());
        Self::with_stores(settings, users, books, ratings)
    }

    /// Create application state over caller-provided stores
    pub fn with_stores(
        settings: Settings,
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        let tokens = TokenService::new(
            &settings.token_secret,
            Duration::from_secs(settings.token_ttl_secs),
        );
        let auth = Arc::new(DefaultAuth::new(
            users.clone(),
            tokens,
            settings.password_requirements.clone(),
        ));
        let auth_limiter = Arc::new(AuthRateLimiter::from_settings(&settings.auth_rate_limit));

        Self {
            auth,
            users,
            books,
            ratings,
            auth_limiter,
            policy: Arc::new(AccessPolicy::standard()),
            settings: Arc::new(settings),
        }
    }
}
