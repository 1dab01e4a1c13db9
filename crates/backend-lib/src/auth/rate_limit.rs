// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for authentication attempts.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::config::AuthRateLimitSettings;

/// Default number of failed attempts before rate limiting
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (5 minutes)
const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Entry in the rate limit map
#[derive(Debug, Clone)]
struct RateLimitEntry {
    /// Number of failed attempts
    failed_attempts: u32,
    /// Time of the last failed attempt
    last_failure: Instant,
    /// Whether the client is currently locked out
    is_locked_out: bool,
    /// When the lockout expires
    lockout_expiry: Option<Instant>,
}

/// Rate limiter for authentication attempts, keyed by client address
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    /// Map of client keys to rate limit entries
    attempts: Arc<DashMap<String, RateLimitEntry>>,
    /// Maximum number of failed attempts before lockout
    max_attempts: u32,
    /// Duration of lockout period
    lockout_duration: Duration,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_DURATION)
    }
}

impl AuthRateLimiter {
    /// Create a new auth rate limiter
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
        }
    }

    pub fn from_settings(settings: &AuthRateLimitSettings) -> Self {
        Self::new(
            settings.max_attempts,
            Duration::from_secs(settings.lockout_secs),
        )
    }

    /// Record a failed authentication attempt
    pub fn record_failed_attempt(&self, client: &str) {
        let now = Instant::now();

        let mut entry = self
            .attempts
            .entry(client.to_string())
            .or_insert_with(|| RateLimitEntry {
                failed_attempts: 0,
                last_failure: now,
                is_locked_out: false,
                lockout_expiry: None,
            });

        // Reset if a previous lockout has expired
        if let Some(expiry) = entry.lockout_expiry {
            if now > expiry {
                entry.is_locked_out = false;
                entry.failed_attempts = 0;
                entry.lockout_expiry = None;
            }
        }

        entry.failed_attempts += 1;
        entry.last_failure = now;

        if entry.failed_attempts >= self.max_attempts {
            entry.is_locked_out = true;
            entry.lockout_expiry = Some(now + self.lockout_duration);

            tracing::warn!(client, "client locked out after repeated auth failures");
        }
    }

    /// Record a successful authentication
    pub fn record_success(&self, client: &str) {
        self.attempts.remove(client);
    }

    /// Check if a client is allowed to attempt authentication
    pub fn check_rate_limit(&self, client: &str) -> bool {
        if let Some(entry) = self.attempts.get(client) {
            if entry.is_locked_out {
                if let Some(expiry) = entry.lockout_expiry {
                    if Instant::now() < expiry {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Clean up expired lockouts and stale entries
    pub fn cleanup(&self) {
        let now = Instant::now();

        self.attempts.retain(|_, entry| {
            if entry.is_locked_out {
                if let Some(expiry) = entry.lockout_expiry {
                    return now < expiry;
                }
            }

            now.duration_since(entry.last_failure) < Duration::from_secs(24 * 60 * 60)
        });
    }
}
