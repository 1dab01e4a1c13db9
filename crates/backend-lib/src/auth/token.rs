// ============================
// bookshelf-backend-lib/src/auth/token.rs
// ============================
//! Signed bearer token issuance and validation.
//!
//! Tokens are compact three-segment JWTs signed with HMAC-SHA256 under a
//! process-wide secret. They are self-contained: validation needs only the
//! shared secret, no server-side session state, so it scales horizontally.
//! The signing key is fixed for the process lifetime; rotation is a known
//! limitation.
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id, not a display name, so identity survives
    /// username changes
    pub sub: String,
    /// Issued-at, unix seconds
    pub iat: u64,
    /// Expiry, unix seconds
    pub exp: u64,
}

/// Why a presented token was rejected. Callers collapse all variants to
/// "unauthenticated"; the distinction exists for logging only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

/// Issues and validates signed, time-bounded bearer tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` with the configured TTL
    pub fn issue(&self, subject: Uuid) -> anyhow::Result<String> {
        self.issue_at(subject, SystemTime::now())
    }

    /// Issue a token as of an explicit instant
    pub fn issue_at(&self, subject: Uuid, now: SystemTime) -> anyhow::Result<String> {
        let iat = unix_seconds(now);
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp: iat + self.ttl.as_secs(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Validate a presented token and return its subject.
    /// Fails on a bad signature, a malformed payload, a non-UUID subject,
    /// or expiry. All failures are recoverable values, never panics.
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        self.validate_at(token, SystemTime::now())
    }

    /// Validate against an explicit instant. Expiry is strict: a token is
    /// rejected from its exact `exp` second onward, with no leeway window.
    pub fn validate_at(&self, token: &str, now: SystemTime) -> Result<Uuid, TokenError> {
        // Signature and structure checks are jsonwebtoken's; the MAC
        // comparison inside is constant-time. Expiry is checked here
        // against the caller's clock instead of the library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| TokenError::Invalid)?;

        if unix_seconds(now) >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

fn unix_seconds(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
