// ============================
// bookshelf-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::PathBuf;
use serde::Deserialize;
use figment::{Figment, providers::{Env, Format, Json, Toml, Yaml}};
use anyhow::Result;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Secret used to sign bearer tokens; process-wide, fixed for the
    /// process lifetime (no rotation)
    pub token_secret: String,
    /// Token TTL in seconds
    pub token_ttl_secs: u64,
    /// Optional path to a books dataset seeded into the catalog at startup
    pub dataset_path: Option<PathBuf>,
    /// Password requirements
    pub password_requirements: PasswordRequirements,
    /// Login rate limiting
    pub auth_rate_limit: AuthRateLimitSettings,
}

/// Password complexity requirements
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordRequirements {
    /// Minimum password length
    pub min_length: usize,
    /// Require uppercase letters
    pub require_uppercase: bool,
    /// Require lowercase letters
    pub require_lowercase: bool,
    /// Require digits
    pub require_digit: bool,
    /// Require special characters
    pub require_special: bool,
}

/// Failed-login lockout settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthRateLimitSettings {
    /// Failed attempts before lockout
    pub max_attempts: u32,
    /// Lockout duration in seconds
    pub lockout_secs: u64,
}

/// Development-only signing secret; startup warns when it is in use
pub const DEV_TOKEN_SECRET: &str = "bookshelf-dev-secret-change-in-production";

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            token_secret: DEV_TOKEN_SECRET.to_string(),
            token_ttl_secs: 60 * 60 * 24, // 24 hours
            dataset_path: None,
            password_requirements: PasswordRequirements::default(),
            auth_rate_limit: AuthRateLimitSettings::default(),
        }
    }
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 10,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

impl Default for AuthRateLimitSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_secs: 5 * 60,
        }
    }
}

impl Settings {
    /// Load settings from config files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings with an explicit TOML path
    pub fn load_from(toml_path: &str) -> Result<Self> {
        let settings = Figment::new()
            .merge(Toml::file(toml_path))
            .merge(Yaml::file("config.yaml"))
            .merge(Json::file("config.json"))
            .merge(Env::prefixed("BOOKSHELF_"))
            .extract::<PartialSettings>()?
            .into_settings();

        Ok(settings)
    }
}

/// All fields optional so a bare environment still yields defaults
#[derive(Debug, Default, Deserialize)]
struct PartialSettings {
    bind_addr: Option<SocketAddr>,
    log_level: Option<String>,
    token_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    dataset_path: Option<PathBuf>,
    password_requirements: Option<PasswordRequirements>,
    auth_rate_limit: Option<AuthRateLimitSettings>,
}

impl PartialSettings {
    fn into_settings(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            bind_addr: self.bind_addr.unwrap_or(defaults.bind_addr),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            token_secret: self.token_secret.unwrap_or(defaults.token_secret),
            token_ttl_secs: self.token_ttl_secs.unwrap_or(defaults.token_ttl_secs),
            dataset_path: self.dataset_path.or(defaults.dataset_path),
            password_requirements: self
                .password_requirements
                .unwrap_or(defaults.password_requirements),
            auth_rate_limit: self.auth_rate_limit.unwrap_or(defaults.auth_rate_limit),
        }
    }
}
