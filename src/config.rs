//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first when present.

use crate::services::ClockingStartPolicy;
use std::env;

/// Default token lifetime: one hour.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Allowed CORS origin (the frontend)
    pub frontend_url: String,
    /// Directory profile images are served from
    pub upload_dir: String,
    /// Which event a user with no clocking history may start with
    pub clocking_start: ClockingStartPolicy,
    /// Lifetime of issued access tokens
    pub token_ttl_secs: u64,

    // --- Secrets ---
    /// JWT signing key for access tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Administrator seeded at startup, when both are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            upload_dir: "data/img".to_string(),
            clocking_start: ClockingStartPolicy::RequireIn,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            admin_email: None,
            admin_password: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let clocking_start = match env::var("CLOCKING_FIRST_EVENT") {
            Ok(raw) => raw
                .parse()
                .map_err(|reason| ConfigError::Invalid("CLOCKING_FIRST_EVENT", reason))?,
            Err(_) => ClockingStartPolicy::default(),
        };

        let token_ttl_secs = match env::var("TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("TOKEN_TTL_SECS", raw.clone()))?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://employees.db".to_string()),
            frontend_url: env::var("CORS")
                .or_else(|_| env::var("FRONTEND_URL"))
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "data/img".to_string()),
            clocking_start,
            token_ttl_secs,

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
        })
    }

    /// Administrator credentials to seed, if both are configured.
    pub fn admin_seed(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
