//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory; in production
//! the deployment platform injects them as environment variables.

use std::env;

/// Bounds for the metadata-fetch timeout (seconds).
const METADATA_TIMEOUT_MIN_SECS: u64 = 5;
const METADATA_TIMEOUT_MAX_SECS: u64 = 15;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL for CORS and cookie attributes
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session cookie / JWT lifetime in days (7 or 14 depending on deployment)
    pub session_ttl_days: i64,
    /// Timeout for URL metadata fetches, clamped to 5-15 seconds
    pub metadata_timeout_secs: u64,
    /// Per-IP budget for auth and claim endpoints (requests per minute)
    pub auth_rate_limit_per_minute: u32,
    /// Per-IP budget for the general API surface (requests per minute)
    pub api_rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, secrets can be set via a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            session_ttl_days: parse_env_or("SESSION_TTL_DAYS", 7),
            metadata_timeout_secs: parse_env_or("METADATA_TIMEOUT_SECS", 10)
                .clamp(METADATA_TIMEOUT_MIN_SECS, METADATA_TIMEOUT_MAX_SECS),
            auth_rate_limit_per_minute: parse_env_or("AUTH_RATE_LIMIT_PER_MINUTE", 10),
            api_rate_limit_per_minute: parse_env_or("API_RATE_LIMIT_PER_MINUTE", 100),
        })
    }

    /// Whether session cookies should carry the `Secure` attribute.
    ///
    /// Derived from the frontend URL scheme so local HTTP development
    /// keeps working without a separate flag.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            session_ttl_days: 7,
            metadata_timeout_secs: 5,
            auth_rate_limit_per_minute: 10,
            api_rate_limit_per_minute: 100,
        }
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
