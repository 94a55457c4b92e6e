//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BUZZGRAM_API_URL` - Backend origin; `/api` is appended (default:
//!   `http://localhost:3001` in debug builds, the production backend otherwise)
//! - `BUZZGRAM_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `BUZZGRAM_CACHE_TTL_SECS` - Query cache time-to-live (default: 300)
//! - `BUZZGRAM_OWNER_GUARD` - `owner_session` or `consumer_role` (default: `owner_session`)
//! - `BUZZGRAM_STATE_FILE` - Persisted key/value store (default: `$HOME/.buzzgram/state.json`)
//! - `GOOGLE_CLIENT_ID` - Google Identity Services client ID
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use buzzgram_core::guard::BusinessOwnerPolicy;
use thiserror::Error;
use url::Url;

/// Backend used by release builds when `BUZZGRAM_API_URL` is unset.
pub const PRODUCTION_API_ORIGIN: &str = "https://backend-production-f30d.up.railway.app";

/// Backend used by debug builds when `BUZZGRAM_API_URL` is unset.
pub const DEVELOPMENT_API_ORIGIN: &str = "http://localhost:3001";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// BuzzGram client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// API root, always ending in `/api` (no trailing slash)
    pub api_base: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Query cache time-to-live
    pub cache_ttl: Duration,
    /// Which session gates business-owner routes
    pub owner_guard: BusinessOwnerPolicy,
    /// Google Identity Services client ID
    pub google_client_id: Option<String>,
    /// File backing the persisted key/value store
    pub state_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base.as_str())
            .field("request_timeout", &self.request_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("owner_guard", &self.owner_guard)
            .field("google_client_id", &self.google_client_id)
            .field("state_file", &self.state_file)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let origin = get_env_or_default("BUZZGRAM_API_URL", default_origin());
        let api_base = api_root(&origin)
            .map_err(|e| ConfigError::InvalidEnvVar("BUZZGRAM_API_URL".to_string(), e))?;

        let request_timeout = parse_secs("BUZZGRAM_REQUEST_TIMEOUT_SECS", 30)?;
        let cache_ttl = parse_secs("BUZZGRAM_CACHE_TTL_SECS", 300)?;

        let owner_guard = get_optional_env("BUZZGRAM_OWNER_GUARD")
            .map(|v| v.parse::<BusinessOwnerPolicy>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("BUZZGRAM_OWNER_GUARD".to_string(), e))?
            .unwrap_or_default();

        let state_file = get_optional_env("BUZZGRAM_STATE_FILE")
            .map_or_else(default_state_file, PathBuf::from);

        Ok(Self {
            api_base,
            request_timeout,
            cache_ttl,
            owner_guard,
            google_client_id: get_optional_env("GOOGLE_CLIENT_ID"),
            state_file,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Defaults pointed at an explicit backend origin. Used by tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `origin` is not an absolute URL.
    pub fn for_origin(origin: &str) -> Result<Self, ConfigError> {
        let api_base = api_root(origin)
            .map_err(|e| ConfigError::InvalidEnvVar("BUZZGRAM_API_URL".to_string(), e))?;
        Ok(Self {
            api_base,
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
            owner_guard: BusinessOwnerPolicy::default(),
            google_client_id: None,
            state_file: default_state_file(),
            sentry_dsn: None,
        })
    }
}

const fn default_origin() -> &'static str {
    if cfg!(debug_assertions) {
        DEVELOPMENT_API_ORIGIN
    } else {
        PRODUCTION_API_ORIGIN
    }
}

/// `<origin>/api`, tolerating a trailing slash or an origin that already
/// ends in `/api`.
fn api_root(origin: &str) -> Result<Url, String> {
    let trimmed = origin.trim().trim_end_matches('/');
    let root = if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api")
    };
    let url = Url::parse(&root).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("not a base URL: {root}"));
    }
    Ok(url)
}

fn default_state_file() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(PathBuf::new, PathBuf::from)
        .join(".buzzgram")
        .join("state.json")
}

fn parse_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_optional_env(key)
        .map_or(Ok(default), |v| v.parse::<u64>())
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_appends_api() {
        assert_eq!(
            api_root("http://localhost:3001").unwrap().as_str(),
            "http://localhost:3001/api"
        );
        assert_eq!(
            api_root("https://example.com/").unwrap().as_str(),
            "https://example.com/api"
        );
    }

    #[test]
    fn test_api_root_keeps_existing_suffix() {
        assert_eq!(
            api_root("http://127.0.0.1:9000/api/").unwrap().as_str(),
            "http://127.0.0.1:9000/api"
        );
    }

    #[test]
    fn test_api_root_rejects_relative() {
        assert!(api_root("localhost").is_err());
        assert!(api_root("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_for_origin_defaults() {
        let config = ClientConfig::for_origin("http://localhost:4000").unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.owner_guard, BusinessOwnerPolicy::OwnerSession);
        assert!(config.state_file.ends_with(".buzzgram/state.json"));
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let mut config = ClientConfig::for_origin("http://localhost:4000").unwrap();
        config.sentry_dsn = Some("https://key@sentry.example.com/1".to_string());
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("key@sentry"));
    }
}
