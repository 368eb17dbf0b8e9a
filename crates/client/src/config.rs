//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `OAKLINE_API_BASE_URL` - Backend base URL (default: `http://localhost:5005`)
//! - `OAKLINE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `OAKLINE_CREDENTIALS_PATH` - Credential store file
//!   (default: `<config dir>/oakline/credentials.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend base URL for local development.
const DEFAULT_API_BASE_URL: &str = "http://localhost:5005";

/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Could not determine a configuration directory for this platform")]
    NoConfigDir,
}

/// Oakline client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base URL.
    pub api_base_url: Url,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Path of the durable credential store file.
    pub credentials_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// platform configuration directory can be resolved for the default
    /// credential path.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("OAKLINE_API_BASE_URL", DEFAULT_API_BASE_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("OAKLINE_API_BASE_URL".to_string(), e.to_string())
            })?;

        let timeout_secs = get_env_or_default(
            "OAKLINE_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("OAKLINE_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let credentials_path = match get_optional_env("OAKLINE_CREDENTIALS_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_credentials_path()?,
        };

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            credentials_path,
        })
    }
}

/// Default credential store location under the platform config directory.
fn default_credentials_path() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    path.push("oakline");
    path.push("credentials.json");
    Ok(path)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_parses() {
        let url = DEFAULT_API_BASE_URL.parse::<Url>().unwrap();
        assert_eq!(url.port(), Some(5005));
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(DEFAULT_REQUEST_TIMEOUT_SECS, 15);
    }
}
