//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKING_API_URL` - Base URL of the booking API (alias: `NEXT_PUBLIC_API_URL`).
//!   Absence is reported when the first request is attempted, not at load time.
//! - `BOOKING_SESSION_FILE` - Where the session credential is stored
//!   (default: `$HOME/.booking-console/session`)
//! - `BOOKING_DISPLAY_TZ` - IANA timezone used for rendering dates
//!   (default: `Europe/Stockholm`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;

use chrono_tz::Tz;
use thiserror::Error;

/// Business home timezone; dates are rendered here regardless of the viewer.
pub const DEFAULT_DISPLAY_TZ: Tz = chrono_tz::Europe::Stockholm;

const SESSION_DIR: &str = ".booking-console";
const SESSION_FILE: &str = "session";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the booking API, validated when present
    pub api_base_url: Option<String>,
    /// Credential file; `None` means durable storage is unavailable
    pub session_file: Option<PathBuf>,
    /// Timezone for rendering dates
    pub display_tz: Tz,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = match get("BOOKING_API_URL").or_else(|| get("NEXT_PUBLIC_API_URL")) {
            Some(raw) => Some(validate_base_url(&raw)?),
            None => None,
        };

        let session_file = get("BOOKING_SESSION_FILE").map(PathBuf::from).or_else(|| {
            get("HOME").map(|home| PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE))
        });

        let display_tz = match get("BOOKING_DISPLAY_TZ") {
            Some(name) => name.trim().parse::<Tz>().map_err(|e| {
                ConfigError::InvalidEnvVar("BOOKING_DISPLAY_TZ".to_string(), e.to_string())
            })?,
            None => DEFAULT_DISPLAY_TZ,
        };

        let sentry_sample_rate = get("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_base_url,
            session_file,
            display_tz,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }

    /// Configuration pointing at `base_url` with no durable session storage.
    #[must_use]
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: Some(base_url.into()),
            session_file: None,
            display_tz: DEFAULT_DISPLAY_TZ,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }

    /// Require the API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when no base URL is configured.
    pub fn require_api_base_url(&self) -> Result<&str, ConfigError> {
        self.api_base_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("BOOKING_API_URL".to_string()))
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEnvVar("BOOKING_API_URL".to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BOOKING_API_URL".to_string(),
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("HOME", "/home/anna")]).unwrap();
        assert!(config.api_base_url.is_none());
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/home/anna/.booking-console/session"))
        );
        assert_eq!(config.display_tz, chrono_tz::Europe::Stockholm);
        assert!(config.sentry_dsn.is_none());
        assert!(config.require_api_base_url().is_err());
    }

    #[test]
    fn test_no_home_means_no_session_file() {
        let config = load(&[]).unwrap();
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_base_url_alias() {
        let config = load(&[("NEXT_PUBLIC_API_URL", "https://api.example.se/")]).unwrap();
        assert_eq!(config.require_api_base_url().unwrap(), "https://api.example.se/");

        let config = load(&[
            ("BOOKING_API_URL", "http://localhost:4000"),
            ("NEXT_PUBLIC_API_URL", "https://api.example.se"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:4000"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("BOOKING_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = load(&[("BOOKING_API_URL", "ftp://files.example.se")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_display_tz_override() {
        let config = load(&[("BOOKING_DISPLAY_TZ", "America/New_York")]).unwrap();
        assert_eq!(config.display_tz, chrono_tz::America::New_York);

        let err = load(&[("BOOKING_DISPLAY_TZ", "Mars/Olympus")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_explicit_session_file() {
        let config = load(&[
            ("HOME", "/home/anna"),
            ("BOOKING_SESSION_FILE", "/tmp/console-session"),
        ])
        .unwrap();
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/console-session")));
    }
}
