//! Unified error handling for console screens.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::api::ClientError;
use crate::config::ConfigError;

/// Everything a screen operation can end in besides success.
///
/// No variant escapes a screen: each one is stored in the screen's error
/// state and rendered with [`ScreenError::user_message`].
#[derive(Debug, Clone, Error)]
pub enum ScreenError {
    /// Base URL missing or invalid; no request was made.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No stored credential for a protected action.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Network failure or a success response whose body is not JSON.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("API error {status}: {message}")]
    Application { status: u16, message: String },

    /// Client-side form checks failed; no request was made.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The same mutation is already in flight; no request was made.
    #[error("Operation already in progress")]
    Busy,

    /// The credential could not be written to durable storage.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ScreenError {
    /// Message shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(detail) => format!("Konsolen är inte konfigurerad: {detail}"),
            Self::NotAuthenticated => "Ingen session hittades. Logga in igen.".to_string(),
            Self::Transport(_) => "Kunde inte ansluta till servern. Försök igen.".to_string(),
            Self::Application { message, .. } => message.clone(),
            Self::Validation(errors) => errors.to_string(),
            Self::Busy => "Pågår redan, vänta.".to_string(),
            Self::Storage(_) => "Kunde inte spara sessionen på den här datorn.".to_string(),
        }
    }

    /// Whether repeating the same action may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Busy)
    }

    /// Field errors, when this is a validation failure.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ClientError> for ScreenError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::MissingBaseUrl => Self::Config(err.to_string()),
            ClientError::Http(e) => Self::Transport(e.to_string()),
            ClientError::Encode(e) => Self::Transport(e.to_string()),
        }
    }
}

impl From<ConfigError> for ScreenError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ValidationErrors> for ScreenError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, replacing any earlier one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display() {
        let mut errors = ValidationErrors::new();
        errors.add("size", "Måste vara större än 0");
        errors.add("email", "Ogiltig e-post");
        assert_eq!(
            errors.to_string(),
            "email: Ogiltig e-post; size: Måste vara större än 0"
        );
        assert_eq!(errors.get("email"), Some("Ogiltig e-post"));
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_user_messages() {
        let err = ScreenError::Application {
            status: 409,
            message: "Koden finns redan".to_string(),
        };
        assert_eq!(err.user_message(), "Koden finns redan");
        assert_eq!(
            ScreenError::NotAuthenticated.user_message(),
            "Ingen session hittades. Logga in igen."
        );
        assert_eq!(
            ScreenError::Transport("reset".into()).user_message(),
            "Kunde inte ansluta till servern. Försök igen."
        );
        assert_eq!(ScreenError::Busy.user_message(), "Pågår redan, vänta.");
        assert_eq!(
            ScreenError::Storage("read-only".into()).user_message(),
            "Kunde inte spara sessionen på den här datorn."
        );
        assert!(ScreenError::Transport("reset".into()).is_retryable());
        assert!(!ScreenError::NotAuthenticated.is_retryable());
    }

    #[test]
    fn test_missing_base_url_is_config() {
        let err: ScreenError = ClientError::MissingBaseUrl.into();
        assert!(matches!(err, ScreenError::Config(_)));
    }
}
