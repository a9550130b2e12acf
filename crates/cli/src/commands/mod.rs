//! Command implementations.
//!
//! Each command opens the matching screen controller, runs one operation
//! and renders the resulting state to stdout. Diagnostics go to the log.

pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod discounts;
pub mod leads;
pub mod locked_dates;
pub mod prices;

use std::io::{self, BufRead, Write};

use booking_console_admin::ScreenError;
use booking_console_admin::guard::GuardRejection;
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The screen operation failed.
    #[error("{}", .0.user_message())]
    Screen(#[from] ScreenError),

    /// A protected command was run without a stored session.
    #[error("Inte inloggad. Kör `booking-console login` först.")]
    NotLoggedIn,

    /// Command-line input that no screen accepts.
    #[error("Ogiltig inmatning: {0}")]
    Input(String),

    /// Reading input or writing output failed.
    #[error("In- eller utmatning misslyckades: {0}")]
    Io(#[from] io::Error),
}

impl From<GuardRejection> for CommandError {
    fn from(rejection: GuardRejection) -> Self {
        match rejection {
            GuardRejection::RedirectToLogin => Self::NotLoggedIn,
        }
    }
}

/// Parse `KEY=VALUE`. The value may be empty.
///
/// # Errors
///
/// Returns a message when there is no `=` or the key is empty.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

/// The secret given on the command line, or one line read from stdin.
///
/// # Errors
///
/// Returns `CommandError::Io` when stdin cannot be read.
pub fn secret_or_stdin(given: Option<String>, prompt: &str) -> Result<SecretString, CommandError> {
    if let Some(secret) = given {
        return Ok(SecretString::from(secret));
    }
    write!(io::stderr(), "{prompt}: ")?;
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::from(trimmed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("movingBase=4 500").unwrap(),
            ("movingBase".to_string(), "4 500".to_string())
        );
        assert_eq!(
            parse_key_value("extras=").unwrap(),
            ("extras".to_string(), String::new())
        );
        assert!(parse_key_value("=12").is_err());
        assert!(parse_key_value("base").is_err());
    }

    #[test]
    fn test_screen_error_message() {
        let err = CommandError::from(ScreenError::Application {
            status: 409,
            message: "Rabattkoden finns redan".to_string(),
        });
        assert_eq!(err.to_string(), "Rabattkoden finns redan");
        assert_eq!(
            CommandError::from(GuardRejection::RedirectToLogin).to_string(),
            "Inte inloggad. Kör `booking-console login` först."
        );
    }
}
