//! Customer email addresses as edited in booking forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input contains whitespace inside the address.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// There is no @ with something in front of it.
    #[error("email must contain an @ after the local part")]
    MissingAtSymbol,
    /// The domain has no interior dot.
    #[error("email domain must contain a dot")]
    MissingDomainDot,
}

/// An email address, trimmed and lowercased.
///
/// Validation is deliberately loose: some non-whitespace, an `@`, then a
/// domain with at least one dot that has characters on both sides. The
/// backend does its own checks; this only catches obvious typos in forms.
///
/// ## Examples
///
/// ```
/// use booking_console_core::Email;
///
/// let email = Email::parse("  Kund@Example.SE ").unwrap();
/// assert_eq!(email.as_str(), "kund@example.se");
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("kund@localhost").is_err());
/// assert!(Email::parse("kund example@test.se").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse and normalize an `Email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, contains whitespace,
    /// has no `@` after a non-empty local part, or has a domain without an
    /// interior dot.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let at_pos = trimmed
            .char_indices()
            .find(|&(i, c)| c == '@' && i > 0)
            .map(|(i, _)| i)
            .ok_or(EmailError::MissingAtSymbol)?;

        let domain = trimmed.get(at_pos + 1..).unwrap_or("");
        let last = domain.len().saturating_sub(1);
        if !domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i < last)
        {
            return Err(EmailError::MissingDomainDot);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("anna@example.se").is_ok());
        assert!(Email::parse("anna.svensson+flytt@mail.example.com").is_ok());
        assert!(Email::parse("a@b.c").is_ok());
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email = Email::parse("  Anna@Example.SE\n").unwrap();
        assert_eq!(email.as_str(), "anna@example.se");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_inner_whitespace() {
        assert_eq!(Email::parse("an na@example.se"), Err(EmailError::Whitespace));
    }

    #[test]
    fn test_parse_missing_at() {
        assert_eq!(Email::parse("no-at-symbol.se"), Err(EmailError::MissingAtSymbol));
        assert_eq!(Email::parse("@example.se"), Err(EmailError::MissingAtSymbol));
    }

    #[test]
    fn test_parse_domain_without_dot() {
        assert_eq!(Email::parse("anna@localhost"), Err(EmailError::MissingDomainDot));
        assert_eq!(Email::parse("anna@.se"), Err(EmailError::MissingDomainDot));
        assert_eq!(Email::parse("anna@example."), Err(EmailError::MissingDomainDot));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("Anna@Example.se").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"anna@example.se\"");
    }
}
