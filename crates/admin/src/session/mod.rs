//! Session credential storage.
//!
//! The bearer token returned by login is the only authentication state the
//! console keeps. Its presence in the store is the sole signal that an
//! operator is logged in; the token is never inspected or validated locally.
//!
//! - [`FileCredentialStore`] persists the token in a file between runs
//! - [`MemoryCredentialStore`] keeps it in process memory (tests, one-shot runs)

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors writing the credential.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No durable storage is configured.
    #[error("session storage is unavailable")]
    Unavailable,

    /// The storage backend rejected the write.
    #[error("failed to write session: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque bearer credential issued by the API on login.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SessionCredential(SecretString);

impl SessionCredential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionCredential([REDACTED])")
    }
}

/// Storage for at most one session credential.
///
/// Reads never fail: a store that cannot be read reports the credential as
/// absent. Only login and logout write to the store.
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Persist `credential`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the credential could not be stored.
    fn set_credential(&self, credential: &SessionCredential) -> Result<(), SessionError>;

    /// The stored credential, or `None` if absent or unreadable.
    fn get_credential(&self) -> Option<SessionCredential>;

    /// Remove the stored credential. Removing an absent credential is a no-op.
    fn clear_credential(&self);

    /// Presence check only.
    fn is_authenticated(&self) -> bool {
        self.get_credential().is_some()
    }
}

/// Empty tokens count as absent.
fn non_empty(token: &str) -> Option<SessionCredential> {
    let token = token.trim();
    (!token.is_empty()).then(|| SessionCredential::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = SessionCredential::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_non_empty() {
        assert!(non_empty("").is_none());
        assert!(non_empty(" \n").is_none());
        assert_eq!(non_empty("abc\n").map(|c| c.expose().to_owned()), Some("abc".to_owned()));
    }
}
