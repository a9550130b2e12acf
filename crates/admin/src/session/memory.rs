//! In-memory credential store.

use std::sync::{Mutex, PoisonError};

use super::{CredentialStore, SessionCredential, SessionError, non_empty};

/// Keeps the credential for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<SessionCredential>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `credential`.
    #[must_use]
    pub fn with_credential(credential: SessionCredential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set_credential(&self, credential: &SessionCredential) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = non_empty(credential.expose());
        Ok(())
    }

    fn get_credential(&self) -> Option<SessionCredential> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear_credential(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
