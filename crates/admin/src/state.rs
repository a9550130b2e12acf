//! Application state shared across screens.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::api::ApiClient;
use crate::config::ConsoleConfig;
use crate::error::ScreenError;
use crate::session::{CredentialStore, FileCredentialStore, SessionCredential};

/// Application state shared across all screens.
///
/// The session store is the only mutable state screens share.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ConsoleConfig,
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ConsoleConfig, store: Arc<dyn CredentialStore>) -> Self {
        let api = ApiClient::new(config.api_base_url.clone());
        Self::with_api(config, api, store)
    }

    /// State whose credential lives in the configured session file.
    #[must_use]
    pub fn with_file_store(config: ConsoleConfig) -> Self {
        let store = FileCredentialStore::from_optional(config.session_file.clone());
        Self::new(config, Arc::new(store))
    }

    #[must_use]
    pub fn with_api(config: ConsoleConfig, api: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, api, store }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn display_tz(&self) -> Tz {
        self.inner.config.display_tz
    }

    /// The stored credential for a protected call.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::NotAuthenticated` if no credential is stored.
    pub fn credential(&self) -> Result<SessionCredential, ScreenError> {
        self.inner
            .store
            .get_credential()
            .ok_or(ScreenError::NotAuthenticated)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api", &self.inner.api)
            .field("store", &self.inner.store)
            .finish_non_exhaustive()
    }
}
