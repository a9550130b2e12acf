//! Booking API client.
//!
//! Typed request builders for every endpoint the console uses. Each
//! operation maps to exactly one method and path; the client attaches the
//! bearer credential when one is given and returns the raw response. It never
//! retries, follows 401s to a login page, or parses bodies: interpreting
//! responses is the calling screen's job (see [`envelope`]).
//!
//! # Operation groups
//!
//! - authentication: login, register admin
//! - bookings per service line: list, get, update, delete, send confirmation
//! - locked dates per service line: list, add, remove
//! - discounts: list, create, delete by id-or-code
//! - price lists: get, patch
//! - leads: corporate-cleaning contacts and phone leads

mod auth;
mod bookings;
mod discounts;
pub mod envelope;
mod leads;
mod locked_dates;
mod prices;
mod types;

pub use bookings::confirmation_path;
pub use discounts::discount_path;
pub use types::*;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CACHE_CONTROL, HeaderValue, PRAGMA};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::session::SessionCredential;

/// Errors that can occur before a response is available.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No base URL was configured.
    #[error("API base URL is not configured (set BOOKING_API_URL)")]
    MissingBaseUrl,

    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Join `base` and `path` with exactly one `/` between them.
///
/// ```
/// use booking_console_admin::api::join_url;
///
/// assert_eq!(join_url("https://api.example.se/", "/moving"), "https://api.example.se/moving");
/// assert_eq!(join_url("https://api.example.se", "moving"), "https://api.example.se/moving");
/// ```
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Description of one API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    credential: Option<SessionCredential>,
    body: Option<Value>,
    bypass_cache: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            credential: None,
            body: None,
            bypass_cache: false,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach the bearer credential, if any.
    #[must_use]
    pub fn bearer(mut self, credential: Option<&SessionCredential>) -> Self {
        self.credential = credential.cloned();
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Ask intermediaries not to serve a cached copy.
    #[must_use]
    pub const fn no_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    #[must_use]
    pub const fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    #[must_use]
    pub const fn bypasses_cache(&self) -> bool {
        self.bypass_cache
    }
}

/// Booking API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// A missing base URL is accepted here and reported by every request.
    #[must_use]
    pub fn new(base_url: Option<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_http_client(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.inner.base_url.as_deref()
    }

    /// Full URL for a relative API path.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MissingBaseUrl` if no base URL is configured.
    pub fn url_for(&self, path: &str) -> Result<String, ClientError> {
        self.base_url()
            .map(|base| join_url(base, path))
            .ok_or(ClientError::MissingBaseUrl)
    }

    /// Send a request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns error if no base URL is configured or the transport fails.
    #[instrument(
        skip(self, request),
        fields(method = %request.method, path = %request.path, auth = request.credential.is_some())
    )]
    pub async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, ClientError> {
        let url = self.url_for(&request.path)?;

        let mut builder = self.inner.client.request(request.method, &url);
        if let Some(credential) = &request.credential {
            builder = builder.bearer_auth(credential.expose());
        }
        if request.bypass_cache {
            builder = builder
                .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
                .header(PRAGMA, HeaderValue::from_static("no-cache"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        debug!(status = response.status().as_u16(), "API response");
        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_single_slash() {
        for base in ["http://h", "http://h/", "http://h//"] {
            for path in ["moving", "/moving", "//moving"] {
                assert_eq!(join_url(base, path), "http://h/moving", "{base} + {path}");
            }
        }
        assert_eq!(join_url("http://h/api/", "/discount/ABC"), "http://h/api/discount/ABC");
    }

    #[test]
    fn test_missing_base_url() {
        let client = ApiClient::new(None);
        assert!(matches!(client.url_for("/moving"), Err(ClientError::MissingBaseUrl)));
    }

    #[tokio::test]
    async fn test_send_without_base_url_fails_before_request() {
        let client = ApiClient::new(None);
        let err = client.send(ApiRequest::get("/moving")).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingBaseUrl));
    }

    #[test]
    fn test_request_descriptor() {
        let credential = SessionCredential::new("t");
        let request = ApiRequest::get("/prices").bearer(Some(&credential)).no_cache();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/prices");
        assert!(request.has_credential());
        assert!(request.bypasses_cache());
        assert!(request.body().is_none());

        let anonymous = ApiRequest::post("/admin/login").bearer(None);
        assert!(!anonymous.has_credential());
        assert!(!anonymous.bypasses_cache());

        assert_eq!(ApiRequest::patch("/phone/1").method(), Method::PATCH);
        assert_eq!(ApiRequest::delete("/contact/1").method(), Method::DELETE);
        let custom = ApiRequest::new(Method::PUT, String::from("/prices"));
        assert_eq!(custom.method(), Method::PUT);
        assert_eq!(custom.path(), "/prices");
    }
}
