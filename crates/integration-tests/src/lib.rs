//! Integration test support for the booking console.
//!
//! [`FakeBackend`] is an in-process booking API on an ephemeral port. Tests
//! script its replies per method and path, point an [`AppState`] at it and
//! then inspect every request the console sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p booking-console-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use booking_console_admin::AppState;
use booking_console_admin::config::ConsoleConfig;
use booking_console_admin::session::{MemoryCredentialStore, SessionCredential};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One request as the fake backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path as sent, percent-encoding intact.
    pub path: String,
    pub authorization: Option<String>,
    pub cache_control: Option<String>,
    pub pragma: Option<String>,
    /// JSON body, if any was sent.
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Whether the request carried `Authorization: Bearer {token}`.
    #[must_use]
    pub fn has_bearer(&self, token: &str) -> bool {
        self.authorization.as_deref() == Some(format!("Bearer {token}").as_str())
    }

    /// Whether both cache headers were `no-cache`.
    #[must_use]
    pub fn bypasses_cache(&self) -> bool {
        self.cache_control.as_deref() == Some("no-cache") && self.pragma.as_deref() == Some("no-cache")
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct Recorder {
    replies: Mutex<HashMap<(String, String), Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Scriptable fake of the booking API.
///
/// Unscripted requests get `404 {"message": "Not found"}`. The server task
/// is aborted when the backend is dropped.
#[derive(Debug)]
pub struct FakeBackend {
    base_url: String,
    recorder: Arc<Recorder>,
    server: JoinHandle<()>,
}

impl FakeBackend {
    /// Start the server on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let recorder = Arc::new(Recorder::default());
        let app = Router::new().fallback(record).with_state(Arc::clone(&recorder));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            recorder,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: &Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    /// Answer `method path` with `status` and a raw body.
    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        let reply = Reply {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: body.to_string(),
        };
        self.recorder
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method.to_uppercase(), path.to_string()), reply);
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorder
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .collect()
    }

    /// Console state pointing at this backend with no session stored.
    #[must_use]
    pub fn state(&self) -> AppState {
        AppState::new(
            ConsoleConfig::for_base_url(self.base_url.clone()),
            Arc::new(MemoryCredentialStore::new()),
        )
    }

    /// Console state pointing at this backend with `token` stored.
    #[must_use]
    pub fn state_with_session(&self, token: &str) -> AppState {
        AppState::new(
            ConsoleConfig::for_base_url(self.base_url.clone()),
            Arc::new(MemoryCredentialStore::with_credential(SessionCredential::new(token))),
        )
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn record(
    State(recorder): State<Arc<Recorder>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        authorization: header_value(&headers, header::AUTHORIZATION),
        cache_control: header_value(&headers, header::CACHE_CONTROL),
        pragma: header_value(&headers, header::PRAGMA),
        body: serde_json::from_slice(&body).ok(),
    };
    let key = (request.method.clone(), request.path.clone());
    recorder
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);

    let reply = recorder
        .replies
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();

    match reply {
        Some(reply) => (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            reply.body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "message": "Not found" }).to_string(),
        )
            .into_response(),
    }
}
