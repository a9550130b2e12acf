//! Screen controllers.
//!
//! One controller per admin screen. A controller owns the screen's view
//! state, calls the API with the stored credential, interprets the response
//! and updates its state. Rendering is left to the caller.
//!
//! Every operation resolves to `Ok` or a [`ScreenError`] that is also kept
//! as the screen's current error. Local state changes only after the API
//! reports success. Results that arrive after a screen was unmounted are
//! dropped.

pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod discounts;
pub mod leads;
pub mod locked_dates;
pub mod prices;

pub use auth::{LoginScreen, RegisterForm, RegisterScreen};
pub use bookings::{BookingDetailScreen, BookingEditForm, BookingListScreen};
pub use dashboard::{DashboardScreen, DashboardSummary};
pub use discounts::{DiscountForm, DiscountScreen};
pub use leads::{ContactScreen, PhoneLeadFilter, PhoneLeadScreen};
pub use locked_dates::LockedDateScreen;
pub use prices::PriceScreen;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::envelope;
use crate::error::ScreenError;

/// Turn a raw response into its JSON body or a screen error.
///
/// # Errors
///
/// Returns `ScreenError::Transport` if the body cannot be read or a success
/// body is not JSON, and `ScreenError::Application` for non-2xx statuses.
pub async fn interpret(response: reqwest::Response, fallback: &str) -> Result<Value, ScreenError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ScreenError::Transport(e.to_string()))?;
    interpret_body(status, &text, fallback)
}

/// Status and body text to JSON or a screen error.
///
/// An empty body is `Value::Null`. Failed responses carry the body's
/// `message` when there is one, `fallback` otherwise.
///
/// # Errors
///
/// See [`interpret`].
pub fn interpret_body(status: StatusCode, text: &str, fallback: &str) -> Result<Value, ScreenError> {
    let parsed = if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(text)
    };

    if status.is_success() {
        return parsed.map_err(|e| {
            warn!(status = status.as_u16(), error = %e, "Response body is not JSON");
            ScreenError::Transport(format!("invalid response body: {e}"))
        });
    }

    let message = parsed
        .ok()
        .as_ref()
        .and_then(envelope::error_message)
        .unwrap_or_else(|| fallback.to_string());
    debug!(status = status.as_u16(), %message, "API request failed");
    Err(ScreenError::Application {
        status: status.as_u16(),
        message,
    })
}

/// Keys of mutations currently in flight.
#[derive(Debug, Default)]
pub struct InFlight {
    keys: Mutex<HashSet<String>>,
}

impl InFlight {
    /// Mark `key` busy until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::Busy` if `key` is already in flight.
    pub fn begin(&self, key: impl Into<String>) -> Result<InFlightGuard<'_>, ScreenError> {
        let key = key.into();
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.clone()) {
            debug!(%key, "Mutation already in flight");
            return Err(ScreenError::Busy);
        }
        Ok(InFlightGuard { owner: self, key })
    }

    #[must_use]
    pub fn is_busy(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Clears its key from [`InFlight`] on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// View state of one mounted screen.
#[derive(Debug)]
pub struct ScreenCell<T> {
    view: RwLock<T>,
    error: RwLock<Option<ScreenError>>,
    mounted: AtomicBool,
    busy: InFlight,
}

impl<T: Default> Default for ScreenCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> ScreenCell<T> {
    #[must_use]
    pub fn new(view: T) -> Self {
        Self {
            view: RwLock::new(view),
            error: RwLock::new(None),
            mounted: AtomicBool::new(true),
            busy: InFlight::default(),
        }
    }

    /// Read the view.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.view.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Update the view if the screen is still mounted.
    pub fn apply(&self, f: impl FnOnce(&mut T)) -> bool {
        if !self.is_mounted() {
            debug!("Dropping result for unmounted screen");
            return false;
        }
        f(&mut self.view.write().unwrap_or_else(PoisonError::into_inner));
        true
    }

    /// Record the outcome of an operation as the screen's current error.
    ///
    /// # Errors
    ///
    /// Returns `result`'s error unchanged.
    pub fn settle<R>(&self, result: Result<R, ScreenError>) -> Result<R, ScreenError> {
        if self.is_mounted() {
            let mut error = self.error.write().unwrap_or_else(PoisonError::into_inner);
            match &result {
                Ok(_) => *error = None,
                // A refused duplicate leaves the first submission's outcome visible.
                Err(ScreenError::Busy) => {}
                Err(e) => *error = Some(e.clone()),
            }
        }
        result
    }

    /// The error of the last settled operation.
    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mark `key` busy for the duration of a mutation.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::Busy` if `key` is already in flight.
    pub fn begin(&self, key: impl Into<String>) -> Result<InFlightGuard<'_>, ScreenError> {
        self.busy.begin(key)
    }

    #[must_use]
    pub fn is_busy(&self, key: &str) -> bool {
        self.busy.is_busy(key)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}

impl<T: Clone> ScreenCell<T> {
    #[must_use]
    pub fn snapshot(&self) -> T {
        self.read(Clone::clone)
    }
}
