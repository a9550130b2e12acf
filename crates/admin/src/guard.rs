//! Route guard for admin screens.
//!
//! Every admin screen is entered through [`RouteGuard::navigate`]. The guard
//! checks the session store once per navigation and either admits the
//! screen or redirects to login. It only keeps the console from rendering
//! screens that are bound to fail; the API enforces authorization.

use std::fmt;
use std::sync::Arc;

use booking_console_core::{BookingId, ServiceLine};
use tracing::{debug, info};

use crate::api::PriceList;
use crate::session::CredentialStore;

/// Console screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Bookings(ServiceLine),
    BookingDetail(ServiceLine, BookingId),
    LockedDates(ServiceLine),
    Discounts,
    Prices(PriceList),
    Contacts,
    PhoneLeads,
}

impl Route {
    /// Whether the screen needs a stored credential.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Location of the screen, for logs and the prompt.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/admin/login".to_string(),
            Self::Register => "/admin/register".to_string(),
            Self::Dashboard => "/admin".to_string(),
            Self::Bookings(service) => format!("/admin/{service}"),
            Self::BookingDetail(service, id) => format!("/admin/{service}/{id}"),
            Self::LockedDates(service) => format!("/admin/{service}/locked-dates"),
            Self::Discounts => "/admin/discounts".to_string(),
            Self::Prices(PriceList::Moving) => "/admin/prices/moving".to_string(),
            Self::Prices(PriceList::Cleaning) => "/admin/prices/cleaning".to_string(),
            Self::Contacts => "/admin/foretagstad".to_string(),
            Self::PhoneLeads => "/admin/phone".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome when a protected screen is entered without a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// Render nothing and go to the login screen.
    RedirectToLogin,
}

impl GuardRejection {
    #[must_use]
    pub const fn target(self) -> Route {
        match self {
            Self::RedirectToLogin => Route::Login,
        }
    }
}

/// Progress of a single navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    Checked(Result<(), GuardRejection>),
}

/// Gate in front of every admin screen.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Arc<dyn CredentialStore>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Start navigating to `route`. Nothing is checked until
    /// [`Navigation::check`] is called.
    #[must_use]
    pub const fn navigate(&self, route: Route) -> Navigation<'_> {
        Navigation {
            guard: self,
            route,
            state: GuardState::Unchecked,
        }
    }

    /// Navigate and check in one step.
    ///
    /// # Errors
    ///
    /// Returns `GuardRejection::RedirectToLogin` if `route` is protected and
    /// no credential is stored.
    pub fn enter(&self, route: Route) -> Result<Route, GuardRejection> {
        self.navigate(route).check()
    }

    /// Clear the session and return the login screen.
    pub fn logout(&self) -> Route {
        self.store.clear_credential();
        info!("Logged out");
        Route::Login
    }
}

/// One navigation to a screen.
#[derive(Debug)]
pub struct Navigation<'a> {
    guard: &'a RouteGuard,
    route: Route,
    state: GuardState,
}

impl Navigation<'_> {
    #[must_use]
    pub const fn state(&self) -> &GuardState {
        &self.state
    }

    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Evaluate the session once; later calls return the first outcome.
    ///
    /// # Errors
    ///
    /// Returns `GuardRejection::RedirectToLogin` if the route is protected
    /// and no credential was stored at the first check.
    pub fn check(&mut self) -> Result<Route, GuardRejection> {
        if self.state == GuardState::Unchecked {
            let outcome = if !self.route.is_protected() || self.guard.store.is_authenticated() {
                Ok(())
            } else {
                debug!(route = %self.route, "No session, redirecting to login");
                Err(GuardRejection::RedirectToLogin)
            };
            self.state = GuardState::Checked(outcome);
        }

        match &self.state {
            GuardState::Checked(Err(rejection)) => Err(*rejection),
            _ => Ok(self.route.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::{MemoryCredentialStore, SessionCredential};

    #[test]
    fn test_redirects_without_session() {
        let guard = RouteGuard::new(Arc::new(MemoryCredentialStore::new()));
        assert_eq!(
            guard.enter(Route::Dashboard),
            Err(GuardRejection::RedirectToLogin)
        );
        assert_eq!(guard.enter(Route::Login), Ok(Route::Login));
        assert_eq!(GuardRejection::RedirectToLogin.target(), Route::Login);
    }

    #[test]
    fn test_admits_with_session() {
        let store = Arc::new(MemoryCredentialStore::with_credential(SessionCredential::new(
            "tok",
        )));
        let guard = RouteGuard::new(store);
        assert_eq!(guard.enter(Route::Discounts), Ok(Route::Discounts));
    }

    #[test]
    fn test_checks_once_per_navigation() {
        let store = Arc::new(MemoryCredentialStore::new());
        let guard = RouteGuard::new(store.clone());
        let mut navigation = guard.navigate(Route::Contacts);
        assert_eq!(navigation.state(), &GuardState::Unchecked);
        assert!(navigation.check().is_err());

        // A login after the check does not change this navigation.
        store.set_credential(&SessionCredential::new("tok")).unwrap();
        assert!(navigation.check().is_err());
        assert!(guard.enter(Route::Contacts).is_ok());
    }

    #[test]
    fn test_logout_clears_and_redirects() {
        let store = Arc::new(MemoryCredentialStore::with_credential(SessionCredential::new(
            "tok",
        )));
        let guard = RouteGuard::new(store.clone());
        assert_eq!(guard.logout(), Route::Login);
        assert!(!store.is_authenticated());
        assert_eq!(guard.logout(), Route::Login);
        assert!(guard.enter(Route::PhoneLeads).is_err());
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Bookings(ServiceLine::Bygg).path(), "/admin/bygg");
        assert_eq!(
            Route::BookingDetail(ServiceLine::Moving, BookingId::new("a1")).to_string(),
            "/admin/moving/a1"
        );
        assert!(Route::Register.is_protected());
        assert!(!Route::Login.is_protected());
    }
}
