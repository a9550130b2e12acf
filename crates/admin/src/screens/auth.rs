//! Login and admin registration screens.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use super::{ScreenCell, interpret};
use crate::api::envelope;
use crate::error::{ScreenError, ValidationErrors};
use crate::guard::Route;
use crate::session::SessionCredential;
use crate::state::AppState;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;
const MISSING_TOKEN: &str = "Inloggningen misslyckades: servern skickade ingen sessionsnyckel.";

/// Login screen.
#[derive(Debug)]
pub struct LoginScreen {
    state: AppState,
    cell: ScreenCell<()>,
}

impl LoginScreen {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            cell: ScreenCell::default(),
        }
    }

    /// Exchange credentials for a session and store it.
    ///
    /// Returns the screen to show next.
    ///
    /// # Errors
    ///
    /// Returns the API's message on rejection, `Application` when an
    /// accepted login carries no token, `Transport` on network failure, and
    /// `Storage` if the credential cannot be saved.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Route, ScreenError> {
        let result = self.submit(username, password).await;
        self.cell.settle(result)
    }

    async fn submit(&self, username: &str, password: &SecretString) -> Result<Route, ScreenError> {
        let _busy = self.cell.begin("login")?;
        let response = self.state.api().login(username, password).await?;
        let status = response.status().as_u16();
        let body = interpret(response, "Inloggningen misslyckades.").await?;
        let token = envelope::token(&body).ok_or_else(|| {
            warn!(status, "Login response carried no token");
            ScreenError::Application {
                status,
                message: MISSING_TOKEN.to_string(),
            }
        })?;

        self.state
            .store()
            .set_credential(&SessionCredential::new(token))
            .map_err(|e| ScreenError::Storage(e.to_string()))?;
        info!("Logged in");
        Ok(Route::Dashboard)
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }
}

/// Input of the register-admin form.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub password: SecretString,
    pub confirm: SecretString,
}

impl RegisterForm {
    /// Field errors; empty when the form may be submitted.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", "Ange ett användarnamn.");
        } else if username.chars().count() < MIN_USERNAME_LEN {
            errors.add("username", "Användarnamnet måste vara minst 3 tecken.");
        }

        let password = self.password.expose_secret();
        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "Lösenordet måste vara minst 6 tecken.");
        } else if password != self.confirm.expose_secret() {
            errors.add("confirm", "Lösenorden matchar inte.");
        }
        errors
    }
}

/// Register-admin screen.
#[derive(Debug)]
pub struct RegisterScreen {
    state: AppState,
    cell: ScreenCell<Option<String>>,
}

impl RegisterScreen {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            cell: ScreenCell::default(),
        }
    }

    /// Create a new admin account. The current session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without sending a request when the form is
    /// invalid, and the API's message on rejection.
    #[instrument(skip(self, form), fields(username = %form.username.trim()))]
    pub async fn register(&self, form: &RegisterForm) -> Result<String, ScreenError> {
        let result = self.submit(form).await;
        self.cell.settle(result)
    }

    async fn submit(&self, form: &RegisterForm) -> Result<String, ScreenError> {
        form.validate().into_result()?;
        let _busy = self.cell.begin("register")?;

        let username = form.username.trim();
        let response = self
            .state
            .api()
            .register_admin(username, &form.password)
            .await?;
        interpret(response, "Kunde inte registrera administratör.").await?;

        let message = "Administratör skapad! Du kan nu logga in.".to_string();
        self.cell.apply(|ok| *ok = Some(message.clone()));
        info!(%username, "Admin registered");
        Ok(message)
    }

    /// Confirmation shown after a successful registration.
    #[must_use]
    pub fn ok_message(&self) -> Option<String> {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(username: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            password: SecretString::from(password),
            confirm: SecretString::from(confirm),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(form("  bo  ", "hemligt", "hemligt").validate().contains("username"));
        assert!(form("   ", "hemligt", "hemligt").validate().contains("username"));
        assert!(form("admin", "12345", "12345").validate().contains("password"));
        assert!(form("admin", "hemligt", "hemligt2").validate().contains("confirm"));
        assert!(form(" admin ", "hemligt", "hemligt").validate().is_empty());
    }
}
