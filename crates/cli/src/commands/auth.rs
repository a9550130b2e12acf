//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! booking-console login -u admin
//! booking-console register -u kollega
//! booking-console logout
//! ```

use std::io::{self, Write};

use booking_console_admin::AppState;
use booking_console_admin::guard::RouteGuard;
use booking_console_admin::screens::{LoginScreen, RegisterForm, RegisterScreen};

use super::{CommandError, secret_or_stdin};

/// Sign in and store the session credential.
pub async fn login(state: &AppState, username: &str, password: Option<String>) -> Result<(), CommandError> {
    let password = secret_or_stdin(password, "Lösenord")?;
    let screen = LoginScreen::new(state.clone());
    let route = screen.login(username, &password).await?;

    tracing::info!(%username, %route, "Logged in");
    writeln!(io::stdout().lock(), "Inloggad som {username}.")?;
    Ok(())
}

/// Clear the stored session.
pub fn logout(guard: &RouteGuard) -> Result<(), CommandError> {
    guard.logout();
    writeln!(io::stdout().lock(), "Utloggad.")?;
    Ok(())
}

/// Create another admin account. The current session is kept.
pub async fn register(state: &AppState, username: &str, password: Option<String>) -> Result<(), CommandError> {
    let form = match password {
        Some(password) => RegisterForm {
            username: username.to_string(),
            password: password.clone().into(),
            confirm: password.into(),
        },
        None => RegisterForm {
            username: username.to_string(),
            password: secret_or_stdin(None, "Lösenord")?,
            confirm: secret_or_stdin(None, "Bekräfta lösenord")?,
        },
    };

    let screen = RegisterScreen::new(state.clone());
    let message = screen.register(&form).await?;
    writeln!(io::stdout().lock(), "{message}")?;
    Ok(())
}
