//! Dashboard command.

use std::io;

use booking_console_admin::{AppState, ScreenError};
use booking_console_admin::screens::DashboardScreen;
use chrono::Utc;

use super::CommandError;
use crate::render;

/// Show booking totals and the most recent bookings.
///
/// Collections that failed to load are reported below the figures; the
/// command fails only when none of them loaded.
pub async fn show(state: &AppState) -> Result<(), CommandError> {
    let screen = DashboardScreen::new(state.clone());
    let loaded = screen.load().await;
    if matches!(loaded, Err(ScreenError::NotAuthenticated)) {
        return Err(CommandError::NotLoggedIn);
    }

    let collections = screen.collections();
    let summary = screen.summary(Utc::now());
    render::dashboard(&mut io::stdout().lock(), &summary, &collections, state.display_tz())?;

    match loaded {
        Err(e) if collections.iter().all(|c| c.error.is_some()) => Err(e.into()),
        _ => Ok(()),
    }
}
