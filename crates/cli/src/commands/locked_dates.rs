//! Locked date commands.

use std::io::{self, Write};

use booking_console_admin::AppState;
use booking_console_admin::screens::LockedDateScreen;
use booking_console_core::{CivilDate, ServiceLine};

use super::CommandError;
use crate::render;

pub async fn list(state: &AppState, service: ServiceLine) -> Result<(), CommandError> {
    let screen = LockedDateScreen::new(state.clone(), service);
    screen.load().await?;
    render::locked_dates(&mut io::stdout().lock(), service, &screen.dates())?;
    Ok(())
}

/// Lock `date`. The current list is loaded first so an already locked
/// date is refused without a request.
pub async fn add(state: &AppState, service: ServiceLine, date: &str) -> Result<(), CommandError> {
    let screen = LockedDateScreen::new(state.clone(), service);
    screen.load().await?;
    screen.add_input(date).await?;
    writeln!(io::stdout().lock(), "Låste {}.", date.trim())?;
    Ok(())
}

pub async fn remove(state: &AppState, service: ServiceLine, date: &str) -> Result<(), CommandError> {
    let date = CivilDate::parse(date.trim())
        .map_err(|e| CommandError::Input(format!("{date}: {e}")))?;
    let screen = LockedDateScreen::new(state.clone(), service);
    screen.remove(date).await?;
    writeln!(io::stdout().lock(), "Låste upp {date}.")?;
    Ok(())
}
