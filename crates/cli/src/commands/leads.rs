//! Lead commands: corporate-cleaning enquiries and phone call-backs.

use std::io::{self, Write};

use booking_console_admin::AppState;
use booking_console_admin::screens::{ContactScreen, PhoneLeadFilter, PhoneLeadScreen};
use booking_console_core::{ContactId, PhoneLeadId, PhoneLeadStatus, ServiceLine};

use super::CommandError;
use crate::render;

pub async fn list_contacts(state: &AppState, search: Option<&str>) -> Result<(), CommandError> {
    let screen = ContactScreen::new(state.clone());
    screen.load().await?;
    let rows = screen.search(search.unwrap_or_default());
    render::contacts(&mut io::stdout().lock(), &rows, state.display_tz())?;
    Ok(())
}

pub async fn delete_contact(state: &AppState, id: String) -> Result<(), CommandError> {
    let screen = ContactScreen::new(state.clone());
    screen.delete(&ContactId::new(id)).await?;
    writeln!(io::stdout().lock(), "Förfrågan raderad.")?;
    Ok(())
}

pub async fn list_phones(
    state: &AppState,
    service: Option<ServiceLine>,
    status: Option<PhoneLeadStatus>,
) -> Result<(), CommandError> {
    let screen = PhoneLeadScreen::new(state.clone());
    screen.load().await?;
    let rows = screen.filtered(PhoneLeadFilter { service, status });
    render::phone_leads(&mut io::stdout().lock(), &rows, state.display_tz())?;
    Ok(())
}

pub async fn set_phone_status(state: &AppState, id: String, status: PhoneLeadStatus) -> Result<(), CommandError> {
    let screen = PhoneLeadScreen::new(state.clone());
    screen.set_status(&PhoneLeadId::new(id), status).await?;
    writeln!(io::stdout().lock(), "Status satt till {status}.")?;
    Ok(())
}

pub async fn delete_phone(state: &AppState, id: String) -> Result<(), CommandError> {
    let screen = PhoneLeadScreen::new(state.clone());
    screen.delete(&PhoneLeadId::new(id)).await?;
    writeln!(io::stdout().lock(), "Telefonnumret raderat.")?;
    Ok(())
}
