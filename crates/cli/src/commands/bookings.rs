//! Booking commands.
//!
//! # Usage
//!
//! ```bash
//! booking-console bookings moving list
//! booking-console bookings cleaning show 66f1c0ffee0123456789abcd
//! booking-console bookings moving update 66f1c0ffee0123456789abcd \
//!     --date 2025-12-24 --time 09:00 --total movingBase=4500
//! booking-console bookings bygg confirm 66f1c0ffee0123456789abcd
//! ```

use std::io::{self, Write};

use booking_console_admin::AppState;
use booking_console_admin::screens::{BookingDetailScreen, BookingEditForm, BookingListScreen};
use booking_console_core::{BookingId, BookingStatus, ServiceLine};
use clap::Args;

use super::{CommandError, parse_key_value};
use crate::render;

/// Field changes for `bookings update`.
#[derive(Args, Debug, Default)]
pub struct BookingChanges {
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    /// HH:mm
    #[arg(long)]
    pub time: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Street address (cleaning and bygg)
    #[arg(long)]
    pub address: Option<String>,

    /// Area in square metres
    #[arg(long)]
    pub size: Option<String>,

    /// pending, confirmed or cancelled
    #[arg(long)]
    pub status: Option<BookingStatus>,

    /// Price total as KEY=AMOUNT, e.g. `movingBase=4500` (repeatable)
    #[arg(long = "total", value_parser = parse_key_value)]
    pub totals: Vec<(String, String)>,
}

impl BookingChanges {
    /// Apply the changes to `form`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Input` for a total key the form does not have.
    pub fn apply(&self, form: &mut BookingEditForm) -> Result<(), CommandError> {
        let text_fields = [
            (&self.date, &mut form.date),
            (&self.time, &mut form.time),
            (&self.email, &mut form.email),
            (&self.phone, &mut form.phone),
            (&self.address, &mut form.address_street),
            (&self.size, &mut form.size),
        ];
        for (change, slot) in text_fields {
            if let Some(value) = change {
                slot.clone_from(value);
            }
        }
        if let Some(status) = self.status {
            form.status = status;
        }

        for (key, value) in &self.totals {
            if !form.totals.iter().any(|t| t.key == key.as_str()) {
                let known: Vec<&str> = form.totals.iter().map(|t| t.key).collect();
                return Err(CommandError::Input(format!(
                    "okänd summa {key:?}, förväntade en av {}",
                    known.join(", ")
                )));
            }
            form.set_total(key, value.as_str());
        }
        Ok(())
    }
}

pub async fn list(state: &AppState, service: ServiceLine) -> Result<(), CommandError> {
    let screen = BookingListScreen::new(state.clone(), service);
    screen.load().await?;
    render::bookings(&mut io::stdout().lock(), service, &screen.bookings(), state.display_tz())?;
    Ok(())
}

pub async fn show(state: &AppState, service: ServiceLine, id: String) -> Result<(), CommandError> {
    let screen = BookingDetailScreen::new(state.clone(), service, BookingId::new(id));
    let booking = screen.load().await?;
    render::booking(&mut io::stdout().lock(), service, &booking, state.display_tz())?;
    Ok(())
}

/// Load the booking, apply `changes` to its edit form and save.
pub async fn update(
    state: &AppState,
    service: ServiceLine,
    id: String,
    changes: &BookingChanges,
) -> Result<(), CommandError> {
    let screen = BookingDetailScreen::new(state.clone(), service, BookingId::new(id));
    screen.load().await?;
    let mut form = screen
        .edit_form()
        .ok_or_else(|| CommandError::Input("bokningen kunde inte hämtas".to_string()))?;
    changes.apply(&mut form)?;

    let updated = screen.save(&form).await?;
    let mut out = io::stdout().lock();
    writeln!(out, "Bokningen uppdaterad.")?;
    render::booking(&mut out, service, &updated, state.display_tz())?;
    Ok(())
}

pub async fn delete(state: &AppState, service: ServiceLine, id: String) -> Result<(), CommandError> {
    let screen = BookingDetailScreen::new(state.clone(), service, BookingId::new(id));
    screen.delete().await?;
    writeln!(io::stdout().lock(), "Bokningen raderad.")?;
    Ok(())
}

pub async fn confirm(state: &AppState, service: ServiceLine, id: String) -> Result<(), CommandError> {
    let screen = BookingDetailScreen::new(state.clone(), service, BookingId::new(id));
    screen.send_confirmation().await?;
    writeln!(io::stdout().lock(), "Bekräftelse skickad.")?;
    Ok(())
}
