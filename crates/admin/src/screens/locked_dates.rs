//! Locked dates: calendar days on which a service line takes no bookings.

use booking_console_core::{CivilDate, ServiceLine};
use tracing::{info, instrument};

use super::{ScreenCell, interpret};
use crate::api::{LockedDate, envelope};
use crate::error::{ScreenError, ValidationErrors};
use crate::state::AppState;

/// Locked dates of one service line, kept in calendar order.
#[derive(Debug)]
pub struct LockedDateScreen {
    state: AppState,
    service: ServiceLine,
    cell: ScreenCell<Vec<LockedDate>>,
}

fn date_error(message: &str) -> ScreenError {
    let mut errors = ValidationErrors::new();
    errors.add("date", message);
    ScreenError::Validation(errors)
}

impl LockedDateScreen {
    #[must_use]
    pub fn new(state: AppState, service: ServiceLine) -> Self {
        Self {
            state,
            service,
            cell: ScreenCell::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a request when no session is
    /// stored, or the API/transport error. The list is emptied on failure.
    #[instrument(skip(self), fields(service = %self.service))]
    pub async fn load(&self) -> Result<(), ScreenError> {
        let result = self.fetch().await;
        if result.is_err() {
            self.cell.apply(Vec::clear);
        }
        self.cell.settle(result)
    }

    async fn fetch(&self) -> Result<(), ScreenError> {
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .list_locked_dates(Some(&credential), self.service)
            .await?;
        let body = interpret(response, "Kunde inte hämta låsta datum.").await?;

        let mut rows = envelope::locked_dates(&body);
        rows.sort_by(|a, b| a.ymd.cmp(&b.ymd));
        rows.dedup_by(|a, b| a.ymd == b.ymd);
        self.cell.apply(|view| *view = rows);
        Ok(())
    }

    /// Lock the date typed as `input`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without a request for an empty or malformed
    /// date, otherwise see [`LockedDateScreen::add`].
    pub async fn add_input(&self, input: &str) -> Result<(), ScreenError> {
        let input = input.trim();
        let parsed = if input.is_empty() {
            Err(date_error("Välj ett datum att låsa."))
        } else {
            CivilDate::parse(input).map_err(|_| date_error("Ogiltigt datum."))
        };
        match parsed {
            Ok(date) => self.add(date).await,
            Err(e) => self.cell.settle(Err(e)),
        }
    }

    /// Lock `date` and insert it in calendar order.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without a request when `date` is already
    /// locked, `Busy` while another add is in flight, or the API/transport
    /// error.
    #[instrument(skip(self), fields(service = %self.service, date = %date))]
    pub async fn add(&self, date: CivilDate) -> Result<(), ScreenError> {
        let result = self.insert(date).await;
        self.cell.settle(result)
    }

    async fn insert(&self, date: CivilDate) -> Result<(), ScreenError> {
        if self.is_locked(date) {
            return Err(date_error("Datumet är redan låst."));
        }
        let _busy = self.cell.begin("add")?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .add_locked_date(Some(&credential), self.service, date)
            .await?;
        interpret(response, "Kunde inte låsa datumet.").await?;

        self.cell.apply(|rows| {
            if let Err(pos) = rows.binary_search_by(|row| row.ymd.cmp(&date)) {
                rows.insert(
                    pos,
                    LockedDate {
                        ymd: date,
                        created_at: None,
                    },
                );
            }
        });
        info!("Date locked");
        Ok(())
    }

    /// Unlock `date`.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while the same date is being removed, or the
    /// API/transport error; the list is unchanged on failure.
    #[instrument(skip(self), fields(service = %self.service, date = %date))]
    pub async fn remove(&self, date: CivilDate) -> Result<(), ScreenError> {
        let result = self.unlock(date).await;
        self.cell.settle(result)
    }

    async fn unlock(&self, date: CivilDate) -> Result<(), ScreenError> {
        let _busy = self.cell.begin(date.to_string())?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .remove_locked_date(Some(&credential), self.service, date)
            .await?;
        interpret(response, "Kunde inte ta bort datumet.").await?;
        self.cell.apply(|rows| rows.retain(|row| row.ymd != date));
        info!("Date unlocked");
        Ok(())
    }

    #[must_use]
    pub fn is_locked(&self, date: CivilDate) -> bool {
        self.cell.read(|rows| rows.iter().any(|row| row.ymd == date))
    }

    #[must_use]
    pub fn dates(&self) -> Vec<LockedDate> {
        self.cell.snapshot()
    }

    #[must_use]
    pub const fn service(&self) -> ServiceLine {
        self.service
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
