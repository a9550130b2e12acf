//! Booking list and booking detail screens.

use booking_console_core::{
    BookingId, BookingStatus, CivilDate, CivilDateError, Email, LocalTime, NumberError, Sek,
    ServiceLine, combine_in, combine_local, parse_decimal_input, parse_wire_instant,
    to_wire_instant,
};
use chrono::{DateTime, TimeZone, Utc};
use tracing::{info, instrument};

use super::{ScreenCell, interpret};
use crate::api::{
    Booking, BookingUpdate, CleaningBookingUpdate, MovingBookingUpdate, PriceDetails, PriceTotals,
    envelope,
};
use crate::error::{ScreenError, ValidationErrors};
use crate::state::AppState;

const DEFAULT_TIME: &str = "08:00";

// =============================================================================
// List
// =============================================================================

/// All bookings of one service line.
#[derive(Debug)]
pub struct BookingListScreen {
    state: AppState,
    service: ServiceLine,
    cell: ScreenCell<Vec<Booking>>,
}

impl BookingListScreen {
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
            .list_bookings(Some(&credential), self.service)
            .await?;
        let body = interpret(response, "Kunde inte hämta bokningar.").await?;
        let bookings = envelope::bookings(&body);
        self.cell.apply(|view| *view = bookings);
        Ok(())
    }

    /// Delete a booking and drop it from the list.
    ///
    /// # Errors
    ///
    /// Returns `Busy` if an action on the same booking is in flight, or the
    /// API/transport error; the list is unchanged on failure.
    #[instrument(skip(self), fields(service = %self.service, id = %id))]
    pub async fn delete(&self, id: &BookingId) -> Result<(), ScreenError> {
        let result = self.remove(id).await;
        self.cell.settle(result)
    }

    async fn remove(&self, id: &BookingId) -> Result<(), ScreenError> {
        let _busy = self.cell.begin(id.as_str())?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .delete_booking(Some(&credential), self.service, id)
            .await?;
        interpret(response, "Kunde inte radera bokningen.").await?;
        self.cell.apply(|view| view.retain(|b| &b.id != id));
        info!("Booking deleted");
        Ok(())
    }

    /// Ask the API to email the booking confirmation.
    ///
    /// # Errors
    ///
    /// Returns `Busy` if an action on the same booking is in flight, or the
    /// API/transport error.
    #[instrument(skip(self), fields(service = %self.service, id = %id))]
    pub async fn send_confirmation(&self, id: &BookingId) -> Result<(), ScreenError> {
        let result = async {
            let _busy = self.cell.begin(id.as_str())?;
            send_confirmation(&self.state, self.service, id).await
        }
        .await;
        self.cell.settle(result)
    }

    #[must_use]
    pub const fn service(&self) -> ServiceLine {
        self.service
    }

    #[must_use]
    pub fn bookings(&self) -> Vec<Booking> {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn is_acting_on(&self, id: &BookingId) -> bool {
        self.cell.is_busy(id.as_str())
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}

async fn send_confirmation(
    state: &AppState,
    service: ServiceLine,
    id: &BookingId,
) -> Result<(), ScreenError> {
    let credential = state.credential()?;
    let response = state
        .api()
        .send_confirmation(Some(&credential), service, id)
        .await?;
    interpret(response, "Kunde inte skicka bekräftelsen.").await?;
    info!("Confirmation sent");
    Ok(())
}

// =============================================================================
// Edit form
// =============================================================================

/// One editable price total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalInput {
    /// Key in `priceDetails.totals`.
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Editable copy of a booking.
///
/// Holds the raw text of every input; nothing is parsed until
/// [`BookingEditForm::validate`] or [`BookingEditForm::to_update_local`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingEditForm {
    pub service: ServiceLine,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:mm`
    pub time: String,
    pub email: String,
    pub phone: String,
    /// Only used by cleaning and bygg bookings.
    pub address_street: String,
    pub size: String,
    pub status: BookingStatus,
    /// Components of the grand total, in display order.
    pub totals: Vec<TotalInput>,
    pub grand_total: String,
}

const MOVING_TOTALS: [(&str, &str); 4] = [
    ("movingBase", "Flytt grundpris"),
    ("movingExtras", "Flytt tillägg"),
    ("cleaningBaseAfterDiscount", "Städ grundpris efter rabatt"),
    ("cleaningExtras", "Städ tillägg"),
];

const CLEANING_TOTALS: [(&str, &str); 2] = [("base", "Grundpris"), ("extras", "Tillägg")];

fn total_value(totals: &PriceTotals, key: &str) -> Option<f64> {
    match key {
        "movingBase" => totals.moving_base,
        "movingExtras" => totals.moving_extras,
        "cleaningBaseAfterDiscount" => totals.cleaning_base_after_discount,
        "cleaningExtras" => totals.cleaning_extras,
        "base" => totals.base,
        "extras" => totals.extras,
        _ => None,
    }
}

fn set_total_value(totals: &mut PriceTotals, key: &str, amount: f64) {
    let slot = match key {
        "movingBase" => &mut totals.moving_base,
        "movingExtras" => &mut totals.moving_extras,
        "cleaningBaseAfterDiscount" => &mut totals.cleaning_base_after_discount,
        "cleaningExtras" => &mut totals.cleaning_extras,
        "base" => &mut totals.base,
        "extras" => &mut totals.extras,
        _ => return,
    };
    *slot = Some(amount);
}

/// Empty input counts as zero; anything else must be a number.
fn parse_amount(input: &str) -> Result<f64, NumberError> {
    match parse_decimal_input(input) {
        Err(NumberError::Empty) => Ok(0.0),
        other => other,
    }
}

impl BookingEditForm {
    /// Form pre-filled from `booking`.
    ///
    /// The date input shows the stored date's UTC calendar day, which is the
    /// day the booking was saved under. A missing time defaults to 08:00;
    /// a missing grand total to the sum of its components.
    #[must_use]
    pub fn from_booking(service: ServiceLine, booking: &Booking) -> Self {
        let date = booking
            .date
            .as_deref()
            .and_then(parse_wire_instant)
            .map(|instant| CivilDate::from_instant_in(&instant, &Utc).to_string())
            .unwrap_or_default();
        let time = booking
            .time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TIME)
            .to_string();

        let stored = booking
            .price_details
            .as_ref()
            .map(|details| details.totals.clone())
            .unwrap_or_default();
        let keys: &[(&'static str, &'static str)] = match service {
            ServiceLine::Moving => &MOVING_TOTALS,
            ServiceLine::Cleaning | ServiceLine::Bygg => &CLEANING_TOTALS,
        };
        let components: Vec<(&'static str, &'static str, f64)> = keys
            .iter()
            .map(|&(key, label)| (key, label, total_value(&stored, key).unwrap_or(0.0)))
            .collect();
        let grand_total = stored
            .grand_total
            .unwrap_or_else(|| components.iter().map(|(_, _, v)| v).sum());

        Self {
            service,
            date,
            time,
            email: booking.email.clone().unwrap_or_default(),
            phone: booking.phone.clone().unwrap_or_default(),
            address_street: booking.address_street.clone().unwrap_or_default(),
            size: booking.size.map(|s| s.to_string()).unwrap_or_default(),
            status: booking.status(),
            totals: components
                .into_iter()
                .map(|(key, label, value)| TotalInput {
                    key,
                    label,
                    value: value.to_string(),
                })
                .collect(),
            grand_total: grand_total.to_string(),
        }
    }

    /// Change one total component and recompute the grand total.
    ///
    /// The grand total is left as it was while any component does not parse.
    pub fn set_total(&mut self, key: &str, value: impl Into<String>) {
        if let Some(input) = self.totals.iter_mut().find(|t| t.key == key) {
            input.value = value.into();
        }
        let sum: Result<f64, NumberError> =
            self.totals.iter().map(|t| parse_amount(&t.value)).sum();
        if let Ok(sum) = sum {
            self.grand_total = sum.to_string();
        }
    }

    /// Grand total for display, if it parses.
    #[must_use]
    pub fn grand_total_display(&self) -> Option<String> {
        parse_amount(&self.grand_total).ok().map(|v| Sek(v).to_string())
    }

    /// Field errors; empty when the form may be saved.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.date.trim().is_empty() {
            errors.add("date", "Välj datum");
        } else if CivilDate::parse(&self.date).is_err() {
            errors.add("date", "Ogiltigt datum");
        }
        if self.time.trim().is_empty() {
            errors.add("time", "Välj tid");
        } else if LocalTime::parse(&self.time).is_err() {
            errors.add("time", "Ogiltig tid");
        }
        if Email::parse(&self.email).is_err() {
            errors.add("email", "Ogiltig e-post");
        }
        if self.phone.trim().is_empty() {
            errors.add("phone", "Ange telefon");
        }
        if self.service != ServiceLine::Moving && self.address_street.trim().is_empty() {
            errors.add("addressStreet", "Ange adress");
        }
        if !parse_decimal_input(&self.size).is_ok_and(|size| size > 0.0) {
            errors.add("size", "Ogiltig yta");
        }
        for total in &self.totals {
            if parse_amount(&total.value).is_err() {
                errors.add(total.key, "Ogiltigt belopp");
            }
        }
        if parse_amount(&self.grand_total).is_err() {
            errors.add("grandTotal", "Ogiltigt belopp");
        }

        errors
    }

    /// PATCH body for this form, with `booking`'s price lines sent back
    /// unchanged.
    ///
    /// Moving bookings store date and time as one instant: the inputs are
    /// read on the wall clock of `tz`. Cleaning and bygg bookings store the
    /// plain date.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when [`BookingEditForm::validate`] fails or the
    /// wall-clock time does not exist in `tz`.
    pub fn to_update_in<Tz: TimeZone>(
        &self,
        booking: &Booking,
        tz: &Tz,
    ) -> Result<BookingUpdate, ScreenError> {
        self.build_update(booking, |date, time| combine_in(date, time, tz))
    }

    /// [`BookingEditForm::to_update_in`] on the local wall clock.
    ///
    /// # Errors
    ///
    /// See [`BookingEditForm::to_update_in`].
    pub fn to_update_local(&self, booking: &Booking) -> Result<BookingUpdate, ScreenError> {
        self.build_update(booking, combine_local)
    }

    fn build_update(
        &self,
        booking: &Booking,
        combine: impl FnOnce(CivilDate, LocalTime) -> Result<DateTime<Utc>, CivilDateError>,
    ) -> Result<BookingUpdate, ScreenError> {
        self.validate().into_result()?;

        let invalid = |field: &'static str, message: &str| {
            let mut errors = ValidationErrors::new();
            errors.add(field, message);
            ScreenError::Validation(errors)
        };
        let date = CivilDate::parse(&self.date).map_err(|_| invalid("date", "Ogiltigt datum"))?;
        let time = LocalTime::parse(&self.time).map_err(|_| invalid("time", "Ogiltig tid"))?;
        let email = Email::parse(&self.email).map_err(|_| invalid("email", "Ogiltig e-post"))?;
        let size = parse_decimal_input(&self.size).map_err(|_| invalid("size", "Ogiltig yta"))?;

        let mut totals = PriceTotals::default();
        for input in &self.totals {
            let amount =
                parse_amount(&input.value).map_err(|_| invalid(input.key, "Ogiltigt belopp"))?;
            set_total_value(&mut totals, input.key, amount);
        }
        totals.grand_total = Some(
            parse_amount(&self.grand_total).map_err(|_| invalid("grandTotal", "Ogiltigt belopp"))?,
        );

        let lines = booking
            .price_details
            .as_ref()
            .map(|details| details.lines.clone())
            .unwrap_or_default();
        let phone = self.phone.trim().to_string();

        let update = match self.service {
            ServiceLine::Moving => {
                totals.currency = Some(Sek::CODE.to_string());
                let instant = combine(date, time)
                    .map_err(|_| invalid("time", "Tiden finns inte det datumet"))?;
                BookingUpdate::Moving(MovingBookingUpdate {
                    date: to_wire_instant(&instant),
                    time: time.to_string(),
                    email: email.as_str().to_string(),
                    phone,
                    size,
                    status: self.status,
                    price_details: PriceDetails { lines, totals },
                })
            }
            ServiceLine::Cleaning | ServiceLine::Bygg => {
                BookingUpdate::Cleaning(CleaningBookingUpdate {
                    date,
                    time: time.to_string(),
                    email: email.as_str().to_string(),
                    phone,
                    address_street: self.address_street.trim().to_string(),
                    size,
                    status: self.status,
                    price_details: PriceDetails { lines, totals },
                })
            }
        };
        Ok(update)
    }
}

// =============================================================================
// Detail
// =============================================================================

/// One booking, with edit, confirmation and delete actions.
#[derive(Debug)]
pub struct BookingDetailScreen {
    state: AppState,
    service: ServiceLine,
    id: BookingId,
    cell: ScreenCell<Option<Booking>>,
}

impl BookingDetailScreen {
    #[must_use]
    pub fn new(state: AppState, service: ServiceLine, id: BookingId) -> Self {
        Self {
            state,
            service,
            id,
            cell: ScreenCell::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a request when no session is
    /// stored, or the API/transport error.
    #[instrument(skip(self), fields(service = %self.service, id = %self.id))]
    pub async fn load(&self) -> Result<Booking, ScreenError> {
        let result = self.fetch().await;
        self.cell.settle(result)
    }

    async fn fetch(&self) -> Result<Booking, ScreenError> {
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .get_booking(Some(&credential), self.service, &self.id)
            .await?;
        let body = interpret(response, "Kunde inte hämta bokningen.").await?;
        let booking = envelope::booking(&body).ok_or_else(|| {
            ScreenError::Transport("booking response has an unexpected shape".to_string())
        })?;
        self.cell.apply(|view| *view = Some(booking.clone()));
        Ok(booking)
    }

    /// Edit form for the loaded booking.
    #[must_use]
    pub fn edit_form(&self) -> Option<BookingEditForm> {
        self.cell
            .read(|view| view.as_ref().map(|b| BookingEditForm::from_booking(self.service, b)))
    }

    /// Save `form` and replace the booking with the server's copy.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without sending a request when the form is
    /// invalid, `Busy` while a save is in flight, or the API/transport error.
    #[instrument(skip(self, form), fields(service = %self.service, id = %self.id))]
    pub async fn save(&self, form: &BookingEditForm) -> Result<Booking, ScreenError> {
        let result = self.update(form).await;
        self.cell.settle(result)
    }

    async fn update(&self, form: &BookingEditForm) -> Result<Booking, ScreenError> {
        let current = match self.booking() {
            Some(booking) => booking,
            None => self.fetch().await?,
        };
        let update = form.to_update_local(&current)?;

        let _busy = self.cell.begin("save")?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .update_booking(Some(&credential), self.service, &self.id, &update)
            .await?;
        let body = interpret(response, "Uppdatering misslyckades").await?;

        let updated = match envelope::booking(&body) {
            Some(booking) => booking,
            None => self.fetch().await?,
        };
        self.cell.apply(|view| *view = Some(updated.clone()));
        info!("Booking updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `Busy` while another action is in flight, or the
    /// API/transport error.
    #[instrument(skip(self), fields(service = %self.service, id = %self.id))]
    pub async fn send_confirmation(&self) -> Result<(), ScreenError> {
        let result = async {
            let _busy = self.cell.begin("act")?;
            send_confirmation(&self.state, self.service, &self.id).await
        }
        .await;
        self.cell.settle(result)
    }

    /// Delete the booking. The caller navigates back to the list on success.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while another action is in flight, or the
    /// API/transport error.
    #[instrument(skip(self), fields(service = %self.service, id = %self.id))]
    pub async fn delete(&self) -> Result<(), ScreenError> {
        let result = self.remove().await;
        self.cell.settle(result)
    }

    async fn remove(&self) -> Result<(), ScreenError> {
        let _busy = self.cell.begin("act")?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .delete_booking(Some(&credential), self.service, &self.id)
            .await?;
        interpret(response, "Kunde inte radera bokningen.").await?;
        self.cell.apply(|view| *view = None);
        info!("Booking deleted");
        Ok(())
    }

    #[must_use]
    pub fn booking(&self) -> Option<Booking> {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{FixedOffset, Timelike};
    use serde_json::json;

    use super::*;

    fn moving_booking() -> Booking {
        serde_json::from_value(json!({
            "_id": "66f1c0ffee0123456789abcd",
            "date": "2025-03-10T13:30:00.000Z",
            "email": "anna@example.se",
            "phone": "0701234567",
            "size": 55,
            "status": "pending",
            "priceDetails": {
                "lines": [{ "key": "base", "label": "Flytt", "amount": 4000 }],
                "totals": { "movingBase": 4000, "movingExtras": 500 }
            }
        }))
        .unwrap()
    }

    fn cleaning_booking() -> Booking {
        serde_json::from_value(json!({
            "_id": "c1",
            "date": "2025-10-16",
            "time": "10:00",
            "email": "bo@example.se",
            "phone": "0707654321",
            "addressStreet": "Storgatan 1",
            "size": 72.5,
            "priceDetails": { "totals": { "base": 3000, "extras": 250, "grandTotal": 3250 } }
        }))
        .unwrap()
    }

    #[test]
    fn test_form_prefill() {
        let form = BookingEditForm::from_booking(ServiceLine::Moving, &moving_booking());
        assert_eq!(form.date, "2025-03-10");
        assert_eq!(form.time, "08:00");
        assert_eq!(form.size, "55");
        assert_eq!(form.totals.len(), 4);
        assert_eq!(form.grand_total, "4500");

        let form = BookingEditForm::from_booking(ServiceLine::Cleaning, &cleaning_booking());
        assert_eq!(form.date, "2025-10-16");
        assert_eq!(form.time, "10:00");
        assert_eq!(form.address_street, "Storgatan 1");
        assert_eq!(form.grand_total, "3250");
    }

    #[test]
    fn test_set_total_recomputes_grand_total() {
        let mut form = BookingEditForm::from_booking(ServiceLine::Cleaning, &cleaning_booking());
        form.set_total("extras", "500,5");
        assert_eq!(form.grand_total, "3500.5");

        form.set_total("base", "abc");
        assert_eq!(form.grand_total, "3500.5");
        assert!(form.validate().contains("base"));

        form.set_total("base", "");
        assert_eq!(form.grand_total, "500.5");
    }

    #[test]
    fn test_validation_messages() {
        let mut form = BookingEditForm::from_booking(ServiceLine::Cleaning, &cleaning_booking());
        assert!(form.validate().is_empty());

        form.date.clear();
        form.time.clear();
        form.email = "not-an-email".to_string();
        form.phone = "  ".to_string();
        form.address_street.clear();
        form.size = "0".to_string();
        let errors = form.validate();
        assert_eq!(errors.get("date"), Some("Välj datum"));
        assert_eq!(errors.get("time"), Some("Välj tid"));
        assert_eq!(errors.get("email"), Some("Ogiltig e-post"));
        assert_eq!(errors.get("phone"), Some("Ange telefon"));
        assert_eq!(errors.get("addressStreet"), Some("Ange adress"));
        assert_eq!(errors.get("size"), Some("Ogiltig yta"));

        let mut moving = BookingEditForm::from_booking(ServiceLine::Moving, &moving_booking());
        moving.address_street.clear();
        assert!(moving.validate().is_empty());
    }

    #[test]
    fn test_moving_update_combines_local_date_and_time() {
        let booking = moving_booking();
        let mut form = BookingEditForm::from_booking(ServiceLine::Moving, &booking);
        form.time = "14:30".to_string();
        form.email = "  Anna@Example.SE ".to_string();

        let tz = FixedOffset::east_opt(3600).unwrap();
        let BookingUpdate::Moving(update) = form.to_update_in(&booking, &tz).unwrap() else {
            panic!("expected a moving update");
        };
        assert_eq!(update.date, "2025-03-10T13:30:00.000Z");
        assert_eq!(update.time, "14:30");
        assert_eq!(update.email, "anna@example.se");
        assert_eq!(update.price_details.totals.currency.as_deref(), Some("SEK"));
        assert_eq!(update.price_details.totals.grand_total, Some(4500.0));
        assert_eq!(update.price_details.lines.len(), 1);

        let instant = parse_wire_instant(&update.date).unwrap().with_timezone(&tz);
        assert_eq!((instant.hour(), instant.minute()), (14, 30));
    }

    #[test]
    fn test_moving_update_follows_the_given_zone() {
        let booking = moving_booking();
        let mut form = BookingEditForm::from_booking(ServiceLine::Moving, &booking);
        form.time = "14:30".to_string();

        let update = |tz: chrono_tz::Tz| match form.to_update_in(&booking, &tz).unwrap() {
            BookingUpdate::Moving(update) => update.date,
            BookingUpdate::Cleaning(_) => panic!("expected a moving update"),
        };
        // US daylight saving time has started by March 10; Sweden's has not.
        assert_eq!(update(chrono_tz::America::New_York), "2025-03-10T18:30:00.000Z");
        assert_eq!(update(chrono_tz::Europe::Stockholm), "2025-03-10T13:30:00.000Z");

        let BookingUpdate::Moving(local) = form.to_update_local(&booking).unwrap() else {
            panic!("expected a moving update");
        };
        let expected = combine_local(
            CivilDate::parse("2025-03-10").unwrap(),
            LocalTime::parse("14:30").unwrap(),
        )
        .unwrap();
        assert_eq!(local.date, to_wire_instant(&expected));
    }

    #[test]
    fn test_cleaning_update_sends_plain_date() {
        let booking = cleaning_booking();
        let form = BookingEditForm::from_booking(ServiceLine::Bygg, &booking);
        let update = form.to_update_in(&booking, &Utc).unwrap();
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["date"], json!("2025-10-16"));
        assert_eq!(value["addressStreet"], json!("Storgatan 1"));
        assert_eq!(value["priceDetails"]["totals"]["base"], json!(3000.0));
        assert!(value["priceDetails"]["totals"].get("currency").is_none());
    }

    #[test]
    fn test_invalid_form_is_not_converted() {
        let booking = cleaning_booking();
        let mut form = BookingEditForm::from_booking(ServiceLine::Cleaning, &booking);
        form.size = "stor".to_string();
        let err = form.to_update_in(&booking, &Utc).unwrap_err();
        assert!(err.validation().unwrap().contains("size"));
    }
}
