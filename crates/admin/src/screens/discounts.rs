//! Discount codes: list, create and delete.

use std::cmp::Ordering;

use booking_console_core::{
    CivilDate, CivilDateError, DiscountKind, NumberError, ServiceLine, parse_decimal_input,
};
use tracing::{info, instrument};

use super::{ScreenCell, interpret};
use crate::api::{Discount, DiscountPayload, envelope};
use crate::error::{ScreenError, ValidationErrors};
use crate::state::AppState;

/// Case-insensitive code order, ties broken by the exact code.
fn by_code(a: &Discount, b: &Discount) -> Ordering {
    a.code
        .to_lowercase()
        .cmp(&b.code.to_lowercase())
        .then_with(|| a.code.cmp(&b.code))
}

/// Input of the create-discount form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountForm {
    /// Kept uppercase.
    pub code: String,
    pub kind: DiscountKind,
    pub value: String,
    pub is_active: bool,
    /// `YYYY-MM-DD` or empty.
    pub valid_from: String,
    /// `YYYY-MM-DD` or empty.
    pub valid_until: String,
    /// Whole number or empty.
    pub max_uses: String,
    /// Amount or empty.
    pub min_purchase_amount: String,
    pub applicable_services: Vec<ServiceLine>,
}

impl Default for DiscountForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            kind: DiscountKind::Percentage,
            value: "0".to_string(),
            is_active: true,
            valid_from: String::new(),
            valid_until: String::new(),
            max_uses: String::new(),
            min_purchase_amount: String::new(),
            applicable_services: vec![ServiceLine::Cleaning],
        }
    }
}

fn optional_date(input: &str) -> Result<Option<CivilDate>, CivilDateError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    CivilDate::parse(input).map(Some)
}

fn optional_amount(input: &str) -> Result<Option<f64>, NumberError> {
    match parse_decimal_input(input) {
        Ok(value) => Ok(Some(value)),
        Err(NumberError::Empty) => Ok(None),
        Err(e) => Err(e),
    }
}

impl DiscountForm {
    pub fn set_code(&mut self, code: &str) {
        self.code = code.to_uppercase();
    }

    /// Field errors against the codes already in `existing`.
    #[must_use]
    pub fn validate(&self, existing: &[Discount]) -> ValidationErrors {
        self.parse(existing).err().unwrap_or_default()
    }

    /// POST body for this form.
    ///
    /// # Errors
    ///
    /// Returns `Validation` with every failing field.
    pub fn to_payload(&self, existing: &[Discount]) -> Result<DiscountPayload, ScreenError> {
        self.parse(existing).map_err(ScreenError::Validation)
    }

    fn parse(&self, existing: &[Discount]) -> Result<DiscountPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let code = self.code.trim().to_uppercase();
        if code.is_empty() {
            errors.add("code", "Ange kod.");
        } else if existing.iter().any(|d| d.code.trim().to_uppercase() == code) {
            errors.add("code", "Koden finns redan.");
        }

        let value = parse_decimal_input(&self.value).ok();
        match (self.kind, value) {
            (_, None) => errors.add("value", "Ange belopp."),
            (DiscountKind::Percentage, Some(v)) if v <= 0.0 || v > 100.0 => {
                errors.add("value", "Procent ska vara 1–100.");
            }
            (DiscountKind::Fixed, Some(v)) if v <= 0.0 => {
                errors.add("value", "Belopp måste vara > 0.");
            }
            _ => {}
        }

        let valid_from = optional_date(&self.valid_from);
        if valid_from.is_err() {
            errors.add("validFrom", "Ogiltigt datum.");
        }
        let valid_until = optional_date(&self.valid_until);
        if valid_until.is_err() {
            errors.add("validUntil", "Ogiltigt datum.");
        }
        if let (Ok(Some(from)), Ok(Some(until))) = (&valid_from, &valid_until)
            && until < from
        {
            errors.add("validUntil", "Slutdatum före startdatum.");
        }

        let max_uses = match optional_amount(&self.max_uses) {
            Ok(None) => None,
            Ok(Some(v)) if v < 0.0 => {
                errors.add("maxUses", "Måste vara ≥ 0.");
                None
            }
            Ok(Some(v)) if v.fract() != 0.0 || v > f64::from(u32::MAX) => {
                errors.add("maxUses", "Ange ett heltal.");
                None
            }
            // Whole and within u32 range, checked above.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(Some(v)) => Some(v as u32),
            Err(_) => {
                errors.add("maxUses", "Ange ett heltal.");
                None
            }
        };

        let min_purchase_amount = match optional_amount(&self.min_purchase_amount) {
            Ok(Some(v)) if v < 0.0 => {
                errors.add("minPurchaseAmount", "Måste vara ≥ 0.");
                None
            }
            Ok(v) => v,
            Err(_) => {
                errors.add("minPurchaseAmount", "Ange belopp.");
                None
            }
        };

        let mut applicable_services = Vec::new();
        for service in &self.applicable_services {
            if !applicable_services.contains(service) {
                applicable_services.push(*service);
            }
        }
        if applicable_services.is_empty() {
            errors.add("applicableServices", "Välj minst en tjänst.");
        }

        errors.into_result()?;
        Ok(DiscountPayload {
            code,
            kind: self.kind,
            value: value.unwrap_or_default(),
            is_active: self.is_active,
            valid_from: valid_from.ok().flatten(),
            valid_until: valid_until.ok().flatten(),
            max_uses,
            min_purchase_amount,
            applicable_services,
        })
    }
}

/// Discount code screen.
#[derive(Debug)]
pub struct DiscountScreen {
    state: AppState,
    cell: ScreenCell<Vec<Discount>>,
}

impl DiscountScreen {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            cell: ScreenCell::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a request when no session is
    /// stored, or the API/transport error. The list is emptied on failure.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ScreenError> {
        let result = self.fetch().await;
        if result.is_err() {
            self.cell.apply(Vec::clear);
        }
        self.cell.settle(result)
    }

    async fn fetch(&self) -> Result<(), ScreenError> {
        let credential = self.state.credential()?;
        let response = self.state.api().list_discounts(Some(&credential)).await?;
        let body = interpret(response, "Kunde inte hämta rabattkoder.").await?;
        let mut rows = envelope::discounts(&body);
        rows.sort_by(by_code);
        self.cell.apply(|view| *view = rows);
        Ok(())
    }

    /// Create a discount from `form` and insert it in code order.
    ///
    /// The row shown is the server's copy, or the submitted payload when the
    /// response does not carry one.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without a request when the form is invalid,
    /// `Busy` while a create is in flight, or the API/transport error.
    #[instrument(skip(self, form), fields(code = %form.code))]
    pub async fn create(&self, form: &DiscountForm) -> Result<Discount, ScreenError> {
        let result = self.submit(form).await;
        self.cell.settle(result)
    }

    async fn submit(&self, form: &DiscountForm) -> Result<Discount, ScreenError> {
        let payload = self.cell.read(|rows| form.to_payload(rows))?;
        let _busy = self.cell.begin("create")?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .create_discount(Some(&credential), &payload)
            .await?;
        let body = interpret(response, "Kunde inte skapa rabattkod.").await?;

        let created = envelope::discount(&body).unwrap_or_else(|| Discount::from(payload));
        self.cell.apply(|rows| {
            let pos = rows.partition_point(|row| by_code(row, &created) != Ordering::Greater);
            rows.insert(pos, created.clone());
        });
        info!(code = %created.code, "Discount created");
        Ok(created)
    }

    /// Delete `discount` by `_id`, `id` or code, and remove exactly that row.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the row has neither id nor code, `Busy`
    /// while the same row is being deleted, or the API/transport error.
    #[instrument(skip(self, discount), fields(code = %discount.code))]
    pub async fn delete(&self, discount: &Discount) -> Result<(), ScreenError> {
        let result = self.remove(discount).await;
        self.cell.settle(result)
    }

    async fn remove(&self, discount: &Discount) -> Result<(), ScreenError> {
        let Some(reference) = discount.reference() else {
            let mut errors = ValidationErrors::new();
            errors.add("code", "Rabattkoden saknar id och kod.");
            return Err(errors.into());
        };
        let _busy = self.cell.begin(reference)?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .delete_discount(Some(&credential), reference)
            .await?;
        interpret(response, "Kunde inte ta bort rabattkoden.").await?;

        self.cell.apply(|rows| {
            if let Some(pos) = rows.iter().position(|row| row == discount) {
                rows.remove(pos);
            }
        });
        info!(%reference, "Discount deleted");
        Ok(())
    }

    #[must_use]
    pub fn discounts(&self) -> Vec<Discount> {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
