//! Discount code commands.
//!
//! # Usage
//!
//! ```bash
//! booking-console discounts list
//! booking-console discounts create sommar25 --value 25 --service cleaning --service moving
//! booking-console discounts create FAST500 --kind fixed --value 500 --valid-until 2025-08-31
//! booking-console discounts delete SOMMAR25
//! ```

use std::io::{self, Write};

use booking_console_admin::AppState;
use booking_console_admin::api::Discount;
use booking_console_admin::screens::{DiscountForm, DiscountScreen};
use booking_console_core::{DiscountKind, ServiceLine};
use clap::Args;

use super::CommandError;
use crate::render;

/// Arguments of `discounts create`.
#[derive(Args, Debug)]
pub struct NewDiscount {
    /// Discount code, stored uppercase
    pub code: String,

    /// percentage or fixed
    #[arg(long, default_value = "percentage")]
    pub kind: DiscountKind,

    /// Percentage (1-100) or amount in SEK
    #[arg(long)]
    pub value: String,

    /// Create the code switched off
    #[arg(long)]
    pub inactive: bool,

    /// YYYY-MM-DD
    #[arg(long)]
    pub valid_from: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub valid_until: Option<String>,

    #[arg(long)]
    pub max_uses: Option<String>,

    /// Minimum purchase amount in SEK
    #[arg(long)]
    pub min_purchase: Option<String>,

    /// Service line the code applies to (repeatable, default cleaning)
    #[arg(long = "service")]
    pub services: Vec<ServiceLine>,
}

impl NewDiscount {
    /// The create form filled from these arguments.
    pub fn to_form(&self) -> DiscountForm {
        let mut form = DiscountForm {
            kind: self.kind,
            value: self.value.clone(),
            is_active: !self.inactive,
            valid_from: self.valid_from.clone().unwrap_or_default(),
            valid_until: self.valid_until.clone().unwrap_or_default(),
            max_uses: self.max_uses.clone().unwrap_or_default(),
            min_purchase_amount: self.min_purchase.clone().unwrap_or_default(),
            ..DiscountForm::default()
        };
        form.set_code(&self.code);
        if !self.services.is_empty() {
            form.applicable_services.clone_from(&self.services);
        }
        form
    }
}

/// Whether `reference` names `discount` by id or by code.
fn refers_to(discount: &Discount, reference: &str) -> bool {
    let by_id = [&discount.id, &discount.alt_id]
        .into_iter()
        .flatten()
        .any(|id| id.as_str() == reference);
    by_id || discount.code.to_uppercase() == reference.trim().to_uppercase()
}

pub async fn list(state: &AppState) -> Result<(), CommandError> {
    let screen = DiscountScreen::new(state.clone());
    screen.load().await?;
    render::discounts(&mut io::stdout().lock(), &screen.discounts())?;
    Ok(())
}

/// Create a code. Existing codes are loaded first so duplicates are
/// refused without a request.
pub async fn create(state: &AppState, new: &NewDiscount) -> Result<(), CommandError> {
    let screen = DiscountScreen::new(state.clone());
    screen.load().await?;
    let created = screen.create(&new.to_form()).await?;
    writeln!(io::stdout().lock(), "Rabattkod {} skapad.", created.code)?;
    Ok(())
}

pub async fn delete(state: &AppState, reference: &str) -> Result<(), CommandError> {
    let screen = DiscountScreen::new(state.clone());
    screen.load().await?;
    let discount = screen
        .discounts()
        .into_iter()
        .find(|d| refers_to(d, reference))
        .ok_or_else(|| CommandError::Input(format!("ingen rabattkod {reference:?}")))?;

    screen.delete(&discount).await?;
    writeln!(io::stdout().lock(), "Rabattkod {} borttagen.", discount.code)?;
    Ok(())
}
