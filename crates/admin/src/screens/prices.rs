//! Price list editor.

use booking_console_core::parse_decimal_input;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::{ScreenCell, interpret};
use crate::api::{PriceField, PriceList, envelope};
use crate::error::{ScreenError, ValidationErrors};
use crate::state::AppState;

const EXTRA_SERVICES: &str = "extraServices";

/// Editable values of one price list, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceValues {
    pub values: Vec<(PriceField, String)>,
    /// Set after a successful save, cleared by the next edit.
    pub ok_message: Option<String>,
}

/// Field values from a price document. Extra services live in the first
/// element of `extraServices`; missing values are empty.
#[must_use]
pub fn read_document(list: PriceList, document: &Value) -> Vec<(PriceField, String)> {
    let extras = document
        .get(EXTRA_SERVICES)
        .and_then(Value::as_array)
        .and_then(|items| items.first());

    list.fields()
        .iter()
        .map(|field| {
            let source = if field.extra_service { extras } else { Some(document) };
            let value = source
                .and_then(|doc| doc.get(field.key))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            (*field, value)
        })
        .collect()
}

/// PATCH body for `values`: top-level numbers plus one `extraServices`
/// element.
///
/// # Errors
///
/// Returns `Validation` keyed by field for every value that is not a
/// finite number.
pub fn build_document(values: &[(PriceField, String)]) -> Result<Value, ScreenError> {
    let mut errors = ValidationErrors::new();
    let mut top = Map::new();
    let mut extras = Map::new();

    for (field, raw) in values {
        match parse_decimal_input(raw) {
            Ok(number) => {
                let target = if field.extra_service { &mut extras } else { &mut top };
                target.insert(field.key.to_string(), Value::from(number));
            }
            Err(_) => errors.add(field.key, "Ange ett giltigt numeriskt värde."),
        }
    }
    errors.into_result()?;

    top.insert(
        EXTRA_SERVICES.to_string(),
        Value::Array(vec![Value::Object(extras)]),
    );
    Ok(Value::Object(top))
}

/// Price list screen.
#[derive(Debug)]
pub struct PriceScreen {
    state: AppState,
    list: PriceList,
    cell: ScreenCell<PriceValues>,
}

impl PriceScreen {
    #[must_use]
    pub fn new(state: AppState, list: PriceList) -> Self {
        let empty = list
            .fields()
            .iter()
            .map(|field| (*field, String::new()))
            .collect();
        Self {
            state,
            list,
            cell: ScreenCell::new(PriceValues {
                values: empty,
                ok_message: None,
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a request when no session is
    /// stored, or the API/transport error.
    #[instrument(skip(self), fields(list = ?self.list))]
    pub async fn load(&self) -> Result<(), ScreenError> {
        let result = self.fetch().await;
        self.cell.settle(result)
    }

    async fn fetch(&self) -> Result<(), ScreenError> {
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .get_prices(Some(&credential), self.list)
            .await?;
        let body = interpret(response, "Kunde inte hämta priser.").await?;
        let values = read_document(self.list, &envelope::price_document(&body));
        self.cell.apply(|view| {
            view.values = values;
            view.ok_message = None;
        });
        Ok(())
    }

    /// Change the typed value of `key`.
    ///
    /// Returns false if the list has no such field.
    pub fn set(&self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut found = false;
        self.cell.apply(|view| {
            if let Some((_, slot)) = view.values.iter_mut().find(|(f, _)| f.key == key) {
                *slot = value;
                found = true;
            }
            view.ok_message = None;
        });
        found
    }

    /// Save every field.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without a request when a value is not a
    /// number, `Busy` while a save is in flight, or the API/transport error.
    #[instrument(skip(self), fields(list = ?self.list))]
    pub async fn save(&self) -> Result<String, ScreenError> {
        let result = self.submit().await;
        self.cell.settle(result)
    }

    async fn submit(&self) -> Result<String, ScreenError> {
        let document = self.cell.read(|view| build_document(&view.values))?;
        let _busy = self.cell.begin("save")?;
        let credential = self.state.credential()?;
        let response = self
            .state
            .api()
            .save_prices(Some(&credential), self.list, document)
            .await?;
        interpret(response, "Kunde inte spara priser.").await?;

        let message = "Priser uppdaterade.".to_string();
        self.cell.apply(|view| view.ok_message = Some(message.clone()));
        info!("Prices updated");
        Ok(message)
    }

    #[must_use]
    pub fn values(&self) -> PriceValues {
        self.cell.snapshot()
    }

    #[must_use]
    pub const fn list(&self) -> PriceList {
        self.list
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
