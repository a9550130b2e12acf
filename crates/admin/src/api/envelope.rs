//! Response envelope adapters.
//!
//! The API wraps collections inconsistently: a bare array, `{data: [...]}`,
//! or a resource-named key such as `{bookings: [...]}`. Single resources may
//! come bare or as `{booking: {...}}`. One adapter per resource type turns
//! whatever arrived into typed values; elements that do not deserialize are
//! skipped with a warning instead of failing the whole list.

use booking_console_core::{CivilDate, parse_wire_instant};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::types::{Booking, ContactLead, Discount, LockedDate, PhoneLead};

/// First array found at the top level or under one of `keys`.
fn array_under<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Value::Array(items) = body {
        return Some(items);
    }
    keys.iter().find_map(|key| body.get(key).and_then(Value::as_array))
}

fn typed_items<T: DeserializeOwned>(items: &[Value], kind: &'static str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(kind, error = %e, "Skipping malformed item in API response");
                None
            }
        })
        .collect()
}

/// Object under `key`, or the body itself.
fn single<'a>(body: &'a Value, key: &str) -> &'a Value {
    body.get(key).filter(|v| v.is_object()).unwrap_or(body)
}

/// Booking list: array, `{data}` or `{bookings}`.
#[must_use]
pub fn bookings(body: &Value) -> Vec<Booking> {
    array_under(body, &["data", "bookings"])
        .map(|items| typed_items(items, "booking"))
        .unwrap_or_default()
}

/// Single booking: `{booking}` or bare.
#[must_use]
pub fn booking(body: &Value) -> Option<Booking> {
    serde_json::from_value(single(body, "booking").clone()).ok()
}

/// Discount list: array, `{data}` or `{discounts}`.
#[must_use]
pub fn discounts(body: &Value) -> Vec<Discount> {
    array_under(body, &["data", "discounts"])
        .map(|items| typed_items(items, "discount"))
        .unwrap_or_default()
}

/// Created discount: `{discount}` or bare. Only accepted when it has a code.
#[must_use]
pub fn discount(body: &Value) -> Option<Discount> {
    serde_json::from_value::<Discount>(single(body, "discount").clone())
        .ok()
        .filter(|d| !d.code.is_empty())
}

/// Locked dates. Rows may be plain strings, `{ymd}` or `{date}` objects.
#[must_use]
pub fn locked_dates(body: &Value) -> Vec<LockedDate> {
    let Some(items) = array_under(body, &["data"]) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let (raw, created_at) = match item {
                Value::String(s) => (s.as_str(), None),
                Value::Object(row) => {
                    let raw = row
                        .get("ymd")
                        .and_then(Value::as_str)
                        .or_else(|| row.get("date").and_then(Value::as_str))?;
                    let created_at = row
                        .get("createdAt")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    (raw, created_at)
                }
                _ => return None,
            };
            let Some(ymd) = locked_ymd(raw) else {
                warn!(raw, "Skipping locked date that is not a calendar date");
                return None;
            };
            Some(LockedDate { ymd, created_at })
        })
        .collect()
}

/// Locked dates are stored at UTC midnight, so instants read back in UTC.
fn locked_ymd(raw: &str) -> Option<CivilDate> {
    CivilDate::parse(raw)
        .ok()
        .or_else(|| parse_wire_instant(raw).map(|i| CivilDate::from_instant_in(&i, &Utc)))
}

/// The price list document: first array element, `{data}` or bare.
#[must_use]
pub fn price_document(body: &Value) -> Value {
    match body {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        _ => body.get("data").cloned().unwrap_or_else(|| body.clone()),
    }
}

/// Contact leads: array or `{data}`.
#[must_use]
pub fn contacts(body: &Value) -> Vec<ContactLead> {
    array_under(body, &["data"])
        .map(|items| typed_items(items, "contact"))
        .unwrap_or_default()
}

/// Phone leads: `{data}` or array.
#[must_use]
pub fn phone_leads(body: &Value) -> Vec<PhoneLead> {
    array_under(body, &["data"])
        .map(|items| typed_items(items, "phone lead"))
        .unwrap_or_default()
}

/// Error text carried by a failed response: `message`, a plain string body,
/// or a string under `data`.
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    let text = match body {
        Value::String(s) => Some(s.as_str()),
        _ => body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("data").and_then(Value::as_str)),
    };
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Bearer token from a login response.
#[must_use]
pub fn token(body: &Value) -> Option<String> {
    body.get("token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
