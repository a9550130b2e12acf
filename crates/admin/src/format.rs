//! Display formatting for screens.
//!
//! Dates render in Swedish short form (`24 dec. 2025`) in the display
//! timezone, never the viewer's. Missing or unparseable values render as
//! [`MISSING`].

use booking_console_core::{CivilDate, LocalTime, Sek, parse_wire_instant};
use chrono::TimeZone;

/// Placeholder for absent values.
pub const MISSING: &str = "—";

const MONTHS: [&str; 12] = [
    "jan.", "feb.", "mars", "apr.", "maj", "juni", "juli", "aug.", "sep.", "okt.", "nov.", "dec.",
];

/// `24 dec. 2025`
#[must_use]
pub fn short_date(date: CivilDate) -> String {
    let month = usize::try_from(date.month())
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTHS.get(i))
        .copied()
        .unwrap_or_default();
    format!("{:02} {month} {}", date.day(), date.year())
}

/// Short date of a wire date value as seen in `tz`.
///
/// Bare dates anchor at UTC midnight before conversion, so `2025-12-24`
/// renders as 24 December in any timezone east of UTC.
#[must_use]
pub fn date_in<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> String {
    raw.and_then(parse_wire_instant)
        .map_or_else(
            || MISSING.to_string(),
            |instant| short_date(CivilDate::from_instant_in(&instant, tz)),
        )
}

/// `24 dec. 2025 kl 14:30` in `tz`.
#[must_use]
pub fn date_time_in<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> String {
    raw.and_then(parse_wire_instant).map_or_else(
        || MISSING.to_string(),
        |instant| {
            format!(
                "{} kl {}",
                short_date(CivilDate::from_instant_in(&instant, tz)),
                LocalTime::from_instant_in(&instant, tz)
            )
        },
    )
}

/// SEK amount, or [`MISSING`].
#[must_use]
pub fn currency(amount: Option<f64>) -> String {
    amount.map_or_else(|| MISSING.to_string(), |a| Sek(a).to_string())
}

/// The text, or [`MISSING`] when absent or blank.
#[must_use]
pub fn text(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(MISSING)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono_tz::Europe::Stockholm;

    use super::*;

    #[test]
    fn test_short_date() {
        assert_eq!(short_date(CivilDate::parse("2025-12-24").unwrap()), "24 dec. 2025");
        assert_eq!(short_date(CivilDate::parse("2026-03-05").unwrap()), "05 mars 2026");
        assert_eq!(short_date(CivilDate::parse("2026-05-31").unwrap()), "31 maj 2026");
    }

    #[test]
    fn test_date_in_display_timezone() {
        // 23:30 UTC is already the next day in Stockholm.
        assert_eq!(date_in(Some("2025-10-15T23:30:00.000Z"), &Stockholm), "16 okt. 2025");
        assert_eq!(date_in(Some("2025-10-16"), &Stockholm), "16 okt. 2025");
        assert_eq!(date_in(Some("not a date"), &Stockholm), MISSING);
        assert_eq!(date_in(None, &Stockholm), MISSING);
    }

    #[test]
    fn test_date_time_in() {
        assert_eq!(
            date_time_in(Some("2025-03-10T13:30:00.000Z"), &Stockholm),
            "10 mars 2025 kl 14:30"
        );
        assert_eq!(
            date_time_in(Some("2025-07-01T06:00:00Z"), &Stockholm),
            "01 juli 2025 kl 08:00"
        );
    }

    #[test]
    fn test_currency_and_text() {
        assert_eq!(currency(Some(4500.0)), "4 500,00 kr");
        assert_eq!(currency(None), MISSING);
        assert_eq!(text(Some("  ")), MISSING);
        assert_eq!(text(Some("Anna")), "Anna");
    }
}
