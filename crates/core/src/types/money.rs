//! Swedish krona amounts for display.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An amount in SEK as the backend sends it (a JSON number).
///
/// Display follows Swedish conventions: space as thousands separator, comma
/// as decimal separator, two decimals, `kr` suffix.
///
/// ```
/// use booking_console_core::Sek;
///
/// assert_eq!(Sek(1250.5).to_string(), "1 250,50 kr");
/// assert_eq!(Sek(-99.0).to_string(), "-99,00 kr");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Sek(pub f64);

impl Sek {
    /// Currency code sent alongside totals.
    pub const CODE: &'static str = "SEK";

    /// The raw amount.
    #[must_use]
    pub const fn amount(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Sek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = format!("{:.2}", self.0.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }

        let sign = if self.0 < 0.0 && fixed != "0.00" { "-" } else { "" };
        write!(f, "{sign}{grouped},{cents} kr")
    }
}

impl From<f64> for Sek {
    fn from(amount: f64) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Sek(0.0).to_string(), "0,00 kr");
        assert_eq!(Sek(999.0).to_string(), "999,00 kr");
        assert_eq!(Sek(1000.0).to_string(), "1 000,00 kr");
        assert_eq!(Sek(1_234_567.891).to_string(), "1 234 567,89 kr");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Sek(-1500.25).to_string(), "-1 500,25 kr");
        assert_eq!(Sek(-0.001).to_string(), "0,00 kr");
    }
}
