//! Service lines and status enums shared across the console.

use serde::{Deserialize, Serialize};

/// Error returned when parsing one of the enums in this module from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// A bookable service line. Each one owns a resource collection on the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLine {
    /// Moving help (flytthjälp).
    Moving,
    /// Move-out cleaning (flyttstädning).
    Cleaning,
    /// Construction cleanup (byggstädning).
    Bygg,
}

impl ServiceLine {
    /// All service lines in dashboard order.
    pub const ALL: [Self; 3] = [Self::Moving, Self::Cleaning, Self::Bygg];

    /// The resource path segment, e.g. `moving` in `/moving/{id}`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Moving => "moving",
            Self::Cleaning => "cleaning",
            Self::Bygg => "bygg",
        }
    }

    /// Swedish display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Moving => "Flytthjälp",
            Self::Cleaning => "Flyttstädning",
            Self::Bygg => "Byggstädning",
        }
    }
}

impl std::fmt::Display for ServiceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceLine {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moving" | "flytt" | "flytthjalp" | "flytthjälp" => Ok(Self::Moving),
            "cleaning" | "stad" | "flyttstad" | "flyttstädning" => Ok(Self::Cleaning),
            "bygg" | "byggstad" | "byggstädning" => Ok(Self::Bygg),
            _ => Err(ParseEnumError::new("service line", s)),
        }
    }
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    /// Any value this client does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::new("booking status", s)),
        }
    }
}

/// Follow-up state of a phone lead. The wire values are Swedish labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PhoneLeadStatus {
    #[default]
    #[serde(rename = "Ingen status")]
    NoStatus,
    #[serde(rename = "Ska ringa upp")]
    CallBack,
    #[serde(rename = "Har Ringt")]
    Called,
}

impl PhoneLeadStatus {
    pub const ALL: [Self; 3] = [Self::NoStatus, Self::CallBack, Self::Called];

    /// The wire value, which doubles as the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoStatus => "Ingen status",
            Self::CallBack => "Ska ringa upp",
            Self::Called => "Har Ringt",
        }
    }
}

impl std::fmt::Display for PhoneLeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PhoneLeadStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .or(match wanted {
                "none" => Some(Self::NoStatus),
                "call-back" => Some(Self::CallBack),
                "called" => Some(Self::Called),
                _ => None,
            })
            .ok_or_else(|| ParseEnumError::new("phone lead status", s))
    }
}

/// How a discount reduces the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `value` is a percentage, 1 to 100.
    #[default]
    Percentage,
    /// `value` is an amount in SEK.
    Fixed,
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for DiscountKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" | "percent" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(ParseEnumError::new("discount type", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_service_line_parsing() {
        assert_eq!("moving".parse::<ServiceLine>().unwrap(), ServiceLine::Moving);
        assert_eq!("Flyttstad".parse::<ServiceLine>().unwrap(), ServiceLine::Cleaning);
        assert_eq!("bygg".parse::<ServiceLine>().unwrap(), ServiceLine::Bygg);
        assert!("garden".parse::<ServiceLine>().is_err());
    }

    #[test]
    fn test_booking_status_tolerates_unknown_values() {
        let status: BookingStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, BookingStatus::Unknown);
        let status: BookingStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, BookingStatus::Confirmed);
        assert!("unknown".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_phone_lead_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&PhoneLeadStatus::CallBack).unwrap(),
            "\"Ska ringa upp\""
        );
        let status: PhoneLeadStatus = serde_json::from_str("\"Har Ringt\"").unwrap();
        assert_eq!(status, PhoneLeadStatus::Called);
        assert_eq!(
            "har ringt".parse::<PhoneLeadStatus>().unwrap(),
            PhoneLeadStatus::Called
        );
        assert_eq!("none".parse::<PhoneLeadStatus>().unwrap(), PhoneLeadStatus::NoStatus);
    }

    #[test]
    fn test_discount_kind_serde() {
        assert_eq!(serde_json::to_string(&DiscountKind::Fixed).unwrap(), "\"fixed\"");
    }
}
