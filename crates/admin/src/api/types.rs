//! Booking API payload types.
//!
//! Response types are lenient: every field the console does not strictly
//! need is optional or defaulted, and unknown fields are kept in `extra`
//! where the console shows them back to the operator.

use booking_console_core::{
    BookingId, BookingStatus, CivilDate, ContactId, DiscountId, DiscountKind, PhoneLeadId,
    PhoneLeadStatus, ServiceLine,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Bookings
// =============================================================================

/// A booking as returned by `/{service}` and `/{service}/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: BookingId,
    #[serde(default)]
    pub booking_number: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Raw wire value: a bare `YYYY-MM-DD` or an RFC 3339 instant.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub address_street: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub price_details: Option<PriceDetails>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Service-specific fields (addresses, add-ons, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Booking {
    /// Booking number, or the last six id characters uppercased.
    #[must_use]
    pub fn display_number(&self) -> String {
        self.booking_number
            .map_or_else(|| self.id.short_ref(), |n| n.to_string())
    }

    #[must_use]
    pub fn status(&self) -> BookingStatus {
        self.status.unwrap_or_default()
    }
}

/// Price breakdown stored on a booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceDetails {
    #[serde(default)]
    pub lines: Vec<PriceLine>,
    #[serde(default)]
    pub totals: PriceTotals,
}

/// One computed price line. Sent back unchanged on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Price totals. Moving bookings use the `moving*`/`cleaning*` components,
/// cleaning and bygg bookings use `base`/`extras`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTotals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_extras: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_base_after_discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_extras: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// PATCH body for a moving booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingBookingUpdate {
    /// Combined local date and time as an RFC 3339 UTC instant.
    pub date: String,
    pub time: String,
    pub email: String,
    pub phone: String,
    pub size: f64,
    pub status: BookingStatus,
    pub price_details: PriceDetails,
}

/// PATCH body for cleaning and bygg bookings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningBookingUpdate {
    /// Plain civil date.
    pub date: CivilDate,
    pub time: String,
    pub email: String,
    pub phone: String,
    pub address_street: String,
    pub size: f64,
    pub status: BookingStatus,
    pub price_details: PriceDetails,
}

/// Either booking update shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BookingUpdate {
    Moving(MovingBookingUpdate),
    Cleaning(CleaningBookingUpdate),
}

// =============================================================================
// Locked dates
// =============================================================================

/// A calendar date on which bookings are blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedDate {
    pub ymd: CivilDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// =============================================================================
// Discounts
// =============================================================================

/// A discount code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DiscountId>,
    /// Some deployments expose `id` instead of `_id`.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<DiscountId>,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type", default)]
    pub kind: DiscountKind,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase_amount: Option<f64>,
    #[serde(default)]
    pub applicable_services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Discount {
    /// Path key for deletion: `_id`, then `id`, then the code.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.id
            .as_ref()
            .or(self.alt_id.as_ref())
            .map(DiscountId::as_str)
            .or(Some(self.code.as_str()))
            .filter(|r| !r.is_empty())
    }
}

/// POST body for `/discount/create-discount`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPayload {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: f64,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<CivilDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<CivilDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_purchase_amount: Option<f64>,
    pub applicable_services: Vec<ServiceLine>,
}

impl From<DiscountPayload> for Discount {
    fn from(payload: DiscountPayload) -> Self {
        Self {
            id: None,
            alt_id: None,
            code: payload.code,
            kind: payload.kind,
            value: payload.value,
            is_active: payload.is_active,
            valid_from: payload.valid_from.map(|d| d.to_string()),
            valid_until: payload.valid_until.map(|d| d.to_string()),
            max_uses: payload.max_uses,
            min_purchase_amount: payload.min_purchase_amount,
            applicable_services: payload
                .applicable_services
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            uses: None,
            created_at: None,
        }
    }
}

// =============================================================================
// Price lists
// =============================================================================

/// A price list document on the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceList {
    /// `/prices`
    Moving,
    /// `/prices/clean`
    Cleaning,
}

/// One editable number in a price list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceField {
    /// Wire key.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Lives in `extraServices[0]` rather than at the top level.
    pub extra_service: bool,
}

const fn field(key: &'static str, label: &'static str) -> PriceField {
    PriceField {
        key,
        label,
        extra_service: false,
    }
}

const fn extra(key: &'static str, label: &'static str) -> PriceField {
    PriceField {
        key,
        label,
        extra_service: true,
    }
}

const MOVING_FIELDS: &[PriceField] = &[
    field("pricePerKvm", "Pris per kvm"),
    field("travelFee", "Framkörningsavgift"),
    field("fixedPrice", "Fast pris"),
    extra("packagingAllRooms", "Packning alla rum"),
    extra("packagingKitchen", "Packning kök"),
    extra("mounting", "Montering"),
];

const CLEANING_FIELDS: &[PriceField] = &[
    field("pricePerKvm", "Pris per kvm"),
    field("fixedPrice", "Fast pris"),
    extra("Persinner", "Persienner"),
    extra("ExtraBadrum", "Extra badrum"),
    extra("ExtraToalett", "Extra toalett"),
    extra("inglassadDusch", "Inglasad dusch"),
];

impl PriceList {
    pub const ALL: [Self; 2] = [Self::Moving, Self::Cleaning];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Moving => "/prices",
            Self::Cleaning => "/prices/clean",
        }
    }

    #[must_use]
    pub const fn fields(self) -> &'static [PriceField] {
        match self {
            Self::Moving => MOVING_FIELDS,
            Self::Cleaning => CLEANING_FIELDS,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Moving => "Flytthjälp",
            Self::Cleaning => "Flyttstädning",
        }
    }
}

impl std::str::FromStr for PriceList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moving" | "flytt" => Ok(Self::Moving),
            "cleaning" | "stad" | "clean" => Ok(Self::Cleaning),
            _ => Err(format!("unknown price list: {s}")),
        }
    }
}

// =============================================================================
// Leads
// =============================================================================

/// A corporate-cleaning enquiry from the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLead {
    #[serde(rename = "_id", alias = "id")]
    pub id: ContactId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub kvm: String,
    #[serde(default)]
    pub adress: String,
    #[serde(default)]
    pub postalcode: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ContactLead {
    /// Case-insensitive match over name, email, subject, city and address;
    /// phone numbers match as typed.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.name, &self.email, &self.subject, &self.city, &self.adress]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
            || self.phone.contains(query)
    }
}

/// A call-me-back request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneLead {
    #[serde(rename = "_id", alias = "id")]
    pub id: PhoneLeadId,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: PhoneLeadStatus,
    /// Free-text service label, e.g. `Flyttstädning`.
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
