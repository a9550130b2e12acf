//! Civil dates, local times of day, and the conversions between them and instants.
//!
//! Two normalization directions exist and they are not interchangeable:
//!
//! - **Instant → civil date** reads the year/month/day in the *local* (or a
//!   supplied) timezone. Reading UTC fields here shifts dates by one day for
//!   anyone east or west of Greenwich near midnight.
//! - **Civil date → instant** anchors the date at *UTC midnight*. Display code
//!   then renders that instant in a pinned timezone rather than the viewer's.
//!
//! Every conversion that depends on "local" is generic over [`TimeZone`];
//! callers pass [`chrono::Local`] for the process wall clock, and
//! [`combine_local`] does so for date + time.

use core::fmt;
use core::str::FromStr;

use chrono::offset::LocalResult;
use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveTime, SecondsFormat, TimeDelta, TimeZone,
    Timelike, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`CivilDate`] or combining it with a time.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CivilDateError {
    /// The input is not shaped like `YYYY-MM-DD`.
    #[error("date must be formatted as YYYY-MM-DD (got {0:?})")]
    Format(String),
    /// The input is shaped correctly but names no real calendar day.
    #[error("{0} is not a calendar date")]
    OutOfRange(String),
    /// The wall-clock time does not exist in the timezone (DST gap that
    /// could not be resolved).
    #[error("{date} {time} does not exist in the local timezone")]
    NonexistentLocalTime {
        /// The civil date.
        date: String,
        /// The time of day.
        time: String,
    },
}

/// Errors that can occur when parsing a [`LocalTime`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalTimeError {
    /// The input is not shaped like `HH:mm`.
    #[error("time must be formatted as HH:mm (got {0:?})")]
    Format(String),
    /// Hour or minute out of range.
    #[error("{0} is not a valid time of day")]
    OutOfRange(String),
}

/// A calendar date without time-of-day or timezone.
///
/// The canonical text form is the fixed-width `YYYY-MM-DD`, which means
/// lexicographic ordering of the strings matches chronological ordering.
///
/// ## Examples
///
/// ```
/// use booking_console_core::CivilDate;
///
/// let date = CivilDate::parse("2025-12-24").unwrap();
/// assert_eq!(date.to_string(), "2025-12-24");
///
/// assert!(CivilDate::parse("2025-2-30").is_err());
/// assert!(CivilDate::parse("2025-02-30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate(NaiveDate);

impl CivilDate {
    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly ten characters of the form
    /// `dddd-dd-dd` or does not name a real calendar day.
    pub fn parse(s: &str) -> Result<Self, CivilDateError> {
        let well_formed = s.len() == 10
            && s.char_indices().all(|(i, c)| {
                if i == 4 || i == 7 {
                    c == '-'
                } else {
                    c.is_ascii_digit()
                }
            });
        if !well_formed {
            return Err(CivilDateError::Format(s.to_owned()));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| CivilDateError::OutOfRange(s.to_owned()))
    }

    /// Build a date from numeric components.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Civil date of `instant` as seen on a wall clock in `tz`.
    #[must_use]
    pub fn from_instant_in<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> Self {
        Self(instant.with_timezone(tz).date_naive())
    }

    /// Civil date of a date value received from the backend.
    ///
    /// Bare `YYYY-MM-DD` values are taken as-is. Full instants are read on
    /// the wall clock of `tz`. Returns `None` for anything unparseable.
    #[must_use]
    pub fn from_wire_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(date) = Self::parse(raw) {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| Self::from_instant_in(&dt.with_timezone(&Utc), tz))
    }

    /// The instant at UTC midnight starting this date.
    #[must_use]
    pub fn to_utc_midnight(self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day of month, 1-31.
    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Underlying chrono date.
    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for CivilDate {
    type Err = CivilDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CivilDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for CivilDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A wall-clock time of day with minute precision, written `HH:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTime(NaiveTime);

impl LocalTime {
    /// Parse a strict `HH:mm` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not five characters of the form
    /// `dd:dd` or the hour/minute is out of range.
    pub fn parse(s: &str) -> Result<Self, LocalTimeError> {
        let (hours, minutes) = s
            .split_once(':')
            .filter(|(h, m)| {
                h.len() == 2
                    && m.len() == 2
                    && h.bytes().all(|b| b.is_ascii_digit())
                    && m.bytes().all(|b| b.is_ascii_digit())
            })
            .ok_or_else(|| LocalTimeError::Format(s.to_owned()))?;

        let hour: u32 = hours
            .parse()
            .map_err(|_| LocalTimeError::Format(s.to_owned()))?;
        let minute: u32 = minutes
            .parse()
            .map_err(|_| LocalTimeError::Format(s.to_owned()))?;

        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| LocalTimeError::OutOfRange(s.to_owned()))
    }

    /// Build a time from hour and minute.
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Wall-clock time of `instant` in `tz`, truncated to the minute.
    #[must_use]
    pub fn from_instant_in<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> Self {
        let local = instant.with_timezone(tz);
        Self(NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(NaiveTime::MIN))
    }

    /// Hour, 0-23.
    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    /// Minute, 0-59.
    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for LocalTime {
    type Err = LocalTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for LocalTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Combine a civil date and a wall-clock time in `tz` into an instant.
///
/// Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant.
/// Times inside a DST gap move forward by one hour.
///
/// # Errors
///
/// Returns [`CivilDateError::NonexistentLocalTime`] if the wall-clock time
/// cannot be mapped to an instant even after moving past the gap.
pub fn combine_in<Tz: TimeZone>(
    date: CivilDate,
    time: LocalTime,
    tz: &Tz,
) -> Result<DateTime<Utc>, CivilDateError> {
    let naive = date.0.and_time(time.0);
    let resolved = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => naive
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest()),
    };

    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| CivilDateError::NonexistentLocalTime {
            date: date.to_string(),
            time: time.to_string(),
        })
}

/// Combine a civil date and a time using the local wall clock.
///
/// # Errors
///
/// See [`combine_in`].
pub fn combine_local(date: CivilDate, time: LocalTime) -> Result<DateTime<Utc>, CivilDateError> {
    combine_in(date, time, &Local)
}

/// Serialize an instant the way the backend expects combined date-time
/// fields: RFC 3339 in UTC with millisecond precision (`2025-03-10T13:30:00.000Z`).
#[must_use]
pub fn to_wire_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a date value received from the backend into an instant.
///
/// Bare `YYYY-MM-DD` values anchor at UTC midnight; anything else must be
/// RFC 3339. Returns `None` for unparseable input.
#[must_use]
pub fn parse_wire_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = CivilDate::parse(raw) {
        return Some(date.to_utc_midnight());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    fn zones() -> Vec<FixedOffset> {
        [-12, -8, -5, -1, 0, 1, 2, 5, 9, 13, 14]
            .into_iter()
            .map(|h| FixedOffset::east_opt(h * 3600).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_valid() {
        let date = CivilDate::parse("2025-03-10").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 3, 10));
    }

    #[test]
    fn test_parse_rejects_loose_shapes() {
        for bad in ["2025-3-10", "2025/03/10", "25-03-10", "2025-03-10T00:00", "", "abcd-ef-gh"] {
            assert!(
                matches!(CivilDate::parse(bad), Err(CivilDateError::Format(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_day() {
        assert!(matches!(
            CivilDate::parse("2025-02-29"),
            Err(CivilDateError::OutOfRange(_))
        ));
        assert!(CivilDate::parse("2024-02-29").is_ok());
    }

    #[test]
    fn test_display_is_zero_padded() {
        let date = CivilDate::from_ymd(987, 1, 2).unwrap();
        assert_eq!(date.to_string(), "0987-01-02");
    }

    #[test]
    fn test_local_extraction_round_trip() {
        // 2025-03-09T23:30Z is already the 10th east of UTC and still the 9th west of it.
        let instant = Utc.with_ymd_and_hms(2025, 3, 9, 23, 30, 0).unwrap();
        for tz in zones() {
            let local = instant.with_timezone(&tz);
            let date = CivilDate::from_instant_in(&instant, &tz);
            let reparsed = CivilDate::parse(&date.to_string()).unwrap();
            assert_eq!(
                (reparsed.year(), reparsed.month(), reparsed.day()),
                (local.year(), local.month(), local.day())
            );
        }
    }

    #[test]
    fn test_utc_anchor_is_immune_to_offset() {
        for raw in ["2025-01-01", "2025-12-24", "2024-02-29", "1999-12-31"] {
            let date = CivilDate::parse(raw).unwrap();
            let anchored = date.to_utc_midnight();
            for tz in zones() {
                // However the viewer's clock shows it, the UTC fields are the input.
                let viewed = anchored.with_timezone(&tz).with_timezone(&Utc);
                assert_eq!(CivilDate::from_instant_in(&viewed, &Utc).to_string(), raw);
            }
        }
    }

    #[test]
    fn test_combine_keeps_wall_clock_in_every_zone() {
        let date = CivilDate::parse("2025-03-10").unwrap();
        let time = LocalTime::parse("14:30").unwrap();
        for tz in zones() {
            let instant = combine_in(date, time, &tz).unwrap();
            let wall = instant.with_timezone(&tz);
            assert_eq!((wall.month(), wall.day()), (3, 10));
            assert_eq!((wall.hour(), wall.minute()), (14, 30));
        }
    }

    #[test]
    fn test_combine_serializes_as_utc_millis() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let instant = combine_in(
            CivilDate::parse("2025-03-10").unwrap(),
            LocalTime::parse("14:30").unwrap(),
            &tz,
        )
        .unwrap();
        assert_eq!(to_wire_instant(&instant), "2025-03-10T13:30:00.000Z");
    }

    #[test]
    fn test_local_time_parse() {
        assert_eq!(LocalTime::parse("08:05").unwrap().to_string(), "08:05");
        assert!(matches!(
            LocalTime::parse("8:05"),
            Err(LocalTimeError::Format(_))
        ));
        assert!(matches!(
            LocalTime::parse("24:00"),
            Err(LocalTimeError::OutOfRange(_))
        ));
        assert!(LocalTime::parse("12:60").is_err());
    }

    #[test]
    fn test_parse_wire_instant() {
        let bare = parse_wire_instant("2025-12-24").unwrap();
        assert_eq!(bare, Utc.with_ymd_and_hms(2025, 12, 24, 0, 0, 0).unwrap());

        let full = parse_wire_instant("2025-03-10T13:30:00.000Z").unwrap();
        assert_eq!(full, Utc.with_ymd_and_hms(2025, 3, 10, 13, 30, 0).unwrap());

        assert!(parse_wire_instant("next tuesday").is_none());
    }

    #[test]
    fn test_from_wire_in_reads_instants_on_local_clock() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = CivilDate::from_wire_in("2025-06-30T22:30:00Z", &tz).unwrap();
        assert_eq!(date.to_string(), "2025-07-01");

        // Bare dates never shift.
        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        let date = CivilDate::from_wire_in("2025-07-01", &west).unwrap();
        assert_eq!(date.to_string(), "2025-07-01");
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let date = CivilDate::parse("2025-12-24").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-12-24\"");
        let back: CivilDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
        assert!(serde_json::from_str::<CivilDate>("\"24/12/2025\"").is_err());
    }

    #[test]
    fn test_lexicographic_order_matches_chronological() {
        let mut raw = vec!["2025-12-24", "2025-01-05", "2024-12-31", "2025-10-01"];
        let mut dates: Vec<CivilDate> = raw.iter().map(|s| s.parse().unwrap()).collect();
        raw.sort_unstable();
        dates.sort();
        let rendered: Vec<String> = dates.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, raw);
    }
}
