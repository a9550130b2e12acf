//! Dashboard: booking totals and the most recent bookings across services.

use booking_console_core::{CivilDate, ServiceLine, parse_wire_instant};
use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{instrument, warn};

use super::{ScreenCell, interpret};
use crate::api::{Booking, envelope};
use crate::error::ScreenError;
use crate::session::SessionCredential;
use crate::state::AppState;

const RECENT_LIMIT: usize = 10;

/// Bookings of one service line, or why they could not be loaded.
#[derive(Debug, Clone)]
pub struct ServiceCollection {
    pub service: ServiceLine,
    pub bookings: Vec<Booking>,
    pub error: Option<ScreenError>,
}

/// A booking in the recent list, tagged with its service line.
#[derive(Debug, Clone)]
pub struct RecentBooking {
    pub service: ServiceLine,
    pub booking: Booking,
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub totals: Vec<(ServiceLine, usize)>,
    /// Bookings whose civil date is today.
    pub today: usize,
    /// Bookings whose date is after now.
    pub upcoming: usize,
    /// Newest first by creation time.
    pub recent: Vec<RecentBooking>,
}

/// Dashboard screen.
#[derive(Debug)]
pub struct DashboardScreen {
    state: AppState,
    cell: ScreenCell<Vec<ServiceCollection>>,
}

impl DashboardScreen {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            cell: ScreenCell::default(),
        }
    }

    /// Fetch all three booking collections concurrently.
    ///
    /// Each collection succeeds or fails on its own; a failed collection is
    /// shown empty with its error attached.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a request when no session is
    /// stored, otherwise the first collection's error if any failed.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ScreenError> {
        let result = self.fetch_all().await;
        self.cell.settle(result)
    }

    async fn fetch_all(&self) -> Result<(), ScreenError> {
        let credential = self.state.credential()?;

        let (moving, cleaning, bygg) = tokio::join!(
            self.fetch(&credential, ServiceLine::Moving),
            self.fetch(&credential, ServiceLine::Cleaning),
            self.fetch(&credential, ServiceLine::Bygg),
        );

        let collections: Vec<ServiceCollection> = [
            (ServiceLine::Moving, moving),
            (ServiceLine::Cleaning, cleaning),
            (ServiceLine::Bygg, bygg),
        ]
        .into_iter()
        .map(|(service, result)| match result {
            Ok(bookings) => ServiceCollection {
                service,
                bookings,
                error: None,
            },
            Err(error) => {
                warn!(%service, error = %error, "Failed to fetch bookings");
                ServiceCollection {
                    service,
                    bookings: Vec::new(),
                    error: Some(error),
                }
            }
        })
        .collect();

        let first_error = collections.iter().find_map(|c| c.error.clone());
        self.cell.apply(|view| *view = collections);
        first_error.map_or(Ok(()), Err)
    }

    async fn fetch(
        &self,
        credential: &SessionCredential,
        service: ServiceLine,
    ) -> Result<Vec<Booking>, ScreenError> {
        let response = self
            .state
            .api()
            .list_bookings(Some(credential), service)
            .await?;
        let body = interpret(response, fetch_fallback(service)).await?;
        Ok(envelope::bookings(&body))
    }

    #[must_use]
    pub fn collections(&self) -> Vec<ServiceCollection> {
        self.cell.snapshot()
    }

    /// Figures at `now`, with "today" read on the local wall clock.
    #[must_use]
    pub fn summary(&self, now: DateTime<Utc>) -> DashboardSummary {
        self.summary_in(now, &Local)
    }

    /// Figures at `now`, with "today" read on the wall clock of `tz`.
    #[must_use]
    pub fn summary_in<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> DashboardSummary {
        self.cell.read(|collections| summarize(collections, now, tz))
    }

    #[must_use]
    pub fn error(&self) -> Option<ScreenError> {
        self.cell.error()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}

const fn fetch_fallback(service: ServiceLine) -> &'static str {
    match service {
        ServiceLine::Moving => "Kunde inte hämta flytt-bokningar.",
        ServiceLine::Cleaning => "Kunde inte hämta städ-bokningar.",
        ServiceLine::Bygg => "Kunde inte hämta byggstäd-bokningar.",
    }
}

/// Dashboard figures for `collections` at `now` in `tz`.
#[must_use]
pub fn summarize<Tz: TimeZone>(
    collections: &[ServiceCollection],
    now: DateTime<Utc>,
    tz: &Tz,
) -> DashboardSummary {
    let today = CivilDate::from_instant_in(&now, tz);
    let all = || collections.iter().flat_map(|c| c.bookings.iter());

    let today_count = all()
        .filter(|b| {
            b.date
                .as_deref()
                .and_then(|raw| CivilDate::from_wire_in(raw, tz))
                == Some(today)
        })
        .count();

    let upcoming = all()
        .filter(|b| {
            b.date
                .as_deref()
                .and_then(parse_wire_instant)
                .is_some_and(|instant| instant > now)
        })
        .count();

    let mut recent: Vec<RecentBooking> = collections
        .iter()
        .flat_map(|c| {
            c.bookings.iter().map(|booking| RecentBooking {
                service: c.service,
                booking: booking.clone(),
            })
        })
        .collect();
    recent.sort_by_key(|r| std::cmp::Reverse(created_millis(&r.booking)));
    recent.truncate(RECENT_LIMIT);

    DashboardSummary {
        totals: collections
            .iter()
            .map(|c| (c.service, c.bookings.len()))
            .collect(),
        today: today_count,
        upcoming,
        recent,
    }
}

/// Creation time in epoch millis; unparseable sorts as oldest.
fn created_millis(booking: &Booking) -> i64 {
    booking
        .created_at
        .as_deref()
        .and_then(parse_wire_instant)
        .map_or(0, |instant| instant.timestamp_millis())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::FixedOffset;
    use serde_json::json;

    use super::*;

    fn booking(id: &str, date: Option<&str>, created_at: Option<&str>) -> Booking {
        serde_json::from_value(json!({
            "_id": id,
            "date": date,
            "createdAt": created_at,
        }))
        .unwrap()
    }

    fn collection(service: ServiceLine, bookings: Vec<Booking>) -> ServiceCollection {
        ServiceCollection {
            service,
            bookings,
            error: None,
        }
    }

    #[test]
    fn test_today_and_upcoming() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let collections = vec![
            collection(
                ServiceLine::Moving,
                vec![
                    // 23:30 UTC on the 9th is the 10th at UTC+2.
                    booking("m1", Some("2025-06-09T23:30:00.000Z"), None),
                    booking("m2", Some("2025-06-12T08:00:00.000Z"), None),
                ],
            ),
            collection(
                ServiceLine::Cleaning,
                vec![
                    booking("c1", Some("2025-06-10"), None),
                    booking("c2", Some("garbage"), None),
                    booking("c3", None, None),
                ],
            ),
            collection(ServiceLine::Bygg, vec![booking("b1", Some("2025-05-01"), None)]),
        ];

        let summary = summarize(&collections, now, &tz);
        assert_eq!(summary.today, 2);
        assert_eq!(summary.upcoming, 1);
        assert_eq!(
            summary.totals,
            vec![
                (ServiceLine::Moving, 2),
                (ServiceLine::Cleaning, 3),
                (ServiceLine::Bygg, 1)
            ]
        );
    }

    #[test]
    fn test_recent_newest_first_and_capped() {
        let bookings: Vec<Booking> = (0..12)
            .map(|i| {
                booking(
                    &format!("m{i}"),
                    None,
                    Some(&format!("2025-01-{:02}T10:00:00.000Z", i + 1)),
                )
            })
            .collect();
        let collections = vec![
            collection(ServiceLine::Moving, bookings),
            collection(
                ServiceLine::Bygg,
                vec![
                    booking("b-new", None, Some("2025-02-01T00:00:00Z")),
                    booking("b-bad", None, Some("yesterday")),
                ],
            ),
        ];

        let summary = summarize(&collections, Utc::now(), &Utc);
        assert_eq!(summary.recent.len(), 10);
        assert_eq!(summary.recent[0].booking.id.as_str(), "b-new");
        assert_eq!(summary.recent[0].service, ServiceLine::Bygg);
        assert_eq!(summary.recent[1].booking.id.as_str(), "m11");
        assert!(summary.recent.iter().all(|r| r.booking.id.as_str() != "b-bad"));
    }
}
