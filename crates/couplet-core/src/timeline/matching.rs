//! Event date-matching predicate.
//!
//! Decides whether an event should appear on a given calendar date. Both
//! endpoints are converted into a single reference zone before any
//! comparison; zones are never mixed within one comparison, since the same
//! instant can land on different calendar dates in different zones.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::event::Event;

/// Whether `event` occurs on `selected` when viewed from `zone`.
///
/// The event matches when the selected date equals the event's local start
/// date or local end date, or falls strictly inside a multi-day span.
/// Ownership is a separate concern handled by
/// [`split_tracks`](crate::timeline::split_tracks).
///
/// Pure and deterministic for a given (event, date, zone) tuple.
pub fn occurs_on(event: &Event, selected: NaiveDate, zone: Tz) -> bool {
    let start_date = event.start_time.with_timezone(&zone).date_naive();
    let end_date = event.effective_end().with_timezone(&zone).date_naive();

    start_date == selected || end_date == selected || (start_date < selected && selected < end_date)
}

/// The zone an event's placement should be computed in, with fallback.
///
/// An empty zone id silently uses the fallback; a non-empty but unparseable
/// one does too, but is logged as a data-quality signal rather than raised
/// to the caller.
pub fn resolve_zone(event: &Event, fallback: Tz) -> Tz {
    if event.timezone.is_empty() {
        return fallback;
    }
    match event.source_tz() {
        Some(tz) => tz,
        None => {
            tracing::warn!(
                event_id = %event.id,
                zone = %event.timezone,
                "invalid timezone id on event, falling back to viewer zone"
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::America::New_York;
    use chrono_tz::Asia::Kolkata;

    fn event_at(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Event {
        Event::try_new("Dinner", start, end, "alice").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matches_start_date_in_viewer_zone() {
        // 2024-03-10 09:00 New York == 2024-03-10 13:00 UTC
        let start = New_York
            .with_ymd_and_hms(2024, 3, 10, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let event = event_at(start, None);

        assert!(occurs_on(&event, date(2024, 3, 10), New_York));
        assert!(!occurs_on(&event, date(2024, 3, 9), New_York));
        assert!(!occurs_on(&event, date(2024, 3, 11), New_York));
    }

    #[test]
    fn same_instant_lands_on_different_dates_per_zone() {
        // 2024-03-10 22:00 New York is already 2024-03-11 in Kolkata.
        let start = New_York
            .with_ymd_and_hms(2024, 3, 10, 22, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let event = event_at(start, None);

        assert!(occurs_on(&event, date(2024, 3, 10), New_York));
        assert!(!occurs_on(&event, date(2024, 3, 10), Kolkata));
        assert!(occurs_on(&event, date(2024, 3, 11), Kolkata));
    }

    #[test]
    fn morning_ny_event_viewed_from_kolkata() {
        // 2024-03-10 09:00 New York == 2024-03-10 18:30 Kolkata: same date
        // in both zones, so both viewers see it on the 10th.
        let start = New_York
            .with_ymd_and_hms(2024, 3, 10, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let event = event_at(start, None);

        assert!(occurs_on(&event, date(2024, 3, 10), Kolkata));
        assert!(!occurs_on(&event, date(2024, 3, 11), Kolkata));
    }

    #[test]
    fn multi_day_span_includes_interior_and_boundary_dates() {
        let start = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
        let event = event_at(start, Some(end));

        assert!(occurs_on(&event, date(2024, 3, 8), chrono_tz::UTC));
        assert!(occurs_on(&event, date(2024, 3, 9), chrono_tz::UTC));
        assert!(occurs_on(&event, date(2024, 3, 10), chrono_tz::UTC));
        assert!(occurs_on(&event, date(2024, 3, 11), chrono_tz::UTC));
        assert!(!occurs_on(&event, date(2024, 3, 7), chrono_tz::UTC));
        assert!(!occurs_on(&event, date(2024, 3, 12), chrono_tz::UTC));
    }

    #[test]
    fn default_end_keeps_short_event_on_one_date() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap();
        let event = event_at(start, None);
        assert!(occurs_on(&event, date(2024, 3, 10), chrono_tz::UTC));
        assert!(!occurs_on(&event, date(2024, 3, 11), chrono_tz::UTC));
    }

    #[test]
    fn event_crossing_local_midnight_matches_both_dates() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();
        let event = event_at(start, Some(start + Duration::hours(1)));
        assert!(occurs_on(&event, date(2024, 3, 10), chrono_tz::UTC));
        assert!(occurs_on(&event, date(2024, 3, 11), chrono_tz::UTC));
    }

    #[test]
    fn resolve_zone_fallbacks() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap();
        let event = event_at(start, None);
        assert_eq!(resolve_zone(&event, Kolkata), Kolkata);

        let event = event.with_timezone("America/New_York");
        assert_eq!(resolve_zone(&event, Kolkata), New_York);

        let event = event.with_timezone("Mars/Olympus_Mons");
        assert_eq!(resolve_zone(&event, Kolkata), Kolkata);
    }
}
