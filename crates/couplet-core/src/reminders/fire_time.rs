//! Absolute fire-time computation for a single reminder.

use chrono::{DateTime, Duration, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;

use crate::event::{Event, Reminder};

/// Compute the absolute instant a reminder should fire.
///
/// The offset is subtracted from the event's local start wall-clock in the
/// event's *source* zone ("15 minutes before" is anchored to the event's
/// own locale), and the resulting wall-clock is then resolved against the
/// *system* zone, because the platform timer fires by the device's
/// wall-clock. When the two zones differ the anchor intentionally follows
/// the device; callers wanting event-zone-exact fires must reconcile the
/// zones themselves before scheduling.
///
/// Returns `None` when the local fire time cannot be resolved in the
/// system zone at all (a DST gap with no valid instant within the
/// following hour, or an offset underflowing the representable range),
/// which callers treat as a data-quality skip.
pub fn fire_time(event: &Event, reminder: &Reminder, system_tz: Tz) -> Option<DateTime<Utc>> {
    let source_tz = event.tz_or(system_tz);
    let local_start = event.start_time.with_timezone(&source_tz).naive_local();
    let local_fire = local_start.checked_sub_signed(reminder.offset())?;

    match system_tz.from_local_datetime(&local_fire) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        // Fall-back transition: the wall-clock occurs twice, take the first.
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        // Spring-forward gap: the wall-clock never occurs, push past it.
        LocalResult::None => system_tz
            .from_local_datetime(&(local_fire + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ReminderUnit;
    use chrono_tz::America::New_York;
    use chrono_tz::UTC;

    fn event_starting(start: DateTime<Utc>) -> Event {
        Event::try_new("Dinner", start, None, "alice").unwrap()
    }

    #[test]
    fn sixty_minutes_before_local_start() {
        // Event at 08:00 UTC; 60 minutes before is 07:00 UTC.
        let start = Utc.with_ymd_and_hms(2024, 3, 12, 8, 0, 0).unwrap();
        let event = event_starting(start).with_timezone("UTC");
        let reminder = Reminder::new(60, ReminderUnit::Minutes);

        let fire = fire_time(&event, &reminder, UTC).unwrap();
        assert_eq!(fire, Utc.with_ymd_and_hms(2024, 3, 12, 7, 0, 0).unwrap());
    }

    #[test]
    fn same_zone_event_and_system_agree() {
        let start = New_York
            .with_ymd_and_hms(2024, 3, 12, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let event = event_starting(start).with_timezone("America/New_York");
        let reminder = Reminder::new(15, ReminderUnit::Minutes);

        let fire = fire_time(&event, &reminder, New_York).unwrap();
        assert_eq!(fire, start - Duration::minutes(15));
    }

    #[test]
    fn mixed_zones_anchor_to_device_wall_clock() {
        // Event local start is 09:00 New York. With the device in UTC, the
        // 15-minutes-before wall-clock 08:45 resolves as 08:45 UTC, not
        // 08:45 New York. Documented behavior, preserved.
        let start = New_York
            .with_ymd_and_hms(2024, 3, 12, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let event = event_starting(start).with_timezone("America/New_York");
        let reminder = Reminder::new(15, ReminderUnit::Minutes);

        let fire = fire_time(&event, &reminder, UTC).unwrap();
        assert_eq!(fire, Utc.with_ymd_and_hms(2024, 3, 12, 8, 45, 0).unwrap());
    }

    #[test]
    fn missing_event_zone_uses_system_zone() {
        let start = Utc.with_ymd_and_hms(2024, 3, 12, 8, 0, 0).unwrap();
        let event = event_starting(start);
        let reminder = Reminder::new(1, ReminderUnit::Hours);

        let fire = fire_time(&event, &reminder, UTC).unwrap();
        assert_eq!(fire, start - Duration::hours(1));
    }

    #[test]
    fn larger_offset_fires_no_later() {
        let start = Utc.with_ymd_and_hms(2024, 3, 12, 8, 0, 0).unwrap();
        let event = event_starting(start).with_timezone("UTC");
        let small = fire_time(&event, &Reminder::new(10, ReminderUnit::Minutes), UTC).unwrap();
        let large = fire_time(&event, &Reminder::new(2, ReminderUnit::Days), UTC).unwrap();
        assert!(large <= small);
    }

    #[test]
    fn dst_gap_resolves_forward() {
        // 2024-03-10 02:30 never exists in New York (clocks jump 02:00 ->
        // 03:00). Event at 03:30 local with a 60-minute reminder lands in
        // the gap; the fire time must still resolve.
        let start = New_York
            .with_ymd_and_hms(2024, 3, 10, 3, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        let event = event_starting(start).with_timezone("America/New_York");
        let reminder = Reminder::new(60, ReminderUnit::Minutes);

        assert!(fire_time(&event, &reminder, New_York).is_some());
    }

    #[test]
    fn dst_fold_takes_earliest() {
        // 2024-11-03 01:30 occurs twice in New York. The earlier instant
        // wins so the reminder can never fire after a later-scheduled one.
        let start = Utc.with_ymd_and_hms(2024, 11, 3, 7, 0, 0).unwrap(); // 02:00 EST
        let event = event_starting(start).with_timezone("America/New_York");
        let reminder = Reminder::new(30, ReminderUnit::Minutes);

        let fire = fire_time(&event, &reminder, New_York).unwrap();
        // 01:30 EDT (first pass) == 05:30 UTC.
        assert_eq!(fire, Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap());
    }
}
