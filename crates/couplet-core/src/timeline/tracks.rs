//! Partitioning of events into user and partner tracks.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::event::Event;
use crate::session::Session;
use crate::timeline::matching::{occurs_on, resolve_zone};

/// The two chronological columns of the shared timeline.
#[derive(Debug, Clone, Default)]
pub struct TimelineTracks {
    pub user: Vec<Event>,
    pub partner: Vec<Event>,
}

impl TimelineTracks {
    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.partner.is_empty()
    }
}

/// Split events into disjoint user/partner tracks for `selected`.
///
/// `own_events` is the unified set fetched for the current user (their own
/// events plus anything the partner scheduled onto their calendar);
/// `partner_events` is the partner's set, empty when no partner is linked
/// or the fetch failed -- an empty partner set never blocks the user track.
///
/// Rules:
/// - User track: owned by the current user, matching in the viewer's zone,
///   and not cross-posted to the partner.
/// - Partner track: owned by someone else and matching in the event's own
///   source zone (the partner's perspective), or created by the current
///   user with `for_partner` set. Cross-posted events appear on the
///   partner track only.
///
/// Both tracks come back sorted ascending by start instant.
pub fn split_tracks(
    own_events: &[Event],
    partner_events: &[Event],
    session: &Session,
    selected: NaiveDate,
) -> TimelineTracks {
    let mut tracks = TimelineTracks::default();
    let mut partner_ids: HashSet<&str> = HashSet::new();

    for event in own_events {
        if event.created_by == session.user_id && event.for_partner {
            // Scheduled by the current user on the partner's calendar:
            // never on the creator's own track.
            let zone = resolve_zone(event, session.timezone);
            if occurs_on(event, selected, zone) && partner_ids.insert(event.id.as_str()) {
                tracks.partner.push(event.clone());
            }
            continue;
        }
        if event.owner_id == session.user_id && occurs_on(event, selected, session.timezone) {
            tracks.user.push(event.clone());
        }
    }

    for event in partner_events {
        if event.owner_id == session.user_id {
            continue;
        }
        let zone = resolve_zone(event, session.timezone);
        if occurs_on(event, selected, zone) && partner_ids.insert(event.id.as_str()) {
            tracks.partner.push(event.clone());
        }
    }

    tracks.user.sort_by_key(|e| e.start_time);
    tracks.partner.sort_by_key(|e| e.start_time);
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PartnerLink;
    use chrono::{DateTime, TimeZone, Utc};

    fn session() -> Session {
        Session::new("alice", chrono_tz::UTC).with_partner(PartnerLink {
            partner_id: "bob".into(),
            couple_id: "alice-bob".into(),
        })
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
    }

    fn selected() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn owned_by(owner: &str, title: &str, hour: u32) -> Event {
        Event::try_new(title, at(hour), None, owner).unwrap()
    }

    #[test]
    fn events_land_on_their_owners_tracks() {
        let own = vec![owned_by("alice", "Lunch", 12)];
        let partner = vec![owned_by("bob", "Gym", 18)];
        let tracks = split_tracks(&own, &partner, &session(), selected());

        assert_eq!(tracks.user.len(), 1);
        assert_eq!(tracks.user[0].title, "Lunch");
        assert_eq!(tracks.partner.len(), 1);
        assert_eq!(tracks.partner[0].title, "Gym");
    }

    #[test]
    fn cross_posted_event_appears_on_partner_track_only() {
        let own = vec![
            owned_by("alice", "Lunch", 12),
            owned_by("alice", "Surprise dinner", 19).with_for_partner(true),
        ];
        let tracks = split_tracks(&own, &[], &session(), selected());

        assert_eq!(tracks.user.len(), 1);
        assert_eq!(tracks.user[0].title, "Lunch");
        assert_eq!(tracks.partner.len(), 1);
        assert_eq!(tracks.partner[0].title, "Surprise dinner");
    }

    #[test]
    fn tracks_are_disjoint_by_id() {
        let cross = owned_by("alice", "Surprise", 19).with_for_partner(true);
        let own = vec![owned_by("alice", "Lunch", 12), cross.clone()];
        // The same cross-posted event also shows up in the partner fetch.
        let partner = vec![owned_by("bob", "Gym", 18)];
        let tracks = split_tracks(&own, &partner, &session(), selected());

        let user_ids: HashSet<_> = tracks.user.iter().map(|e| e.id.clone()).collect();
        let partner_ids: HashSet<_> = tracks.partner.iter().map(|e| e.id.clone()).collect();
        assert!(user_ids.is_disjoint(&partner_ids));
        assert_eq!(tracks.partner.len(), 2);
    }

    #[test]
    fn empty_partner_data_never_blocks_user_track() {
        let own = vec![owned_by("alice", "Lunch", 12)];
        let tracks = split_tracks(&own, &[], &session(), selected());
        assert_eq!(tracks.user.len(), 1);
        assert!(tracks.partner.is_empty());
    }

    #[test]
    fn tracks_sorted_by_start_instant() {
        let own = vec![
            owned_by("alice", "Later", 15),
            owned_by("alice", "Earlier", 8),
        ];
        let tracks = split_tracks(&own, &[], &session(), selected());
        assert_eq!(tracks.user[0].title, "Earlier");
        assert_eq!(tracks.user[1].title, "Later");
    }

    #[test]
    fn partner_track_uses_event_source_zone() {
        // 2024-03-10 22:00 New York: already the 11th in UTC, but still the
        // 10th from the event's own perspective.
        let start = chrono_tz::America::New_York
            .with_ymd_and_hms(2024, 3, 10, 22, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let partner_event = Event::try_new("Late show", start, None, "bob")
            .unwrap()
            .with_timezone("America/New_York");

        let tracks = split_tracks(&[], &[partner_event], &session(), selected());
        assert_eq!(tracks.partner.len(), 1);
    }

    #[test]
    fn off_date_events_are_excluded() {
        let own = vec![owned_by("alice", "Lunch", 12)];
        let other_day = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let tracks = split_tracks(&own, &[], &session(), other_day);
        assert!(tracks.is_empty());
    }
}
