//! Event CRUD orchestration.
//!
//! Glue between the backing store, the reminder scheduler, and the
//! timeline partitioner. Authorization (owner or creator only) and the
//! cancel-before-reschedule ordering both live here.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, Result};
use crate::event::Event;
use crate::reminders::{ReminderScheduler, ScheduleOutcome};
use crate::session::Session;
use crate::store::{AlarmService, EventStore};
use crate::timeline::{split_tracks, TimelineTracks};

/// Event CRUD plus reminder lifecycle, over injected collaborators.
pub struct EventService<S, A: AlarmService> {
    store: S,
    scheduler: Mutex<ReminderScheduler<A>>,
}

impl<S: EventStore, A: AlarmService> EventService<S, A> {
    pub fn new(store: S, scheduler: ReminderScheduler<A>) -> Self {
        Self {
            store,
            scheduler: Mutex::new(scheduler),
        }
    }

    fn scheduler(&self) -> MutexGuard<'_, ReminderScheduler<A>> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist a new event and register its reminders.
    ///
    /// The acting user must be the creator, and the event must land on
    /// their own or their partner's calendar.
    pub async fn create_event(&self, session: &Session, event: Event) -> Result<ScheduleOutcome> {
        if event.created_by != session.user_id {
            return Err(CoreError::NotAuthorized {
                user_id: session.user_id.clone(),
                action: "create",
                event_id: event.id.clone(),
            });
        }
        if event.owner_id != session.user_id && !session.is_partner(&event.owner_id) {
            return Err(CoreError::NotAuthorized {
                user_id: session.user_id.clone(),
                action: "create",
                event_id: event.id.clone(),
            });
        }

        self.store.insert(event.clone()).await?;
        Ok(self.scheduler().schedule_event(&event, Utc::now()))
    }

    /// Persist an edit, then cancel and re-register reminders.
    pub async fn update_event(&self, session: &Session, event: Event) -> Result<ScheduleOutcome> {
        let existing = self
            .store
            .get(&event.id)
            .await?
            .ok_or_else(|| CoreError::EventNotFound(event.id.clone()))?;
        if !existing.can_modify(&session.user_id) {
            return Err(CoreError::NotAuthorized {
                user_id: session.user_id.clone(),
                action: "update",
                event_id: event.id.clone(),
            });
        }

        self.store.update(event.clone()).await?;
        Ok(self.scheduler().schedule_event(&event, Utc::now()))
    }

    /// Cancel reminders and remove the event.
    pub async fn delete_event(&self, session: &Session, event_id: &str) -> Result<()> {
        let existing = self
            .store
            .get(event_id)
            .await?
            .ok_or_else(|| CoreError::EventNotFound(event_id.to_string()))?;
        if !existing.can_modify(&session.user_id) {
            return Err(CoreError::NotAuthorized {
                user_id: session.user_id.clone(),
                action: "delete",
                event_id: event_id.to_string(),
            });
        }

        self.scheduler().cancel_event(event_id);
        self.store.remove(event_id).await?;
        Ok(())
    }

    /// The partitioned timeline for a calendar date.
    ///
    /// A failed partner fetch degrades to an empty partner track; the user
    /// track always renders.
    pub async fn events_for_date(
        &self,
        session: &Session,
        selected: NaiveDate,
    ) -> Result<TimelineTracks> {
        let (from, to) = fetch_range(selected, session.timezone);

        let own = self
            .store
            .events_for_owner(&session.user_id, from, to)
            .await?;

        let partner = match &session.partner_id {
            Some(partner_id) => match self.store.events_for_owner(partner_id, from, to).await {
                Ok(events) => events,
                Err(err) => {
                    tracing::warn!(
                        partner_id = %partner_id,
                        error = %err,
                        "partner event fetch failed, rendering user track only"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(split_tracks(&own, &partner, session, selected))
    }

    /// Re-register reminders for every event the user owns on `date`
    /// (daily schedule refresh). Returns the number of alarms registered.
    pub async fn refresh_day(
        &self,
        session: &Session,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let (from, to) = fetch_range(date, session.timezone);
        let events = self
            .store
            .events_for_owner(&session.user_id, from, to)
            .await?;

        let mut scheduled = 0;
        let mut scheduler = self.scheduler();
        for event in &events {
            scheduled += scheduler.schedule_event(event, now).scheduled;
        }
        tracing::debug!(user_id = %session.user_id, %date, scheduled, "daily reminder refresh");
        Ok(scheduled)
    }
}

/// UTC fetch window around `selected`: local midnight a day before
/// through local midnight two days after. The store matches this window
/// by overlap, so an event spanning it is returned even when its start
/// lies far outside; the date predicate stays the final filter.
fn fetch_range(selected: NaiveDate, zone: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = day_start_utc(selected - Duration::days(1), zone);
    let to = day_start_utc(selected + Duration::days(2), zone);
    (from, to)
}

/// Local midnight resolved to UTC. DST folds take the first pass; a
/// midnight erased by spring-forward resolves just past the gap.
fn day_start_utc(date: NaiveDate, zone: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match zone.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => zone
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight)),
    }
}
