//! One-shot alarm scheduling for event reminders.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventId, Reminder, ReminderUnit};
use crate::reminders::fire_time;
use crate::store::AlarmService;

/// Opaque handle returned by the platform alarm service.
pub type AlarmHandle = u64;

/// What the platform hands back when an alarm fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmPayload {
    pub event_id: EventId,
    pub reminder_index: usize,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub location: String,
}

/// Outcome of a single reminder after a scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderState {
    /// Configured but never registered (push disabled for the event).
    Configured,
    Scheduled,
    /// Fire time unresolvable or already past; never registered.
    Skipped,
}

/// A live platform registration. Derived state: recomputed from the event
/// and its settings on every (re)schedule, never persisted.
#[derive(Debug, Clone)]
pub struct ScheduledAlarm {
    pub event_id: EventId,
    pub reminder_index: usize,
    pub fire_at: DateTime<Utc>,
    pub handle: AlarmHandle,
}

/// What happened during one `schedule_event` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub scheduled: usize,
    pub skipped_past: usize,
    pub cancelled_stale: usize,
    /// Resulting state per reminder, in configuration order.
    pub states: Vec<ReminderState>,
}

/// Registers one-shot alarms for event reminders.
///
/// Every live registration is recorded per event id, so cancellation on
/// edit/delete is exact: rescheduling an event with N old reminders and M
/// new ones leaves exactly M live registrations, zero stale.
pub struct ReminderScheduler<A: AlarmService> {
    alarms: A,
    /// Zone the device's wall-clock timer fires in.
    system_tz: Tz,
    default_lead_minutes: i64,
    max_per_event: usize,
    registry: HashMap<EventId, Vec<ScheduledAlarm>>,
}

impl<A: AlarmService> ReminderScheduler<A> {
    pub fn new(alarms: A, system_tz: Tz) -> Self {
        Self {
            alarms,
            system_tz,
            default_lead_minutes: 15,
            max_per_event: 8,
            registry: HashMap::new(),
        }
    }

    /// Build a scheduler from persisted configuration.
    pub fn from_config(
        alarms: A,
        system_tz: Tz,
        config: &crate::config::RemindersConfig,
    ) -> Self {
        Self::new(alarms, system_tz)
            .with_default_lead(config.default_lead_minutes)
            .with_max_per_event(config.max_per_event)
    }

    /// Lead time of the synthesized reminder for events with none configured.
    pub fn with_default_lead(mut self, minutes: i64) -> Self {
        self.default_lead_minutes = minutes;
        self
    }

    /// Cap on registrations per event.
    pub fn with_max_per_event(mut self, max: usize) -> Self {
        self.max_per_event = max;
        self
    }

    /// Cancel any prior registrations for this event, then register one
    /// alarm per configured reminder whose fire time is still ahead of
    /// `now`. Cancellation completes before any new registration so an old
    /// alarm can never outlive its replacement schedule.
    pub fn schedule_event(&mut self, event: &Event, now: DateTime<Utc>) -> ScheduleOutcome {
        let mut outcome = ScheduleOutcome {
            cancelled_stale: self.cancel_event(&event.id),
            ..Default::default()
        };

        if !event.notification_settings.push_enabled {
            tracing::debug!(event_id = %event.id, "push disabled, skipping reminder scheduling");
            outcome.states = vec![
                ReminderState::Configured;
                event.notification_settings.reminders.len()
            ];
            return outcome;
        }

        let default_reminder = [Reminder::new(self.default_lead_minutes, ReminderUnit::Minutes)];
        let reminders: &[Reminder] = if event.notification_settings.reminders.is_empty() {
            &default_reminder
        } else {
            &event.notification_settings.reminders
        };

        for (reminder_index, reminder) in reminders.iter().take(self.max_per_event).enumerate() {
            let Some(fire_at) = fire_time(event, reminder, self.system_tz) else {
                tracing::warn!(
                    event_id = %event.id,
                    reminder_index,
                    "unresolvable reminder fire time, skipping"
                );
                outcome.states.push(ReminderState::Skipped);
                continue;
            };
            if fire_at <= now {
                tracing::debug!(
                    event_id = %event.id,
                    reminder_index,
                    %fire_at,
                    "reminder fire time already past, skipping"
                );
                outcome.skipped_past += 1;
                outcome.states.push(ReminderState::Skipped);
                continue;
            }

            let handle = self.alarms.schedule(
                fire_at,
                AlarmPayload {
                    event_id: event.id.clone(),
                    reminder_index,
                    title: event.title.clone(),
                    body: event.description.clone(),
                    location: event.location.clone(),
                },
            );
            self.registry
                .entry(event.id.clone())
                .or_default()
                .push(ScheduledAlarm {
                    event_id: event.id.clone(),
                    reminder_index,
                    fire_at,
                    handle,
                });
            outcome.scheduled += 1;
            outcome.states.push(ReminderState::Scheduled);
        }

        if reminders.len() > self.max_per_event {
            tracing::warn!(
                event_id = %event.id,
                configured = reminders.len(),
                cap = self.max_per_event,
                "reminder count exceeds per-event cap, extra reminders not scheduled"
            );
        }

        outcome
    }

    /// Cancel every live registration for `event_id`. Returns how many
    /// were cancelled.
    pub fn cancel_event(&mut self, event_id: &str) -> usize {
        let Some(alarms) = self.registry.remove(event_id) else {
            return 0;
        };
        let count = alarms.len();
        for alarm in alarms {
            self.alarms.cancel(alarm.handle);
        }
        count
    }

    /// Number of live registrations for an event.
    pub fn live_registrations(&self, event_id: &str) -> usize {
        self.registry.get(event_id).map_or(0, Vec::len)
    }

    /// Next pending fire instant for an event, if any.
    pub fn next_fire(&self, event_id: &str) -> Option<DateTime<Utc>> {
        self.registry
            .get(event_id)?
            .iter()
            .map(|a| a.fire_at)
            .min()
    }
}
