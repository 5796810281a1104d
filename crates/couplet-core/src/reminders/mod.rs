//! Reminder fire-time computation and alarm scheduling.
//!
//! This module provides:
//! - Conversion of a configured reminder offset into an absolute fire
//!   instant, anchored to the event's source zone
//! - A scheduler that keeps exactly one live alarm registration per
//!   (event, reminder) pair, cancelling stale registrations before
//!   creating new ones

mod fire_time;
mod scheduler;

pub use fire_time::fire_time;
pub use scheduler::{
    AlarmHandle, AlarmPayload, ReminderScheduler, ReminderState, ScheduleOutcome, ScheduledAlarm,
};
