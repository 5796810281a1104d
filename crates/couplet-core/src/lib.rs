//! # Couplet Core Library
//!
//! This library provides the core logic for the Couplet couples app:
//! timezone-aware placement of events on a dual-user timeline, reminder
//! scheduling against the platform alarm service, and notification
//! dispatch (local reminder fires and ad-hoc partner nudges). Any GUI is
//! a thin layer over this crate; backing stores and platform services
//! are injected through the traits in [`store`].
//!
//! ## Architecture
//!
//! - **Timeline**: A pure date-matching predicate plus partitioning of a
//!   combined event set into user/partner tracks
//! - **Reminders**: Fire-time computation anchored to the event's source
//!   zone, and a scheduler keeping exactly one live alarm per
//!   (event, reminder) pair
//! - **Notify**: Local notification rendering for fired alarms, and nudge
//!   delivery through the server-side callable endpoint
//! - **Storage**: SQLite-backed write-through cache of partner links and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`EventService`]: Event CRUD with authorization and reminder lifecycle
//! - [`ReminderScheduler`]: Cancel-before-reschedule alarm registration
//! - [`NudgeService`]: Partner resolution and push delivery
//! - [`Session`]: Explicit current-user context threaded through all calls

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod health;
pub mod notify;
pub mod reminders;
pub mod service;
pub mod session;
pub mod store;
pub mod timeline;

pub use cache::PartnerCache;
pub use config::Config;
pub use error::{CacheError, CoreError, PushError, Result, StoreError, ValidationError};
pub use event::{Event, EventId, NotificationSettings, Reminder, ReminderUnit, UserId};
pub use health::{HealthMetric, HealthSample, Meal, WaterIntake};
pub use notify::{
    CallablePushClient, LocalNotification, Nudge, NudgeData, NudgeService, NudgeTarget,
    ReminderDispatcher,
};
pub use reminders::{
    fire_time, AlarmHandle, AlarmPayload, ReminderScheduler, ReminderState, ScheduleOutcome,
    ScheduledAlarm,
};
pub use service::EventService;
pub use session::{PartnerLink, Session};
pub use store::{
    AlarmService, EventStore, HealthStore, NotificationPresenter, ProfileStore, PushDelivery,
};
pub use timeline::{occurs_on, split_tracks, TimelineTracks};
