//! Injected collaborator interfaces.
//!
//! The core never talks to Firebase, the OS alarm manager, or the platform
//! notification tray directly; it goes through these traits. Store and
//! push calls suspend (the platform SDKs are async); alarm registration
//! and local presentation are synchronous platform calls.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{PushError, StoreError};
use crate::event::{Event, UserId};
use crate::health::{HealthSample, Meal, WaterIntake};
use crate::notify::{LocalNotification, NudgeData};
use crate::reminders::{AlarmHandle, AlarmPayload};
use crate::session::PartnerLink;

/// CRUD over events, queryable by owner and time-range overlap.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: Event) -> Result<(), StoreError>;

    async fn update(&self, event: Event) -> Result<(), StoreError>;

    /// Returns whether the event existed.
    async fn remove(&self, event_id: &str) -> Result<bool, StoreError>;

    async fn get(&self, event_id: &str) -> Result<Option<Event>, StoreError>;

    /// Events owned by `owner_id` overlapping `[from, to)`: starting
    /// before `to` with an effective end at or after `from`. Matching on
    /// overlap rather than start instant keeps a multi-day event visible
    /// for every day of its span. Ordered ascending by start time.
    async fn events_for_owner(
        &self,
        owner_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>, StoreError>;
}

/// Lookup of partner relationship, display name, and push token.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn partner_link(&self, user_id: &str) -> Result<Option<PartnerLink>, StoreError>;

    async fn display_name(&self, user_id: &str) -> Result<Option<String>, StoreError>;

    async fn push_token(&self, user_id: &str) -> Result<Option<String>, StoreError>;
}

/// Append-only log of health records.
#[async_trait]
pub trait HealthStore: Send + Sync {
    async fn add_water(&self, record: WaterIntake) -> Result<(), StoreError>;

    async fn add_meal(&self, record: Meal) -> Result<(), StoreError>;

    async fn add_sample(&self, sample: HealthSample) -> Result<(), StoreError>;

    async fn samples_for_user(&self, user_id: &UserId) -> Result<Vec<HealthSample>, StoreError>;
}

/// Push message delivery to a device token.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    /// Deliver a push message; returns the backend's message id.
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: &NudgeData,
    ) -> Result<String, PushError>;
}

/// Platform one-shot timer. Registration is synchronous but performs
/// several platform lookups, so callers keep it off time-critical paths.
pub trait AlarmService: Send + Sync {
    fn schedule(&self, fire_at: DateTime<Utc>, payload: AlarmPayload) -> AlarmHandle;

    fn cancel(&self, handle: AlarmHandle);
}

/// Platform notification tray.
pub trait NotificationPresenter: Send + Sync {
    fn show(&self, notification: &LocalNotification);
}
