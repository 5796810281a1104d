//! In-memory collaborator implementations.
//!
//! Used for wiring in tests and anywhere a real backend is unavailable.
//! All of them share state through `Arc`, so clones observe each other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{PushError, StoreError};
use crate::event::{Event, UserId};
use crate::health::{HealthSample, Meal, WaterIntake};
use crate::notify::{LocalNotification, NudgeData};
use crate::reminders::{AlarmHandle, AlarmPayload};
use crate::session::PartnerLink;
use crate::store::{
    AlarmService, EventStore, HealthStore, NotificationPresenter, ProfileStore, PushDelivery,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`EventStore`].
#[derive(Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<Mutex<HashMap<String, Event>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.events).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn insert(&self, event: Event) -> Result<(), StoreError> {
        lock(&self.events).insert(event.id.clone(), event);
        Ok(())
    }

    async fn update(&self, event: Event) -> Result<(), StoreError> {
        let mut events = lock(&self.events);
        if !events.contains_key(&event.id) {
            return Err(StoreError::RequestFailed(format!(
                "no such event: {}",
                event.id
            )));
        }
        events.insert(event.id.clone(), event);
        Ok(())
    }

    async fn remove(&self, event_id: &str) -> Result<bool, StoreError> {
        Ok(lock(&self.events).remove(event_id).is_some())
    }

    async fn get(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        Ok(lock(&self.events).get(event_id).cloned())
    }

    async fn events_for_owner(
        &self,
        owner_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>, StoreError> {
        let mut matched: Vec<Event> = lock(&self.events)
            .values()
            .filter(|e| e.owner_id == owner_id && e.start_time < to && e.effective_end() >= from)
            .cloned()
            .collect();
        matched.sort_by_key(|e| e.start_time);
        Ok(matched)
    }
}

/// One user's profile record.
#[derive(Debug, Clone, Default)]
pub struct ProfileRecord {
    pub display_name: String,
    pub partner_link: Option<PartnerLink>,
    pub push_token: Option<String>,
}

/// In-memory [`ProfileStore`].
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<Mutex<HashMap<UserId, ProfileRecord>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, user_id: impl Into<UserId>, record: ProfileRecord) -> Self {
        lock(&self.profiles).insert(user_id.into(), record);
        self
    }

    pub fn set_push_token(&self, user_id: &str, token: Option<String>) {
        if let Some(record) = lock(&self.profiles).get_mut(user_id) {
            record.push_token = token;
        }
    }

    /// Remove the partner relationship on both sides.
    pub fn unlink(&self, user_id: &str) {
        let mut profiles = lock(&self.profiles);
        let partner = profiles
            .get_mut(user_id)
            .and_then(|r| r.partner_link.take())
            .map(|l| l.partner_id);
        if let Some(partner_id) = partner {
            if let Some(record) = profiles.get_mut(&partner_id) {
                record.partner_link = None;
            }
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn partner_link(&self, user_id: &str) -> Result<Option<PartnerLink>, StoreError> {
        Ok(lock(&self.profiles)
            .get(user_id)
            .and_then(|r| r.partner_link.clone()))
    }

    async fn display_name(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.profiles)
            .get(user_id)
            .map(|r| r.display_name.clone()))
    }

    async fn push_token(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.profiles)
            .get(user_id)
            .and_then(|r| r.push_token.clone()))
    }
}

/// In-memory [`HealthStore`].
#[derive(Clone, Default)]
pub struct MemoryHealthStore {
    water: Arc<Mutex<Vec<WaterIntake>>>,
    meals: Arc<Mutex<Vec<Meal>>>,
    samples: Arc<Mutex<Vec<HealthSample>>>,
}

impl MemoryHealthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn water_count(&self) -> usize {
        lock(&self.water).len()
    }

    pub fn meal_count(&self) -> usize {
        lock(&self.meals).len()
    }
}

#[async_trait]
impl HealthStore for MemoryHealthStore {
    async fn add_water(&self, record: WaterIntake) -> Result<(), StoreError> {
        lock(&self.water).push(record);
        Ok(())
    }

    async fn add_meal(&self, record: Meal) -> Result<(), StoreError> {
        lock(&self.meals).push(record);
        Ok(())
    }

    async fn add_sample(&self, sample: HealthSample) -> Result<(), StoreError> {
        lock(&self.samples).push(sample);
        Ok(())
    }

    async fn samples_for_user(&self, user_id: &UserId) -> Result<Vec<HealthSample>, StoreError> {
        Ok(lock(&self.samples)
            .iter()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// In-memory [`AlarmService`] recording live registrations.
#[derive(Clone, Default)]
pub struct MemoryAlarmService {
    next_handle: Arc<AtomicU64>,
    alarms: Arc<Mutex<HashMap<AlarmHandle, (DateTime<Utc>, AlarmPayload)>>>,
}

impl MemoryAlarmService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently registered (not cancelled) alarms.
    pub fn live(&self) -> usize {
        lock(&self.alarms).len()
    }

    /// The payload registered under `handle`, if still live.
    pub fn payload(&self, handle: AlarmHandle) -> Option<AlarmPayload> {
        lock(&self.alarms).get(&handle).map(|(_, p)| p.clone())
    }

    /// Simulate the platform firing the alarm: removes the registration
    /// and returns its payload.
    pub fn fire(&self, handle: AlarmHandle) -> Option<AlarmPayload> {
        lock(&self.alarms).remove(&handle).map(|(_, p)| p)
    }

    /// All live registrations ordered by fire time.
    pub fn pending(&self) -> Vec<(AlarmHandle, DateTime<Utc>, AlarmPayload)> {
        let mut all: Vec<_> = lock(&self.alarms)
            .iter()
            .map(|(h, (at, p))| (*h, *at, p.clone()))
            .collect();
        all.sort_by_key(|(_, at, _)| *at);
        all
    }
}

impl AlarmService for MemoryAlarmService {
    fn schedule(&self, fire_at: DateTime<Utc>, payload: AlarmPayload) -> AlarmHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
        lock(&self.alarms).insert(handle, (fire_at, payload));
        handle
    }

    fn cancel(&self, handle: AlarmHandle) {
        lock(&self.alarms).remove(&handle);
    }
}

/// In-memory [`NotificationPresenter`] collecting shown notifications.
#[derive(Clone, Default)]
pub struct MemoryPresenter {
    shown: Arc<Mutex<Vec<LocalNotification>>>,
}

impl MemoryPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<LocalNotification> {
        lock(&self.shown).clone()
    }
}

impl NotificationPresenter for MemoryPresenter {
    fn show(&self, notification: &LocalNotification) {
        lock(&self.shown).push(notification.clone());
    }
}

/// In-memory [`PushDelivery`] collecting sent messages.
#[derive(Clone, Default)]
pub struct MemoryPushDelivery {
    sent: Arc<Mutex<Vec<SentPush>>>,
}

/// One message captured by [`MemoryPushDelivery`].
#[derive(Debug, Clone)]
pub struct SentPush {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: NudgeData,
}

impl MemoryPushDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentPush> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl PushDelivery for MemoryPushDelivery {
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: &NudgeData,
    ) -> Result<String, PushError> {
        let mut sent = lock(&self.sent);
        sent.push(SentPush {
            token: token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data: data.clone(),
        });
        Ok(format!("mem-{}", sent.len()))
    }
}
