//! Calendar events and their notification settings.
//!
//! An [`Event`] carries its start/end instants in UTC plus the IANA zone id
//! it was created in. Date placement and reminder math always resolve the
//! zone explicitly; an empty or unparseable zone id falls back to whatever
//! zone the caller supplies (typically the viewer's).

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Unique identifier for an event.
pub type EventId = String;

/// Unique identifier for a user.
pub type UserId = String;

/// Unit of a reminder offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl ReminderUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
        }
    }

    /// Minutes per one unit.
    pub fn minutes(&self) -> i64 {
        match self {
            Self::Minutes => 1,
            Self::Hours => 60,
            Self::Days => 60 * 24,
            Self::Weeks => 60 * 24 * 7,
        }
    }
}

/// "This many units before event start."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub magnitude: i64,
    pub unit: ReminderUnit,
}

impl Reminder {
    pub fn new(magnitude: i64, unit: ReminderUnit) -> Self {
        Self { magnitude, unit }
    }

    /// The offset before event start. Negative magnitudes clamp to zero
    /// ("at start") rather than pushing the fire time past the event;
    /// absurdly large ones saturate instead of overflowing.
    pub fn offset(&self) -> Duration {
        let minutes = self.magnitude.max(0).saturating_mul(self.unit.minutes());
        Duration::try_minutes(minutes).unwrap_or(Duration::MAX)
    }
}

/// Per-event notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub push_enabled: bool,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            push_enabled: true,
            reminders: Vec::new(),
        }
    }
}

/// A calendar event on the shared timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start_time: DateTime<Utc>,
    /// Defaults to one hour after start when absent.
    pub end_time: Option<DateTime<Utc>>,
    /// The user whose calendar this event lives on.
    pub owner_id: UserId,
    /// The user who created it (owner, or the partner scheduling on
    /// the owner's behalf).
    pub created_by: UserId,
    /// IANA zone id the event was created in. Empty means "unknown".
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub recurring: bool,
    /// Placeholder; recurrence expansion is not implemented.
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
    /// Created by one user but placed on the partner's track.
    #[serde(default)]
    pub for_partner: bool,
}

impl Event {
    /// Create a new event owned and created by `owner_id`.
    ///
    /// # Errors
    /// Returns an error if `end_time` precedes `start_time`.
    pub fn try_new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        owner_id: impl Into<UserId>,
    ) -> Result<Self, ValidationError> {
        if let Some(end) = end_time {
            if end < start_time {
                return Err(ValidationError::InvalidTimeRange {
                    start: start_time,
                    end,
                });
            }
        }
        let owner_id = owner_id.into();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            location: String::new(),
            start_time,
            end_time,
            owner_id: owner_id.clone(),
            created_by: owner_id,
            timezone: String::new(),
            recurring: false,
            recurrence_rule: None,
            completed: false,
            notification_settings: NotificationSettings::default(),
            for_partner: false,
        })
    }

    /// End instant, defaulting to start + 1h.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_time.unwrap_or(self.start_time + Duration::hours(1))
    }

    /// Parse the stored zone id, if present and valid.
    pub fn source_tz(&self) -> Option<Tz> {
        if self.timezone.is_empty() {
            return None;
        }
        self.timezone.parse().ok()
    }

    /// Source zone with a fallback for missing/invalid zone ids.
    pub fn tz_or(&self, fallback: Tz) -> Tz {
        self.source_tz().unwrap_or(fallback)
    }

    /// Whether `user_id` may edit or delete this event (owner or creator).
    pub fn can_modify(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.created_by == user_id
    }

    /// Set the source zone id.
    pub fn with_timezone(mut self, zone: impl Into<String>) -> Self {
        self.timezone = zone.into();
        self
    }

    /// Set the creator (partner-scheduled events).
    pub fn with_creator(mut self, user_id: impl Into<UserId>) -> Self {
        self.created_by = user_id.into();
        self
    }

    /// Cross-post to the partner's track.
    pub fn with_for_partner(mut self, for_partner: bool) -> Self {
        self.for_partner = for_partner;
        self
    }

    /// Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Replace notification settings.
    pub fn with_notification_settings(mut self, settings: NotificationSettings) -> Self {
        self.notification_settings = settings;
        self
    }
}
