//! Local notification rendering for fired reminders.

use serde::{Deserialize, Serialize};

use crate::event::EventId;
use crate::reminders::AlarmPayload;
use crate::store::NotificationPresenter;

/// What gets handed to the platform notification tray.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    /// Tapping the notification navigates here.
    pub event_id: Option<EventId>,
}

/// Turns fired alarms into tray notifications.
pub struct ReminderDispatcher<P: NotificationPresenter> {
    presenter: P,
}

impl<P: NotificationPresenter> ReminderDispatcher<P> {
    pub fn new(presenter: P) -> Self {
        Self { presenter }
    }

    /// Render and show the notification for a fired alarm.
    pub fn handle_fire(&self, payload: &AlarmPayload) {
        let mut body = payload.body.clone();
        if !payload.location.is_empty() {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(&payload.location);
        }

        tracing::debug!(
            event_id = %payload.event_id,
            reminder_index = payload.reminder_index,
            "delivering reminder notification"
        );
        self.presenter.show(&LocalNotification {
            title: payload.title.clone(),
            body,
            event_id: Some(payload.event_id.clone()),
        });
    }
}
