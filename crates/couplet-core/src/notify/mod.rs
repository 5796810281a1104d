//! Notification dispatch.
//!
//! Two independent paths:
//! - A fired platform alarm is rendered into a local notification
//!   ([`ReminderDispatcher`])
//! - An ad-hoc partner nudge is delivered through the push collaborator
//!   ([`NudgeService`]), with [`CallablePushClient`] as the concrete
//!   HTTP transport to the server-side callable endpoint

mod callable;
mod dispatch;
mod nudge;

pub use callable::CallablePushClient;
pub use dispatch::{LocalNotification, ReminderDispatcher};
pub use nudge::{Nudge, NudgeData, NudgeService, NudgeTarget};
