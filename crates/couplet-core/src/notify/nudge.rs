//! Ad-hoc partner nudges.

use serde::{Deserialize, Serialize};

use crate::cache::PartnerCache;
use crate::error::{CoreError, Result};
use crate::event::{EventId, UserId};
use crate::session::Session;
use crate::store::{ProfileStore, PushDelivery};

/// Where tapping the nudge should land the partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum NudgeTarget {
    Timeline,
    Meals,
    Hydration,
    Event { event_id: EventId },
}

impl NudgeTarget {
    pub fn screen(&self) -> &'static str {
        match self {
            Self::Timeline => "timeline",
            Self::Meals => "meals",
            Self::Hydration => "hydration",
            Self::Event { .. } => "event",
        }
    }
}

/// An ad-hoc ping from one partner to the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nudge {
    pub title: String,
    pub body: String,
    pub target: NudgeTarget,
}

/// Structured payload attached to the push message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NudgeData {
    pub sender_id: UserId,
    pub sender_name: String,
    #[serde(flatten)]
    pub target: NudgeTarget,
}

/// Delivers nudges to the linked partner.
///
/// Partner resolution prefers the session, then the write-through
/// [`PartnerCache`], then the profile store (populating the cache on the
/// way back). Failures are typed: an unlinked user yields
/// [`CoreError::PartnerNotFound`]; a partner without a registered token
/// yields [`CoreError::NoNotificationToken`] and no delivery call is made.
pub struct NudgeService<P, D> {
    profiles: P,
    delivery: D,
    cache: PartnerCache,
}

impl<P: ProfileStore, D: PushDelivery> NudgeService<P, D> {
    pub fn new(profiles: P, delivery: D, cache: PartnerCache) -> Self {
        Self {
            profiles,
            delivery,
            cache,
        }
    }

    /// Send a nudge to the session user's partner. Returns the backend's
    /// message id. No automatic retry on failure.
    pub async fn send_nudge(&self, session: &Session, nudge: &Nudge) -> Result<String> {
        let partner_id = self.resolve_partner(session).await?;

        let token = self
            .profiles
            .push_token(&partner_id)
            .await?
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::NoNotificationToken(partner_id.clone()))?;

        let data = NudgeData {
            sender_id: session.user_id.clone(),
            sender_name: session.display_name.clone(),
            target: nudge.target.clone(),
        };
        let message_id = self
            .delivery
            .send(&token, &nudge.title, &nudge.body, &data)
            .await?;
        tracing::info!(
            sender = %session.user_id,
            recipient = %partner_id,
            %message_id,
            "nudge delivered"
        );
        Ok(message_id)
    }

    /// Drop the cached partner link for a user. Called on partner-unlink
    /// so a stale cached id can never misdirect later nudges.
    pub fn on_unlink(&self, user_id: &str) -> Result<()> {
        self.cache.invalidate(user_id)?;
        Ok(())
    }

    async fn resolve_partner(&self, session: &Session) -> Result<UserId> {
        if let Some(partner_id) = &session.partner_id {
            return Ok(partner_id.clone());
        }
        if let Some(link) = self.cache.get(&session.user_id)? {
            return Ok(link.partner_id);
        }
        let link = self
            .profiles
            .partner_link(&session.user_id)
            .await?
            .ok_or_else(|| CoreError::PartnerNotFound(session.user_id.clone()))?;
        self.cache.put(&session.user_id, &link)?;
        Ok(link.partner_id)
    }
}
