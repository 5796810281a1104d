//! Current-user session context.
//!
//! The session is passed explicitly through every call that needs to know
//! who is acting or which zone the timeline is viewed in. There is no
//! ambient "current user" anywhere in the crate.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::event::UserId;

/// The partner relationship for a user, as stored in the profile backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerLink {
    pub partner_id: UserId,
    pub couple_id: String,
}

/// Who is acting, and in which timezone they are viewing the timeline.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub display_name: String,
    pub partner_id: Option<UserId>,
    pub couple_id: Option<String>,
    /// Zone all user-track date placement happens in.
    pub timezone: Tz,
}

impl Session {
    pub fn new(user_id: impl Into<UserId>, timezone: Tz) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: String::new(),
            partner_id: None,
            couple_id: None,
            timezone,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_partner(mut self, link: PartnerLink) -> Self {
        self.partner_id = Some(link.partner_id);
        self.couple_id = Some(link.couple_id);
        self
    }

    /// Whether the given user is the linked partner.
    pub fn is_partner(&self, user_id: &str) -> bool {
        self.partner_id.as_deref() == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_linking() {
        let session = Session::new("alice", chrono_tz::UTC).with_partner(PartnerLink {
            partner_id: "bob".into(),
            couple_id: "alice-bob".into(),
        });
        assert!(session.is_partner("bob"));
        assert!(!session.is_partner("carol"));
        assert_eq!(session.couple_id.as_deref(), Some("alice-bob"));
    }

    #[test]
    fn unlinked_session_has_no_partner() {
        let session = Session::new("alice", chrono_tz::UTC);
        assert!(!session.is_partner("bob"));
    }
}
