//! Nudge delivery flows: partner resolution, cache behavior, typed failures.

use chrono_tz::UTC;

use couplet_core::store::memory::{MemoryProfileStore, MemoryPushDelivery, ProfileRecord};
use couplet_core::{
    CoreError, Nudge, NudgeService, NudgeTarget, PartnerCache, PartnerLink, Session,
};

fn linked_profiles(token: Option<&str>) -> MemoryProfileStore {
    MemoryProfileStore::new()
        .with_profile(
            "alice",
            ProfileRecord {
                display_name: "Alice".into(),
                partner_link: Some(PartnerLink {
                    partner_id: "bob".into(),
                    couple_id: "alice-bob".into(),
                }),
                push_token: None,
            },
        )
        .with_profile(
            "bob",
            ProfileRecord {
                display_name: "Bob".into(),
                partner_link: Some(PartnerLink {
                    partner_id: "alice".into(),
                    couple_id: "alice-bob".into(),
                }),
                push_token: token.map(String::from),
            },
        )
}

fn nudge() -> Nudge {
    Nudge {
        title: "Drink up!".into(),
        body: "You're behind on water today".into(),
        target: NudgeTarget::Hydration,
    }
}

fn service(
    profiles: MemoryProfileStore,
    delivery: MemoryPushDelivery,
) -> NudgeService<MemoryProfileStore, MemoryPushDelivery> {
    NudgeService::new(profiles, delivery, PartnerCache::open_in_memory().unwrap())
}

#[tokio::test]
async fn nudge_reaches_partner_with_sender_data() {
    let delivery = MemoryPushDelivery::new();
    let service = service(linked_profiles(Some("bob-token")), delivery.clone());
    let session = Session::new("alice", UTC).with_display_name("Alice");

    let message_id = service.send_nudge(&session, &nudge()).await.unwrap();
    assert!(!message_id.is_empty());

    let sent = delivery.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, "bob-token");
    assert_eq!(sent[0].title, "Drink up!");
    assert_eq!(sent[0].data.sender_id, "alice");
    assert_eq!(sent[0].data.sender_name, "Alice");
    assert_eq!(sent[0].data.target, NudgeTarget::Hydration);
}

#[tokio::test]
async fn missing_token_is_typed_and_sends_nothing() {
    let delivery = MemoryPushDelivery::new();
    let service = service(linked_profiles(None), delivery.clone());
    let session = Session::new("alice", UTC);

    let err = service.send_nudge(&session, &nudge()).await.unwrap_err();
    assert!(matches!(err, CoreError::NoNotificationToken(ref id) if id == "bob"));
    assert!(delivery.sent().is_empty());
}

#[tokio::test]
async fn empty_token_counts_as_missing() {
    let delivery = MemoryPushDelivery::new();
    let service = service(linked_profiles(Some("")), delivery.clone());
    let session = Session::new("alice", UTC);

    let err = service.send_nudge(&session, &nudge()).await.unwrap_err();
    assert!(matches!(err, CoreError::NoNotificationToken(_)));
    assert!(delivery.sent().is_empty());
}

#[tokio::test]
async fn unlinked_user_gets_partner_not_found() {
    let profiles = MemoryProfileStore::new().with_profile(
        "alice",
        ProfileRecord {
            display_name: "Alice".into(),
            partner_link: None,
            push_token: None,
        },
    );
    let service = service(profiles, MemoryPushDelivery::new());
    let session = Session::new("alice", UTC);

    let err = service.send_nudge(&session, &nudge()).await.unwrap_err();
    assert!(matches!(err, CoreError::PartnerNotFound(_)));
}

#[tokio::test]
async fn partner_lookup_populates_cache_write_through() {
    let profiles = linked_profiles(Some("bob-token"));
    let cache = PartnerCache::open_in_memory().unwrap();
    let service = NudgeService::new(profiles.clone(), MemoryPushDelivery::new(), cache);
    // Session without a resolved partner forces a store lookup.
    let session = Session::new("alice", UTC);

    service.send_nudge(&session, &nudge()).await.unwrap();

    // Unlink in the backend; the cached link still answers until
    // invalidated, which is exactly why on_unlink must be called.
    profiles.unlink("alice");
    assert!(service.send_nudge(&session, &nudge()).await.is_ok());

    service.on_unlink("alice").unwrap();
    let err = service.send_nudge(&session, &nudge()).await.unwrap_err();
    assert!(matches!(err, CoreError::PartnerNotFound(_)));
}
