// Authorization scoping: non-privileged callers see their own records plus
// the public subset, writes are owner-only, admins are unscoped. The scope
// is pushed into the store query, so out-of-scope rows surface as NotFound.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::test_data::{
    admin, adventure_request, adventure_service, event_services, guide, member, post_request,
    post_service,
};
use uuid::Uuid;

use chrono::{Duration, Utc};
use trailhub::core::error::AppError;
use trailhub::core::pagination::PageRequest;
use trailhub::core::query::FilterCriteria;
use trailhub::modules::adventures::models::UpdateAdventureRequest;
use trailhub::modules::adventures::AdventureStatus;
use trailhub::modules::events::models::CreateEventRequest;
use trailhub::modules::posts::models::UpdatePostRequest;
use trailhub::modules::posts::PostStatus;

#[tokio::test]
async fn test_read_scope_is_own_or_public() {
    let service = post_service();
    let alice = guide();
    let bob = member();

    service
        .compose(&alice, post_request("Alice draft", PostStatus::Draft))
        .await
        .unwrap();
    let alice_pub = service
        .compose(&alice, post_request("Alice published", PostStatus::Published))
        .await
        .unwrap();
    service
        .compose(&bob, post_request("Bob draft", PostStatus::Draft))
        .await
        .unwrap();

    let criteria = FilterCriteria::new();

    // Alice: her own two posts; Bob's draft is invisible
    let as_alice = service
        .list(&alice, &criteria, None, PageRequest::default(), false)
        .await
        .unwrap();
    assert_eq!(as_alice.total, 2);

    // Bob: his own draft plus Alice's published post
    let as_bob = service
        .list(&bob, &criteria, None, PageRequest::default(), false)
        .await
        .unwrap();
    assert_eq!(as_bob.total, 2);
    assert!(as_bob
        .data
        .iter()
        .any(|post| post.id == alice_pub.id));

    // Admin: everything
    let as_admin = service
        .list(&admin(), &criteria, None, PageRequest::default(), false)
        .await
        .unwrap();
    assert_eq!(as_admin.total, 3);
}

#[tokio::test]
async fn test_get_applies_scope_before_the_store_call() {
    let service = post_service();
    let alice = guide();
    let bob = member();

    let draft = service
        .compose(&alice, post_request("Alice draft", PostStatus::Draft))
        .await
        .unwrap();

    // Out-of-scope reads are indistinguishable from missing rows
    let err = service.get(&bob, draft.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(service.get(&alice, draft.id).await.is_ok());
    assert!(service.get(&admin(), draft.id).await.is_ok());
}

#[tokio::test]
async fn test_write_scope_is_owner_only() {
    let service = post_service();
    let alice = guide();
    let bob = member();

    // Published, so Bob can read it
    let post = service
        .compose(&alice, post_request("Alice published", PostStatus::Published))
        .await
        .unwrap();
    assert!(service.get(&bob, post.id).await.is_ok());

    // But public visibility never grants mutation
    let err = service
        .update(
            &bob,
            post.id,
            UpdatePostRequest {
                title: Some("Hijacked".to_string()),
                ..UpdatePostRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service.remove(&bob, post.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Admins bypass the write scope
    assert!(service.remove(&admin(), post.id).await.is_ok());
}

#[tokio::test]
async fn test_draft_adventures_hidden_until_published() {
    let service = adventure_service();
    let host = guide();
    let reader = member();

    let adventure = service
        .create(&host, adventure_request("Ridge traverse"))
        .await
        .unwrap();
    assert_eq!(adventure.status, AdventureStatus::Draft);

    let criteria = FilterCriteria::new();
    let before = service
        .list(&reader, &criteria, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(before.total, 0);

    service
        .update(
            &host,
            adventure.id,
            UpdateAdventureRequest {
                status: Some(AdventureStatus::Published),
                ..UpdateAdventureRequest::default()
            },
        )
        .await
        .unwrap();

    let after = service
        .list(&reader, &criteria, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(after.total, 1);
}

#[tokio::test]
async fn test_hosting_requires_guide_role() {
    let service = adventure_service();

    let err = service
        .create(&member(), adventure_request("Ridge traverse"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_scheduling_checks_adventure_and_host() {
    let (events, adventures) = event_services();
    let host = guide();
    let stranger = guide();

    let adventure = adventures
        .create(&host, adventure_request("Ridge traverse"))
        .await
        .unwrap();

    let request = |adventure_id| CreateEventRequest {
        adventure_id,
        title: "Dawn departure".to_string(),
        starts_at: Utc::now() + Duration::days(30),
        capacity: 8,
    };

    // Unknown adventure
    let err = events
        .schedule(&host, request(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Not the host
    let err = events
        .schedule(&stranger, request(adventure.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // The host schedules; the event is public while scheduled
    let event = events.schedule(&host, request(adventure.id)).await.unwrap();
    assert_eq!(event.organizer_id, host.id);
    assert!(events.get(&member(), event.id).await.is_ok());
}
