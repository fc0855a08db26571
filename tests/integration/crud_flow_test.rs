// End-to-end CRUD semantics over the in-memory store: create/read round
// trips, NotFound on missing ids, constraint violations with field context,
// and the soft-delete lifecycle.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::test_data::{admin, member, user_service};
use uuid::Uuid;

use trailhub::core::auth::{AuthContext, Role};
use trailhub::core::error::AppError;
use trailhub::core::pagination::PageRequest;
use trailhub::core::query::{FilterCriteria, Predicate};
use trailhub::modules::users::models::{CreateUserRequest, UpdateUserRequest};
use trailhub::modules::users::UserStatus;

fn registration(email: &str, display_name: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        display_name: display_name.to_string(),
    }
}

#[tokio::test]
async fn test_register_normalizes_and_round_trips() {
    let service = user_service();

    let created = service
        .register(registration("  Mika@Example.COM ", "  Mika  "))
        .await
        .unwrap();

    assert_eq!(created.email, "mika@example.com");
    assert_eq!(created.display_name, "Mika");
    assert_eq!(created.status, UserStatus::Active);
    assert_eq!(created.referral_code.len(), 8);

    // Reading back as the account itself returns the created record plus
    // nothing else changed
    let caller = AuthContext::new(created.id, Role::Member);
    let fetched = service.get(&caller, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_duplicate_email_is_constraint_violation() {
    let service = user_service();

    service
        .register(registration("mika@example.com", "Mika"))
        .await
        .unwrap();

    let err = service
        .register(registration("MIKA@example.com", "Imposter"))
        .await
        .unwrap_err();

    match err {
        AppError::ConstraintViolation(message) => assert!(message.contains("email")),
        other => panic!("expected constraint violation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() {
    let service = user_service();

    let err = service
        .update(
            &admin(),
            Uuid::new_v4(),
            UpdateUserRequest {
                display_name: Some("Ghost".to_string()),
                ..UpdateUserRequest::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_applies_patch_and_touches_timestamp() {
    let service = user_service();
    let created = service
        .register(registration("mika@example.com", "Mika"))
        .await
        .unwrap();

    let updated = service
        .update(
            &admin(),
            created.id,
            UpdateUserRequest {
                display_name: Some("Mika H".to_string()),
                status: Some(UserStatus::Suspended),
                ..UpdateUserRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, "Mika H");
    assert_eq!(updated.status, UserStatus::Suspended);
    assert_eq!(updated.email, created.email);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_to_conflicting_email_is_constraint_violation() {
    let service = user_service();
    service
        .register(registration("mika@example.com", "Mika"))
        .await
        .unwrap();
    let other = service
        .register(registration("jo@example.com", "Jo"))
        .await
        .unwrap();

    let err = service
        .update(
            &admin(),
            other.id,
            UpdateUserRequest {
                email: Some("Mika@Example.com".to_string()),
                ..UpdateUserRequest::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::ConstraintViolation(message) => assert!(message.contains("email")),
        other => panic!("expected constraint violation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_role_change_requires_admin() {
    let service = user_service();
    let created = service
        .register(registration("mika@example.com", "Mika"))
        .await
        .unwrap();
    let caller = AuthContext::new(created.id, Role::Member);

    let err = service
        .update(
            &caller,
            created.id,
            UpdateUserRequest {
                role: Some(Role::Admin),
                ..UpdateUserRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let updated = service
        .update(
            &admin(),
            created.id,
            UpdateUserRequest {
                role: Some(Role::Guide),
                ..UpdateUserRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Guide);
}

#[tokio::test]
async fn test_soft_delete_lifecycle() {
    let service = user_service();
    let created = service
        .register(registration("mika@example.com", "Mika"))
        .await
        .unwrap();
    let root = admin();

    service.remove(&root, created.id).await.unwrap();

    // Marked rows are invisible to reads by default
    let err = service.get(&root, created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // A second delete finds nothing to mark
    let err = service.remove(&root, created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Administrators can filter deleted rows back in
    let criteria =
        FilterCriteria::new().with("email", Predicate::Equals("mika@example.com".to_string()));
    let listed = service
        .list(&root, &criteria, None, PageRequest::default(), true)
        .await
        .unwrap();
    assert_eq!(listed.total, 1);
    assert!(listed.data[0].deleted_at.is_some());

    // Non-privileged callers may not
    let err = service
        .list(&member(), &criteria, None, PageRequest::default(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}
