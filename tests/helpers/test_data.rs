use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use trailhub::core::auth::{AuthContext, Role};
use trailhub::core::error::Result;
use trailhub::modules::adventures::models::CreateAdventureRequest;
use trailhub::modules::adventures::{Adventure, AdventureService};
use trailhub::modules::events::{Event, EventService};
use trailhub::modules::posts::models::CreatePostRequest;
use trailhub::modules::posts::{Post, PostService, PostStatus};
use trailhub::modules::users::{User, UserService};
use trailhub::store::MemoryStore;

pub fn member() -> AuthContext {
    AuthContext::new(Uuid::new_v4(), Role::Member)
}

pub fn guide() -> AuthContext {
    AuthContext::new(Uuid::new_v4(), Role::Guide)
}

pub fn admin() -> AuthContext {
    AuthContext::new(Uuid::new_v4(), Role::Admin)
}

pub fn user_service() -> UserService {
    UserService::new(Arc::new(MemoryStore::<User>::new()))
}

pub fn post_service() -> PostService {
    PostService::new(Arc::new(MemoryStore::<Post>::new()))
}

pub fn adventure_service() -> AdventureService {
    AdventureService::new(Arc::new(MemoryStore::<Adventure>::new()))
}

/// Event service plus an adventure service sharing the same adventure store,
/// so scheduled events can reference listings created in the test.
pub fn event_services() -> (EventService, AdventureService) {
    let adventure_store = Arc::new(MemoryStore::<Adventure>::new());
    let event_store = Arc::new(MemoryStore::<Event>::new());
    (
        EventService::new(event_store, adventure_store.clone()),
        AdventureService::new(adventure_store),
    )
}

pub fn adventure_request(title: &str) -> CreateAdventureRequest {
    CreateAdventureRequest {
        title: title.to_string(),
        summary: None,
        location: "Lofoten".to_string(),
        capacity: 8,
        price_per_person: dec!(420.00),
    }
}

pub fn post_request(title: &str, status: PostStatus) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        body: "We made it over the ridge before the weather turned.".to_string(),
        status,
    }
}

/// Seed `count` published posts authored by `author`.
pub async fn seed_posts(service: &PostService, author: &AuthContext, count: usize) -> Result<()> {
    for index in 1..=count {
        service
            .compose(
                author,
                post_request(&format!("Trip report {:02}", index), PostStatus::Published),
            )
            .await?;
    }
    Ok(())
}
