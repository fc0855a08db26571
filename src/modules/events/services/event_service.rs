use std::sync::Arc;

use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::{AppError, Result};
use crate::core::pagination::{PageRequest, PaginationResult};
use crate::core::query::{FilterCriteria, SortSpec};
use crate::modules::adventures::models::Adventure;
use crate::modules::events::models::{
    CreateEventRequest, Event, EventPatch, UpdateEventRequest, EVENT_POLICY,
};
use crate::repository::Repository;
use crate::service::EntityService;
use crate::store::DataStore;

/// Departure scheduling logic over the generic entity service.
///
/// Holds a second repository so scheduling can verify the target adventure
/// before any event row is written.
pub struct EventService {
    entity: EntityService<Event>,
    adventures: Repository<Adventure>,
}

impl EventService {
    pub fn new(
        store: Arc<dyn DataStore<Event>>,
        adventure_store: Arc<dyn DataStore<Adventure>>,
    ) -> Self {
        Self {
            entity: EntityService::new(store, &EVENT_POLICY),
            adventures: Repository::new(adventure_store),
        }
    }

    /// Schedule a departure for an adventure.
    ///
    /// The adventure must exist and the caller must be its host (admins may
    /// schedule for anyone).
    pub async fn schedule(&self, caller: &AuthContext, request: CreateEventRequest) -> Result<Event> {
        let adventure = self
            .adventures
            .find_by_id(request.adventure_id, None, false)
            .await
            .map_err(|err| match err {
                AppError::NotFound(_) => AppError::not_found("adventure not found"),
                other => other,
            })?;

        if !caller.role.is_privileged() && adventure.host_id != caller.id {
            return Err(AppError::unauthorized(
                "only the adventure host may schedule events",
            ));
        }

        let event = Event::new(
            adventure.id,
            adventure.host_id,
            request.title.trim().to_string(),
            request.starts_at,
            request.capacity,
        )?;

        self.entity.create(event).await
    }

    pub async fn list(
        &self,
        caller: &AuthContext,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        page: PageRequest,
    ) -> Result<PaginationResult<Event>> {
        self.entity.list(caller, criteria, sort, page, false).await
    }

    pub async fn get(&self, caller: &AuthContext, id: Uuid) -> Result<Event> {
        self.entity.get(caller, id).await
    }

    pub async fn update(
        &self,
        caller: &AuthContext,
        id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        if let Some(capacity) = request.capacity {
            if capacity < 1 {
                return Err(AppError::validation("Capacity must be at least 1"));
            }
        }

        let patch = EventPatch {
            title: request.title.map(|title| title.trim().to_string()),
            starts_at: request.starts_at,
            capacity: request.capacity,
            status: request.status,
        };

        self.entity.update(caller, id, &patch).await
    }

    pub async fn remove(&self, caller: &AuthContext, id: Uuid) -> Result<()> {
        self.entity.remove(caller, id).await
    }
}
