use std::sync::Arc;

use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::{AppError, Result};
use crate::core::pagination::{PageRequest, PaginationResult};
use crate::core::query::{FilterCriteria, SortSpec};
use crate::modules::adventures::models::{
    Adventure, AdventurePatch, CreateAdventureRequest, UpdateAdventureRequest, ADVENTURE_POLICY,
    JOIN_CODE_LENGTH,
};
use crate::service::EntityService;
use crate::store::DataStore;

/// Trip listing business logic over the generic entity service.
pub struct AdventureService {
    entity: EntityService<Adventure>,
}

impl AdventureService {
    pub fn new(store: Arc<dyn DataStore<Adventure>>) -> Self {
        Self {
            entity: EntityService::new(store, &ADVENTURE_POLICY),
        }
    }

    /// Create a draft listing hosted by the caller.
    ///
    /// Hosting requires the guide or admin role; the join code is generated
    /// here so every listing carries one from the start.
    pub async fn create(
        &self,
        caller: &AuthContext,
        request: CreateAdventureRequest,
    ) -> Result<Adventure> {
        if !caller.role.can_host() {
            return Err(AppError::unauthorized(
                "only guides may host adventures",
            ));
        }

        let join_code = self
            .entity
            .generate_unique_code("join_code", JOIN_CODE_LENGTH)
            .await?;

        let adventure = Adventure::new(
            caller.id,
            request.title.trim().to_string(),
            request.summary.map(|summary| summary.trim().to_string()),
            request.location.trim().to_string(),
            request.capacity,
            request.price_per_person,
            join_code,
        )?;

        self.entity.create(adventure).await
    }

    pub async fn list(
        &self,
        caller: &AuthContext,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        page: PageRequest,
    ) -> Result<PaginationResult<Adventure>> {
        self.entity.list(caller, criteria, sort, page, false).await
    }

    pub async fn get(&self, caller: &AuthContext, id: Uuid) -> Result<Adventure> {
        self.entity.get(caller, id).await
    }

    pub async fn update(
        &self,
        caller: &AuthContext,
        id: Uuid,
        request: UpdateAdventureRequest,
    ) -> Result<Adventure> {
        let patch = AdventurePatch {
            title: request.title.map(|title| title.trim().to_string()),
            summary: request.summary.map(|summary| summary.trim().to_string()),
            location: request.location.map(|location| location.trim().to_string()),
            capacity: request.capacity,
            price_per_person: request.price_per_person,
            status: request.status,
        };

        if let Some(title) = &patch.title {
            if title.is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
        }
        if let Some(capacity) = patch.capacity {
            if capacity < 1 {
                return Err(AppError::validation("Capacity must be at least 1"));
            }
        }

        self.entity.update(caller, id, &patch).await
    }

    pub async fn remove(&self, caller: &AuthContext, id: Uuid) -> Result<()> {
        self.entity.remove(caller, id).await
    }
}
