use std::sync::Arc;

use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::{AppError, Result};
use crate::core::pagination::{PageRequest, PaginationResult};
use crate::core::query::{FilterCriteria, SortSpec};
use crate::modules::posts::models::{
    CreatePostRequest, Post, PostPatch, UpdatePostRequest, POST_POLICY,
};
use crate::service::EntityService;
use crate::store::DataStore;

/// Community post logic over the generic entity service.
pub struct PostService {
    entity: EntityService<Post>,
}

impl PostService {
    pub fn new(store: Arc<dyn DataStore<Post>>) -> Self {
        Self {
            entity: EntityService::new(store, &POST_POLICY),
        }
    }

    /// Compose a post authored by the caller.
    pub async fn compose(&self, caller: &AuthContext, request: CreatePostRequest) -> Result<Post> {
        let post = Post::new(
            caller.id,
            request.title.trim().to_string(),
            request.body.trim().to_string(),
            request.status,
        )?;
        self.entity.create(post).await
    }

    pub async fn list(
        &self,
        caller: &AuthContext,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        page: PageRequest,
        include_deleted: bool,
    ) -> Result<PaginationResult<Post>> {
        self.entity
            .list(caller, criteria, sort, page, include_deleted)
            .await
    }

    pub async fn get(&self, caller: &AuthContext, id: Uuid) -> Result<Post> {
        self.entity.get(caller, id).await
    }

    pub async fn update(
        &self,
        caller: &AuthContext,
        id: Uuid,
        request: UpdatePostRequest,
    ) -> Result<Post> {
        let title = match request.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(AppError::validation("Title cannot be empty"));
                }
                Some(title)
            }
            None => None,
        };

        let patch = PostPatch {
            title,
            body: request.body.map(|body| body.trim().to_string()),
            status: request.status,
        };

        self.entity.update(caller, id, &patch).await
    }

    pub async fn remove(&self, caller: &AuthContext, id: Uuid) -> Result<()> {
        self.entity.remove(caller, id).await
    }
}
