use std::sync::Arc;

use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::{AppError, Result};
use crate::core::pagination::{PageRequest, PaginationResult};
use crate::core::query::{FilterCriteria, SortSpec};
use crate::modules::users::models::{
    CreateUserRequest, UpdateUserRequest, User, UserPatch, REFERRAL_CODE_LENGTH, USER_POLICY,
};
use crate::service::EntityService;
use crate::store::DataStore;

/// Account business logic over the generic entity service.
pub struct UserService {
    entity: EntityService<User>,
}

impl UserService {
    pub fn new(store: Arc<dyn DataStore<User>>) -> Self {
        Self {
            entity: EntityService::new(store, &USER_POLICY),
        }
    }

    /// Register a new member account.
    ///
    /// Normalizes the email, generates the referral code, and surfaces a
    /// `ConstraintViolation` naming the colliding column when the email is
    /// already taken.
    pub async fn register(&self, request: CreateUserRequest) -> Result<User> {
        let email = request.email.trim().to_lowercase();
        let display_name = request.display_name.trim().to_string();

        let referral_code = self
            .entity
            .generate_unique_code("referral_code", REFERRAL_CODE_LENGTH)
            .await?;

        let user = User::new(email, display_name, referral_code)?;
        self.entity.create(user).await
    }

    pub async fn list(
        &self,
        caller: &AuthContext,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        page: PageRequest,
        include_deleted: bool,
    ) -> Result<PaginationResult<User>> {
        self.entity
            .list(caller, criteria, sort, page, include_deleted)
            .await
    }

    pub async fn get(&self, caller: &AuthContext, id: Uuid) -> Result<User> {
        self.entity.get(caller, id).await
    }

    /// Apply an account update. Role changes are restricted to
    /// administrators; everything else follows the generic write scope.
    pub async fn update(
        &self,
        caller: &AuthContext,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User> {
        if request.role.is_some() && !caller.role.is_privileged() {
            return Err(AppError::unauthorized(
                "only administrators may change roles",
            ));
        }

        let email = match request.email {
            Some(raw) => {
                let email = raw.trim().to_lowercase();
                if email.is_empty() || !email.contains('@') {
                    return Err(AppError::validation("Email address is not valid"));
                }
                Some(email)
            }
            None => None,
        };

        let display_name = match request.display_name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(AppError::validation("Display name cannot be empty"));
                }
                Some(name)
            }
            None => None,
        };

        let patch = UserPatch {
            email,
            display_name,
            role: request.role,
            status: request.status,
        };

        self.entity.update(caller, id, &patch).await
    }

    pub async fn remove(&self, caller: &AuthContext, id: Uuid) -> Result<()> {
        self.entity.remove(caller, id).await
    }
}
