use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::AppError;
use crate::core::pagination::PageRequest;
use crate::core::query::{FilterCriteria, Predicate, SortSpec};
use crate::modules::users::models::{CreateUserRequest, UpdateUserRequest};
use crate::modules::users::services::UserService;

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    /// Comma-separated role set
    pub role: Option<String>,
    /// Comma-separated status set
    pub status: Option<String>,
    /// Case-insensitive display-name search
    pub search: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

impl ListUsersQuery {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if let Some(role) = &self.role {
            criteria.push("role", Predicate::one_of_csv(role));
        }
        if let Some(status) = &self.status {
            criteria.push("status", Predicate::one_of_csv(status));
        }
        if let Some(search) = &self.search {
            criteria.push("display_name", Predicate::Search(search.clone()));
        }
        if let Some(email) = &self.email {
            criteria.push("email", Predicate::Equals(email.clone()));
        }
        criteria
    }
}

/// Register a new account
/// POST /users
pub async fn register_user(
    service: web::Data<UserService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List accounts visible to the caller
/// GET /users
pub async fn list_users(
    service: web::Data<UserService>,
    caller: AuthContext,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let sort = query.sort.as_deref().map(SortSpec::parse).transpose()?;

    let result = service
        .list(
            &caller,
            &query.criteria(),
            sort.as_ref(),
            page,
            query.include_deleted,
        )
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Get account by ID
/// GET /users/{id}
pub async fn get_user(
    service: web::Data<UserService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user = service.get(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Update an account
/// PATCH /users/{id}
pub async fn update_user(
    service: web::Data<UserService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = service
        .update(&caller, path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Soft-delete an account
/// DELETE /users/{id}
pub async fn remove_user(
    service: web::Data<UserService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.remove(&caller, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(register_user))
            .route("", web::get().to(list_users))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::patch().to(update_user))
            .route("/{id}", web::delete().to(remove_user)),
    );
}
