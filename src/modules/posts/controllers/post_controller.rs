use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::AppError;
use crate::core::pagination::PageRequest;
use crate::core::query::{FilterCriteria, Predicate, SortSpec};
use crate::modules::posts::models::{CreatePostRequest, UpdatePostRequest};
use crate::modules::posts::services::PostService;

/// Query parameters for listing posts
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    /// Comma-separated status set
    pub status: Option<String>,
    pub author_id: Option<String>,
    /// Case-insensitive title search
    pub search: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

impl ListPostsQuery {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if let Some(status) = &self.status {
            criteria.push("status", Predicate::one_of_csv(status));
        }
        if let Some(author_id) = &self.author_id {
            criteria.push("author_id", Predicate::Equals(author_id.clone()));
        }
        if let Some(search) = &self.search {
            criteria.push("title", Predicate::Search(search.clone()));
        }
        criteria
    }
}

/// Compose a post
/// POST /posts
pub async fn create_post(
    service: web::Data<PostService>,
    caller: AuthContext,
    request: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, AppError> {
    let post = service.compose(&caller, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

/// List posts visible to the caller
/// GET /posts
pub async fn list_posts(
    service: web::Data<PostService>,
    caller: AuthContext,
    query: web::Query<ListPostsQuery>,
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

/// Get post by ID
/// GET /posts/{id}
pub async fn get_post(
    service: web::Data<PostService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let post = service.get(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Update a post
/// PATCH /posts/{id}
pub async fn update_post(
    service: web::Data<PostService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, AppError> {
    let post = service
        .update(&caller, path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Soft-delete a post
/// DELETE /posts/{id}
pub async fn remove_post(
    service: web::Data<PostService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.remove(&caller, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure post routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("", web::post().to(create_post))
            .route("", web::get().to(list_posts))
            .route("/{id}", web::get().to(get_post))
            .route("/{id}", web::patch().to(update_post))
            .route("/{id}", web::delete().to(remove_post)),
    );
}
