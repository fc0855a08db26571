use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::AppError;
use crate::core::pagination::PageRequest;
use crate::core::query::{FilterCriteria, Predicate, SortSpec};
use crate::modules::adventures::models::{CreateAdventureRequest, UpdateAdventureRequest};
use crate::modules::adventures::services::AdventureService;

/// Query parameters for listing adventures
#[derive(Debug, Default, Deserialize)]
pub struct ListAdventuresQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    /// Comma-separated status set
    pub status: Option<String>,
    /// Case-insensitive title search
    pub search: Option<String>,
    /// Case-insensitive location search
    pub location: Option<String>,
    pub host_id: Option<String>,
}

impl ListAdventuresQuery {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if let Some(status) = &self.status {
            criteria.push("status", Predicate::one_of_csv(status));
        }
        if let Some(search) = &self.search {
            criteria.push("title", Predicate::Search(search.clone()));
        }
        if let Some(location) = &self.location {
            criteria.push("location", Predicate::Search(location.clone()));
        }
        if let Some(host_id) = &self.host_id {
            criteria.push("host_id", Predicate::Equals(host_id.clone()));
        }
        criteria
    }
}

/// Create a draft adventure hosted by the caller
/// POST /adventures
pub async fn create_adventure(
    service: web::Data<AdventureService>,
    caller: AuthContext,
    request: web::Json<CreateAdventureRequest>,
) -> Result<HttpResponse, AppError> {
    let adventure = service.create(&caller, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(adventure))
}

/// List adventures visible to the caller
/// GET /adventures
pub async fn list_adventures(
    service: web::Data<AdventureService>,
    caller: AuthContext,
    query: web::Query<ListAdventuresQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let sort = query.sort.as_deref().map(SortSpec::parse).transpose()?;

    let result = service
        .list(&caller, &query.criteria(), sort.as_ref(), page)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Get adventure by ID
/// GET /adventures/{id}
pub async fn get_adventure(
    service: web::Data<AdventureService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let adventure = service.get(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(adventure))
}

/// Update an adventure
/// PATCH /adventures/{id}
pub async fn update_adventure(
    service: web::Data<AdventureService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateAdventureRequest>,
) -> Result<HttpResponse, AppError> {
    let adventure = service
        .update(&caller, path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(adventure))
}

/// Delete an adventure
/// DELETE /adventures/{id}
pub async fn remove_adventure(
    service: web::Data<AdventureService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.remove(&caller, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure adventure routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/adventures")
            .route("", web::post().to(create_adventure))
            .route("", web::get().to(list_adventures))
            .route("/{id}", web::get().to(get_adventure))
            .route("/{id}", web::patch().to(update_adventure))
            .route("/{id}", web::delete().to(remove_adventure)),
    );
}
