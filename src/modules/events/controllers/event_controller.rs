use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::AppError;
use crate::core::pagination::PageRequest;
use crate::core::query::{FilterCriteria, Predicate, SortSpec};
use crate::modules::events::models::{CreateEventRequest, UpdateEventRequest};
use crate::modules::events::services::EventService;

/// Query parameters for listing events
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    /// Comma-separated status set
    pub status: Option<String>,
    pub adventure_id: Option<String>,
    /// Case-insensitive title search
    pub search: Option<String>,
}

impl ListEventsQuery {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if let Some(status) = &self.status {
            criteria.push("status", Predicate::one_of_csv(status));
        }
        if let Some(adventure_id) = &self.adventure_id {
            criteria.push("adventure_id", Predicate::Equals(adventure_id.clone()));
        }
        if let Some(search) = &self.search {
            criteria.push("title", Predicate::Search(search.clone()));
        }
        criteria
    }
}

/// Schedule a departure
/// POST /events
pub async fn create_event(
    service: web::Data<EventService>,
    caller: AuthContext,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, AppError> {
    let event = service.schedule(&caller, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(event))
}

/// List events visible to the caller
/// GET /events
pub async fn list_events(
    service: web::Data<EventService>,
    caller: AuthContext,
    query: web::Query<ListEventsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let sort = query.sort.as_deref().map(SortSpec::parse).transpose()?;

    let result = service
        .list(&caller, &query.criteria(), sort.as_ref(), page)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Get event by ID
/// GET /events/{id}
pub async fn get_event(
    service: web::Data<EventService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let event = service.get(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(event))
}

/// Update an event
/// PATCH /events/{id}
pub async fn update_event(
    service: web::Data<EventService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse, AppError> {
    let event = service
        .update(&caller, path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(event))
}

/// Delete an event
/// DELETE /events/{id}
pub async fn remove_event(
    service: web::Data<EventService>,
    caller: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.remove(&caller, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure event routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::post().to(create_event))
            .route("", web::get().to(list_events))
            .route("/{id}", web::get().to(get_event))
            .route("/{id}", web::patch().to(update_event))
            .route("/{id}", web::delete().to(remove_event)),
    );
}
