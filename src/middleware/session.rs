// Consumes the external session layer's output.
//
// An upstream gateway verifies the session token and forwards the resolved
// identity as headers; this middleware only parses that output into an
// `AuthContext` request extension. Handlers needing a caller extract
// `AuthContext` and receive 401 when no identity was forwarded.

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::str::FromStr;
use uuid::Uuid;

use crate::core::auth::{AuthContext, Role};
use crate::core::error::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

pub struct SessionContext;

impl<S, B> Transform<S, ServiceRequest> for SessionContext
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionContextMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionContextMiddleware { service }))
    }
}

pub struct SessionContextMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionContextMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(context) = identity_from_headers(&req) {
            tracing::debug!(user_id = %context.id, role = %context.role, "session identity attached");
            req.extensions_mut().insert(context);
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

fn identity_from_headers(req: &ServiceRequest) -> Option<AuthContext> {
    let id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())?;

    let role = req
        .headers()
        .get(USER_ROLE_HEADER)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| Role::from_str(value).ok())?;

    Some(AuthContext::new(id, role))
}

impl FromRequest for AuthContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthContext>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("missing session identity")),
        )
    }
}
