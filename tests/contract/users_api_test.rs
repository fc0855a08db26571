// HTTP contract for the users module: status mapping (400/401/404/409),
// the pagination envelope, and the structured error body.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use helpers::test_data::{member, user_service};
use trailhub::core::auth::AuthContext;
use trailhub::middleware::SessionContext;
use trailhub::modules::users::controllers;

fn identity(request: test::TestRequest, caller: &AuthContext) -> test::TestRequest {
    request
        .insert_header(("X-User-Id", caller.id.to_string()))
        .insert_header(("X-User-Role", caller.role.to_string()))
}

macro_rules! users_app {
    () => {{
        let service = web::Data::new(user_service());
        test::init_service(
            App::new()
                .app_data(service)
                .wrap(SessionContext)
                .configure(controllers::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_registration_returns_created_account() {
    let app = users_app!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "Mika@Example.com", "display_name": "Mika" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "mika@example.com");
    assert_eq!(body["role"], "member");
    assert_eq!(body["status"], "active");
    assert_eq!(body["referral_code"].as_str().unwrap().len(), 8);
    assert!(body["deleted_at"].is_null());
}

#[actix_web::test]
async fn test_duplicate_email_maps_to_409() {
    let app = users_app!();

    let register = || {
        test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": "mika@example.com", "display_name": "Mika" }))
            .to_request()
    };

    let resp = test::call_service(&app, register()).await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(&app, register()).await;
    assert_eq!(resp.status(), 409);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 409);
    assert_eq!(body["error"]["kind"], "constraint_violation");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("email"));
}

#[actix_web::test]
async fn test_listing_requires_identity() {
    let app = users_app!();

    let req = test::TestRequest::get().uri("/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "unauthorized");
}

#[actix_web::test]
async fn test_out_of_range_limit_maps_to_400() {
    let app = users_app!();

    let req = identity(test::TestRequest::get().uri("/users?limit=500"), &member()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "validation");
}

#[actix_web::test]
async fn test_unknown_id_maps_to_404() {
    let app = users_app!();

    let req = identity(
        test::TestRequest::get().uri(&format!("/users/{}", Uuid::new_v4())),
        &member(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], "not_found");
}

#[actix_web::test]
async fn test_listing_returns_pagination_envelope() {
    let app = users_app!();

    for index in 0..3 {
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(json!({
                "email": format!("user{}@example.com", index),
                "display_name": format!("User {}", index),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let req = identity(
        test::TestRequest::get().uri("/users?limit=2&page=1"),
        &member(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["has_next"], true);
    assert_eq!(body["has_prev"], false);
}
