use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailhub::config::Config;
use trailhub::middleware::{RequestId, SessionContext};
use trailhub::modules::{adventures, events, posts, users};
use trailhub::store::MySqlStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailhub=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting TrailHub platform API");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool and apply migrations
    let db_pool = config.database.create_pool().await?;
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Wire the domain services over the MySQL store adapters
    let adventure_store = Arc::new(MySqlStore::<adventures::Adventure>::new(db_pool.clone()));
    let user_service = web::Data::new(users::UserService::new(Arc::new(MySqlStore::<
        users::User,
    >::new(
        db_pool.clone()
    ))));
    let adventure_service = web::Data::new(adventures::AdventureService::new(
        adventure_store.clone(),
    ));
    let event_service = web::Data::new(events::EventService::new(
        Arc::new(MySqlStore::<events::Event>::new(db_pool.clone())),
        adventure_store,
    ));
    let post_service = web::Data::new(posts::PostService::new(Arc::new(MySqlStore::<
        posts::Post,
    >::new(
        db_pool.clone()
    ))));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .app_data(user_service.clone())
            .app_data(adventure_service.clone())
            .app_data(event_service.clone())
            .app_data(post_service.clone())
            .wrap(TracingLogger::default())
            .wrap(SessionContext)
            .wrap(RequestId)
            .wrap(Cors::permissive())
            .route("/health", web::get().to(health_check))
            .configure(users::controllers::configure)
            .configure(adventures::controllers::configure)
            .configure(events::controllers::configure)
            .configure(posts::controllers::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "trailhub"
    }))
}
