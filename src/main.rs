//! Cadenza Server - Music School Management System
//!
//! A Rust REST API server for music school management.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cadenza_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("cadenza_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cadenza Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.batch.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Lessons
        .route("/lessons", get(api::lessons::list_lessons))
        .route("/lessons", post(api::lessons::create_lesson))
        // Bulk routes before the :id routes so "bulk" never parses as an id
        .route("/lessons/bulk", post(api::lessons::bulk_create_lessons))
        .route("/lessons/bulk", put(api::lessons::bulk_update_lessons))
        .route("/lessons/bulk", delete(api::lessons::bulk_delete_lessons))
        .route("/lessons/:id", get(api::lessons::get_lesson))
        .route("/lessons/:id", put(api::lessons::update_lesson))
        .route("/lessons/:id", delete(api::lessons::delete_lesson))
        // Songs
        .route("/songs", get(api::songs::list_songs))
        .route("/songs", post(api::songs::create_song))
        .route("/songs/bulk", post(api::songs::bulk_import_songs))
        .route("/songs/bulk", delete(api::songs::bulk_delete_songs))
        .route("/songs/:id", get(api::songs::get_song))
        .route("/songs/:id", put(api::songs::update_song))
        .route("/songs/:id", delete(api::songs::delete_song))
        // Students
        .route("/students", get(api::students::list_students))
        .route("/students", post(api::students::create_student))
        .route("/students/:id", get(api::students::get_student))
        .route("/students/:id", put(api::students::update_student))
        .route("/students/:id", delete(api::students::delete_student))
        .route(
            "/students/:id/assignments",
            get(api::students::list_student_assignments),
        )
        // Assignments
        .route(
            "/assignments/bulk",
            post(api::assignments::bulk_upsert_assignments),
        )
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
