//! CampusSoft Server - installation request management
//!
//! REST API server for university software installation requests.

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

use campussoft_server::{
    api, config::AppConfig, repository::Repository, services::Services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("campussoft_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CampusSoft Server v{}", env!("CARGO_PKG_VERSION"));

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
    let services = Services::new(
        repository,
        config.auth.clone(),
        config.attestation.clone(),
    )
    .expect("Failed to create services");

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
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Departments
        .route("/departments", get(api::departments::list))
        .route("/departments", post(api::departments::create))
        .route("/departments/:id", get(api::departments::get))
        .route("/departments/:id", put(api::departments::update))
        .route("/departments/:id", delete(api::departments::delete))
        // Rooms
        .route("/rooms", get(api::rooms::list))
        .route("/rooms", post(api::rooms::create))
        .route("/rooms/:id", get(api::rooms::get))
        .route("/rooms/:id", put(api::rooms::update))
        .route("/rooms/:id", delete(api::rooms::delete))
        .route("/rooms/:id/software", get(api::rooms::installed_software))
        // Software catalog
        .route("/software", get(api::software::list))
        .route("/software", post(api::software::create))
        .route("/software/:id", get(api::software::get))
        .route("/software/:id", put(api::software::update))
        .route("/software/:id", delete(api::software::deactivate))
        // Users
        .route("/users", get(api::users::list))
        .route("/users", post(api::users::create))
        .route("/users/teachers", post(api::users::create_teacher))
        .route("/users/:id", get(api::users::get))
        .route("/users/:id", put(api::users::update))
        .route("/users/:id", delete(api::users::deactivate))
        .route(
            "/users/:id/it-service",
            post(api::users::create_it_service_member),
        )
        .route(
            "/users/:id/administrator",
            post(api::users::create_administrator),
        )
        // Requests
        .route("/requests", get(api::requests::list))
        .route("/requests", post(api::requests::create))
        .route("/requests/open", get(api::requests::list_open))
        .route("/requests/:id", get(api::requests::get))
        .route("/requests/:id", put(api::requests::update))
        .route("/requests/:id/close", post(api::requests::close))
        .route(
            "/requests/:id/in-progress",
            post(api::requests::mark_in_progress),
        )
        .route(
            "/requests/:id/summary",
            get(api::requests::installation_summary),
        )
        .route("/requests/:id/resync", post(api::requests::resync))
        .route(
            "/requests/:id/consistency",
            get(api::requests::check_consistency),
        )
        .route("/requests/:id/history", get(api::history::list_by_request))
        .route(
            "/requests/:id/attestation",
            get(api::attestations::get_by_request),
        )
        // Installations
        .route("/items", get(api::installations::list_items))
        .route("/items/:id", get(api::installations::get_item))
        .route(
            "/requests/:request_id/items/:item_id/rooms/:room_id",
            put(api::installations::update_room_installation),
        )
        .route(
            "/requests/:request_id/items/:item_id/install-all",
            post(api::installations::mark_all_installed),
        )
        .route(
            "/requests/:request_id/items/:item_id/installation",
            put(api::installations::update_item_installation),
        )
        // Attestations
        .route("/attestations", get(api::attestations::list))
        .route("/attestations", post(api::attestations::create))
        .route(
            "/attestations/expire-due",
            post(api::attestations::expire_due),
        )
        .route(
            "/attestations/reminders",
            get(api::attestations::list_due_for_reminder),
        )
        .route(
            "/attestations/campaign",
            post(api::attestations::run_campaign),
        )
        .route("/attestations/:id", get(api::attestations::get))
        .route("/attestations/:id/confirm", post(api::attestations::confirm))
        .route("/attestations/:id/expire", post(api::attestations::expire))
        .route(
            "/attestations/:id/reminder-sent",
            post(api::attestations::mark_reminder_sent),
        )
        // History
        .route("/history", get(api::history::list))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
