mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use std::sync::Arc;

use config::Storage;
use handlers::rest::{self, AppState};
use repository::{InMemoryRepository, PgRepository};

use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded config, storage: {:?}", cfg.storage);

    // Repository creation and migration
    let state = match cfg.storage {
        Storage::Postgres => {
            let database_dsn = cfg.database_dsn.as_deref().unwrap_or_default();
            let repo = PgRepository::new(database_dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });

            repo.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                panic!("failed to migrate database: {e}");
            });

            AppState::over(Arc::new(repo))
        }
        Storage::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            AppState::over(Arc::new(InMemoryRepository::new()))
        }
    };

    // Router config
    let router = Router::new()
        .route("/", get(root))
        .merge(rest::router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {}: {e}", cfg.port);
            panic!("failed to bind to port {}: {e}", cfg.port);
        });

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("REST server starting, listening on {}", addr);
    }

    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}

async fn root() -> Response {
    (StatusCode::OK, "Hello from person notes server!").into_response()
}
