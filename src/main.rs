use axum::{extract::DefaultBodyLimit, http::Method};
use labtrack_backend::{
    config::{Config, DatabaseBackend},
    database::Database,
    error::AppResult,
    handlers::AppState,
    repositories::{MemoryStore, PgStore},
    routes::create_router,
    storage::{LocalStorage, Storage},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labtrack_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load_or_init("config.toml")?;

    tracing::info!("Server configuration: {}", config.server_addr());

    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(&config.file.upload_dir).await?);
    tracing::info!("File storage at {}", config.file.upload_dir);

    let app_state = match config.database.backend {
        DatabaseBackend::Postgres => {
            let database = Database::new(&config.database).await?;
            database.migrate().await?;
            AppState::new(Arc::new(PgStore::new(database)), storage, config.clone())
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on restart");
            AppState::new(Arc::new(MemoryStore::new()), storage, config.clone())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let app = create_router(app_state)
        .layer(DefaultBodyLimit::max(config.file.max_size as usize))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("Server listening on {}", config.server_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
