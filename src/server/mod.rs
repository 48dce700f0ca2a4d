use crate::config::{Config, StorageBackend};
use crate::images::ImageService;
use crate::storage::{self, PUBLIC_OBJECT_PREFIX};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;
use showroom_common::{CategoryFolders, EntityKind};
use showroom_db::pool::{get_conn, DbPool, PooledConnection};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod form;
pub mod routes_banners;
pub mod routes_clients;
pub mod routes_services;

use error::{ApiError, OrRespond};

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Record repository
    pub db: DbPool,
    /// Normalizes and stores uploaded images
    pub images: Arc<ImageService>,
    /// Category to folder table for service images
    pub categories: Arc<CategoryFolders>,
}

impl AppContext {
    pub fn new(
        config: Config,
        db: DbPool,
        images: ImageService,
        categories: CategoryFolders,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            images: Arc::new(images),
            categories: Arc::new(categories),
        }
    }

    /// Pooled connection, or a 500 carrying `context` if none is available.
    pub(crate) fn conn(&self, context: &str) -> Result<PooledConnection, ApiError> {
        get_conn(&self.db).or_respond(context)
    }
}

/// Body returned by every successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
}

impl Deleted {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            message: format!("{} deleted successfully", kind.title()),
        }
    }
}

/// Parse a record id from the request path.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid id"))
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let config = ctx.config.clone();

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/banners", routes_banners::banner_routes())
        .nest("/clients", routes_clients::client_routes())
        .nest("/services", routes_services::service_routes());

    // The local backend's public URLs point back at this server
    if config.storage.backend == StorageBackend::Local {
        let bucket_dir = config.storage.local_dir.join(&config.storage.bucket);
        let mount = format!("{}/{}", PUBLIC_OBJECT_PREFIX, config.storage.bucket);
        tracing::info!("Serving stored images from {:?} at {}", bucket_dir, mount);
        app = app.nest_service(&mount, ServeDir::new(bucket_dir));
    }

    let mut app = app
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files if directory is provided
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = config.server.static_dir.as_ref() {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!("Static directory {:?} does not exist, not serving it", dir);
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Build the application context from configuration.
pub fn build_context(config: Config, db: DbPool) -> Result<AppContext> {
    let store = storage::build_store(&config.storage).context("Failed to set up object storage")?;
    let images = ImageService::new(store);
    Ok(AppContext::new(
        config,
        db,
        images,
        CategoryFolders::default(),
    ))
}

/// Start the HTTP server
pub async fn start_server(config: Config, db: DbPool) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = build_context(config, db)?;
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("7").unwrap(), 7);
        let err = parse_id("seven").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid id");
    }

    #[test]
    fn test_deleted_message() {
        assert_eq!(
            Deleted::new(EntityKind::Client).message,
            "Client deleted successfully"
        );
    }
}
