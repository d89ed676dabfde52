//! HEXDIG Server - HTTP API for the board renderer
//!
//! This crate provides the web backend:
//! - REST API for puzzle actions (dig, place, remove, edit)
//! - Shape catalog editing
//! - Static file serving for the renderer

mod error;
mod routes;
mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use hexdig_core::{StageCatalog, DEFAULT_STAGE};

pub use error::ApiError;
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Stage loaded at startup
    pub stage: String,
    /// Extra `*.json` stage files
    pub stages_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "hexdig/visualizer".to_string(),
            stage: DEFAULT_STAGE.to_string(),
            stages_dir: None,
        }
    }
}

impl ServerConfig {
    /// Build the stage catalog and initial state this config describes
    pub fn build_state(&self) -> anyhow::Result<ServerState> {
        let catalog = match &self.stages_dir {
            Some(dir) => StageCatalog::load_dir(dir)?,
            None => StageCatalog::builtin(),
        };
        let stage = catalog.get(&self.stage)?.clone();
        Ok(ServerState::new(catalog, &stage))
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry and stages
        .route("/api/board", get(routes::board::get_board))
        .route("/api/stages", get(routes::board::get_stages))
        // Session API
        .route("/api/session", get(routes::session::get_session))
        .route("/api/session/init", post(routes::session::init_board))
        .route("/api/session/dig", post(routes::session::dig))
        .route("/api/session/place", post(routes::session::place))
        .route("/api/session/preview", post(routes::session::preview))
        .route("/api/session/remove", post(routes::session::remove_placement))
        .route("/api/session/edit", post(routes::session::edit_cell))
        // Shape catalog
        .route("/api/shapes", get(routes::shapes::get_shapes).post(routes::shapes::add_shape))
        .route("/api/shapes/:id", delete(routes::shapes::delete_shape))
        .route("/api/shapes/:id/toggle", post(routes::shapes::toggle_shape))
        // Shared state
        .with_state(state)
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(config.build_state()?);
    let router = create_router(&config, state);

    tracing::info!("HEXDIG Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);
    tracing::info!("Initial stage: {}", config.stage);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
