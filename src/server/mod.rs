pub mod routes;
pub mod speech;

pub use routes::*;
pub use speech::*;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dialogue::{PermissionConfig, SessionStore};
use crate::models::ModuleCatalog;

/// Shared state behind every request handler.
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub catalog: ModuleCatalog,
    pub speech: SpeechClient,
    pub permission: PermissionConfig,
    pub logs_dir: PathBuf,
    pub audio_cache: PathBuf,
}

/// Build the application router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let audio_dir = state.audio_cache.clone();
    Router::new()
        .route("/start", post(start_conversation))
        .route("/chat", post(handle_chat))
        .route("/form/questions", get(get_form_questions))
        .route("/form/submit", post(submit_form))
        .nest_service("/audio", ServeDir::new(audio_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the survey dialogue service.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let app = router(state);

    info!("Survey service listening on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
