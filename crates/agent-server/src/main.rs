//! cryptosight-chat HTTP Server
//!
//! Axum-based server exposing the crypto intent router over a small REST API.
//! Each conversation id maps to one `ChatSession` held in memory.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::AnalysisBackend;
use agent_runtime::HttpBackend;
use crypto_router::backend::MockBackend;

use crate::config::{BackendMode, ServerConfig};
use crate::handlers::{
    chat_handler, delete_conversation, get_conversation, health_check, suggestions,
};
use crate::state::AppState;

/// Routes and middleware over `state`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/suggestions", get(suggestions))
        // Conversations
        .route("/api/chat", post(chat_handler))
        .route(
            "/api/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;

    let backend: Arc<dyn AnalysisBackend> = match config.backend {
        BackendMode::Http => Arc::new(HttpBackend::from_config(config.http.clone())?),
        BackendMode::Mock => {
            tracing::warn!("⚠ Using mock analysis backend - answers are canned");
            Arc::new(MockBackend::new())
        }
    };

    match backend.health_check().await {
        Ok(true) => tracing::info!("✓ Analysis backend reachable ({})", backend.name()),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Analysis backend not reachable - turns will fail");
            tracing::warn!("  Expected at {}", config.http.base_url);
        }
    }

    let state = AppState::new(backend, config.dispatch.clone());
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 cryptosight-chat running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                 - Health check");
    tracing::info!("  GET  /api/suggestions        - Starter prompts");
    tracing::info!("  POST /api/chat               - Send message");
    tracing::info!("  GET  /api/conversations/{{id}} - Conversation transcript");
    tracing::info!("  DELETE /api/conversations/{{id}} - Forget conversation");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
