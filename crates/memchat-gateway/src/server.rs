// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use memchat_agent::ChatService;
use memchat_core::{MemchatError, ThreadId};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{handlers, ui};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub chat: Arc<ChatService>,
    /// Thread used when a request names none (from config or `--thread`).
    pub default_thread: Option<ThreadId>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(chat: Arc<ChatService>, default_thread: Option<ThreadId>) -> Self {
        Self {
            chat,
            default_thread,
            start_time: Instant::now(),
        }
    }
}

/// Bind address for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Routes:
/// - `GET /` chat and graph page
/// - `POST /v1/chat`
/// - `GET /v1/graph`
/// - `GET /health`
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/v1/chat", post(handlers::post_chat))
        .route("/v1/graph", get(handlers::get_graph))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds and serves until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), MemchatError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MemchatError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("memchat UI listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MemchatError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
