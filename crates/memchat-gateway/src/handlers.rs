// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway JSON API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use memchat_agent::AdapterHealth;
use memchat_core::{ChatMessage, HealthStatus, MemchatError, ThreadId};
use memchat_graph::GraphView;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::server::GatewayState;

/// Largest graph page a client may ask for.
pub const MAX_GRAPH_LIMIT: usize = 50;

/// Request body for POST /v1/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Thread to continue; a new one is opened when absent or unknown.
    #[serde(default)]
    pub thread_id: Option<ThreadId>,
    /// The client's short conversation window.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Response body for POST /v1/chat.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Thread the turn was written to; the client sends it back next time.
    pub thread_id: ThreadId,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` when every adapter is, otherwise `degraded`.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdapterStatus {
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<AdapterHealth> for AdapterStatus {
    fn from(health: AdapterHealth) -> Self {
        let (status, detail) = match health.status {
            HealthStatus::Healthy => ("healthy", None),
            HealthStatus::Unhealthy(reason) => ("unhealthy", Some(reason)),
        };
        Self {
            name: health.name,
            status: status.to_string(),
            detail,
        }
    }
}

/// Error body for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A failed request: status plus message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<MemchatError> for ApiError {
    fn from(err: MemchatError) -> Self {
        let status = match &err {
            MemchatError::Graph(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MemchatError::Provider { .. }
            | MemchatError::Memory { .. }
            | MemchatError::NotFound(_) => StatusCode::BAD_GATEWAY,
            MemchatError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            MemchatError::Config(_) | MemchatError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "request rejected");
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// POST /v1/chat - run one chat turn.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }

    let requested = body.thread_id.or_else(|| state.default_thread.clone());
    let thread = state.chat.open_thread(requested).await?;
    let turn = state.chat.respond(&thread, &body.history, message).await?;

    Ok(Json(ChatResponse {
        reply: turn.reply,
        thread_id: thread,
        history: turn.history,
    }))
}

/// GET /v1/graph - the user's knowledge graph as Cytoscape elements.
pub async fn get_graph(
    State(state): State<GatewayState>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<GraphView>, ApiError> {
    if let Some(limit) = query.limit
        && !(1..=MAX_GRAPH_LIMIT).contains(&limit)
    {
        return Err(ApiError::bad_request(format!(
            "limit must be between 1 and {MAX_GRAPH_LIMIT}"
        )));
    }

    Ok(Json(state.chat.export_graph(query.limit).await?))
}

/// GET /health - uptime and per-adapter status. Always 200 while serving.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let adapters: Vec<AdapterStatus> = state
        .chat
        .health()
        .await
        .into_iter()
        .map(AdapterStatus::from)
        .collect();
    let status = if adapters.iter().all(|a| a.status == "healthy") {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        adapters,
    })
}

#[cfg(test)]
mod tests {
    use memchat_core::AdapterType;

    use super::*;

    #[test]
    fn adapter_status_carries_failure_detail() {
        let status = AdapterStatus::from(AdapterHealth {
            name: "zep".into(),
            kind: AdapterType::Memory,
            status: HealthStatus::Unhealthy("timed out".into()),
        });
        assert_eq!(status.status, "unhealthy");
        assert_eq!(status.detail.as_deref(), Some("timed out"));

        let json = serde_json::to_value(AdapterStatus::from(AdapterHealth {
            name: "openai".into(),
            kind: AdapterType::Provider,
            status: HealthStatus::Healthy,
        }))
        .unwrap();
        assert_eq!(json, serde_json::json!({"name": "openai", "status": "healthy"}));
    }

    #[test]
    fn graph_errors_map_to_422() {
        let err = ApiError::from(MemchatError::Graph("nodes[0]".into()));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn upstream_errors_map_to_502() {
        for err in [
            MemchatError::provider("down"),
            MemchatError::memory("down"),
            MemchatError::NotFound("user".into()),
        ] {
            assert_eq!(ApiError::from(err).status, StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn chat_request_defaults_optional_fields() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(req.thread_id.is_none());
        assert!(req.history.is_empty());
    }
}
