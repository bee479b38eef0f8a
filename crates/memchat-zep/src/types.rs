// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Zep Cloud REST API.

use memchat_core::GraphScope;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateThreadRequest<'a> {
    pub thread_id: &'a str,
    pub user_id: &'a str,
}

/// One message as Zep stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZepMessage {
    /// `user`, `assistant`, or `system`.
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddMessagesRequest<'a> {
    pub messages: &'a [ZepMessage],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadContextResponse {
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphSearchRequest<'a> {
    pub user_id: &'a str,
    pub query: &'a str,
    pub limit: usize,
    pub scope: GraphScope,
}

/// Search results. Only the half matching the requested scope is populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphSearchResponse {
    #[serde(default)]
    pub nodes: Option<Vec<Value>>,
    #[serde(default)]
    pub edges: Option<Vec<Value>>,
}

/// Body for the per-user node and edge listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}
