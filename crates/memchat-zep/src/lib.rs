// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zep Cloud memory adapter for memchat.
//!
//! Implements [`MemoryAdapter`] over the Zep REST API: users, threads,
//! thread context, and the per-user knowledge graph.

pub mod chunk;
pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use memchat_config::model::ZepConfig;
use memchat_core::{
    AdapterType, GraphScope, HealthStatus, MemchatError, MemoryAdapter, PluginAdapter, RawGraph,
    ThreadId, Turn,
};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, info, warn};

pub use crate::chunk::chunk_text;
use crate::client::ZepClient;
use crate::types::ZepMessage;

/// Zep memory implementing [`MemoryAdapter`].
///
/// API key resolution order: config -> `ZEP_API_KEY` env var -> error.
pub struct ZepMemory {
    client: ZepClient,
    user_id: String,
    max_message_chars: usize,
}

impl ZepMemory {
    /// Creates the adapter from the `[zep]` config section.
    pub fn new(config: &ZepConfig) -> Result<Self, MemchatError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = ZepClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(base_url = config.base_url, "Zep memory initialized");

        Ok(Self {
            client,
            user_id: config.user_id.clone(),
            max_message_chars: config.max_message_chars,
        })
    }

    /// Converts turns into Zep messages, chunking long bodies.
    fn to_messages(&self, turns: &[Turn]) -> Vec<ZepMessage> {
        turns
            .iter()
            .flat_map(|turn| {
                chunk_text(&turn.content, self.max_message_chars)
                    .into_iter()
                    .map(move |content| ZepMessage {
                        role: turn.role.to_string(),
                        content,
                        created_at: Some(turn.timestamp.clone()),
                    })
            })
            .collect()
    }

    /// Full-graph listing; the two-scope search when listing fails.
    async fn export_graph(&self, user_id: &str, limit: usize) -> Result<RawGraph, MemchatError> {
        match self.list_graph(user_id).await {
            Ok(graph) => Ok(graph),
            Err(e) => {
                warn!(user_id, error = %e, "graph listing failed, falling back to search");
                let nodes = self
                    .client
                    .search_graph(user_id, None, GraphScope::Nodes, limit)
                    .await?;
                let edges = self
                    .client
                    .search_graph(user_id, None, GraphScope::Edges, limit)
                    .await?;
                Ok(RawGraph::new(Value::Array(nodes), Value::Array(edges)))
            }
        }
    }

    async fn list_graph(&self, user_id: &str) -> Result<RawGraph, MemchatError> {
        let nodes = self.client.graph_nodes(user_id).await?;
        let edges = self.client.graph_edges(user_id).await?;
        Ok(RawGraph::new(Value::Array(nodes), Value::Array(edges)))
    }
}

#[async_trait]
impl PluginAdapter for ZepMemory {
    fn name(&self) -> &str {
        "zep"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Memory
    }

    /// Reads the configured user. A missing user still proves the service
    /// and key work; users are created on first chat.
    async fn health_check(&self) -> Result<HealthStatus, MemchatError> {
        match self.client.get_user(&self.user_id).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) if e.is_not_found() => Ok(HealthStatus::Healthy),
            Err(e) => {
                debug!(error = %e, "Zep health check failed");
                Ok(HealthStatus::Unhealthy(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl MemoryAdapter for ZepMemory {
    async fn ensure_user(&self, user_id: &str) -> Result<(), MemchatError> {
        match self.client.get_user(user_id).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                info!(user_id, "creating Zep user");
                self.client.create_user(user_id).await.map(|_| ())
            }
            Err(e) => Err(e),
        }
    }

    async fn thread_exists(&self, thread: &ThreadId) -> Result<bool, MemchatError> {
        match self.client.thread_messages(thread, 1).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_thread(&self, thread: &ThreadId, user_id: &str) -> Result<(), MemchatError> {
        self.client.create_thread(thread, user_id).await?;
        info!(thread_id = %thread, user_id, "created Zep thread");
        Ok(())
    }

    async fn add_turns(&self, thread: &ThreadId, turns: &[Turn]) -> Result<(), MemchatError> {
        let messages = self.to_messages(turns);
        debug!(thread_id = %thread, count = messages.len(), "writing messages to Zep");
        self.client.add_messages(thread, &messages).await
    }

    async fn context(&self, thread: &ThreadId) -> Result<String, MemchatError> {
        self.client.get_context(thread).await
    }

    async fn graph(&self, user_id: &str, limit: usize) -> Result<RawGraph, MemchatError> {
        self.export_graph(user_id, limit).await
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<SecretString, MemchatError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(SecretString::from(key.clone()));
    }
    std::env::var("ZEP_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            MemchatError::Config(
                "Zep API key not found. Set zep.api_key in config or ZEP_API_KEY environment variable.".into(),
            )
        })
}
