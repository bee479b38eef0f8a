// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memchat export-graph` command implementation.

use std::path::Path;

use memchat_agent::ChatService;
use memchat_config::MemchatConfig;
use memchat_core::MemchatError;
use memchat_graph::GraphView;

use crate::services::build_chat_service;

/// Exports the configured user's graph to `out`.
pub async fn run_export(
    config: &MemchatConfig,
    out: &Path,
    limit: Option<usize>,
) -> Result<(), MemchatError> {
    let chat = build_chat_service(config).await?;
    let view = export_to_file(&chat, out, limit).await?;
    println!("Saved graph JSON -> {}", out.display());
    println!("nodes: {}, edges: {}", view.nodes.len(), view.edges.len());
    Ok(())
}

/// Writes the reshaped graph as pretty-printed JSON. Nothing is written on failure.
async fn export_to_file(
    chat: &ChatService,
    out: &Path,
    limit: Option<usize>,
) -> Result<GraphView, MemchatError> {
    let view = chat.export_graph(limit).await?;
    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| MemchatError::Internal(format!("failed to serialize graph: {e}")))?;
    tokio::fs::write(out, json)
        .await
        .map_err(|e| MemchatError::Internal(format!("failed to write {}: {e}", out.display())))?;
    Ok(view)
}
