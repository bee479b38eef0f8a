// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memchat serve` command implementation.

use std::sync::Arc;

use memchat_config::MemchatConfig;
use memchat_core::{MemchatError, ThreadId};
use memchat_gateway::{start_server, GatewayState, ServerConfig};
use tracing::info;

use crate::services::build_chat_service;

/// Runs the web UI until Ctrl-C.
pub async fn run_serve(
    config: &MemchatConfig,
    default_thread: Option<ThreadId>,
) -> Result<(), MemchatError> {
    let chat = build_chat_service(config).await?;

    info!(
        user_id = config.zep.user_id.as_str(),
        model = config.openai.model.as_str(),
        "starting memchat web UI"
    );

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, GatewayState::new(Arc::new(chat), default_thread)).await
}
