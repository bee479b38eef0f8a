// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires the configured adapters into a [`ChatService`].

use std::sync::Arc;

use memchat_agent::{ChatService, ChatSettings};
use memchat_config::MemchatConfig;
use memchat_core::{MemchatError, MemoryAdapter, ProviderAdapter};
use memchat_openai::OpenAiProvider;
use memchat_zep::ZepMemory;

/// Builds the chat service from config. Fails when an API key is missing.
pub async fn build_chat_service(config: &MemchatConfig) -> Result<ChatService, MemchatError> {
    let provider: Arc<dyn ProviderAdapter> = Arc::new(OpenAiProvider::new(&config.openai)?);
    let memory: Arc<dyn MemoryAdapter> = Arc::new(ZepMemory::new(&config.zep)?);
    let settings = ChatSettings::from_config(config).await;
    Ok(ChatService::new(provider, memory, settings))
}
