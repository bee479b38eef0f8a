// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat turn pipeline for memchat.
//!
//! [`ChatService`] runs one conversational turn end to end: read the memory
//! context for the thread, ask the LLM for a reply, write both sides of the
//! exchange back to memory. It also resolves which thread to talk on and
//! exports the user's knowledge graph for the visualizer.
//!
//! The service keeps no per-conversation state. Callers own the thread id
//! and the short history and pass them into every call.

pub mod prompt;

use std::sync::Arc;

use memchat_config::MemchatConfig;
use memchat_core::{
    AdapterType, ChatMessage, HealthStatus, MemchatError, MemoryAdapter, PluginAdapter,
    ProviderAdapter, ProviderRequest, Role, ThreadId, Turn,
};
use memchat_graph::GraphView;
use tracing::{debug, info, warn};

pub use crate::prompt::{load_system_prompt, DEFAULT_SYSTEM_PROMPT};

/// Header of the system message carrying memory context.
pub const CONTEXT_HEADER: &str = "ZEP MEMORY CONTEXT:";

/// Settings for a [`ChatService`].
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Memory-service user that owns threads and the graph.
    pub user_id: String,
    pub system_prompt: String,
    /// Model override; empty means the provider's default.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Most recent messages replayed to the LLM and returned to the caller.
    pub history_window: usize,
    /// Records requested per graph half on export.
    pub graph_limit: usize,
}

impl ChatSettings {
    /// Builds settings from config, reading the system prompt file if set.
    pub async fn from_config(config: &MemchatConfig) -> Self {
        Self {
            user_id: config.zep.user_id.clone(),
            system_prompt: load_system_prompt(
                &config.agent.system_prompt,
                &config.agent.system_prompt_file,
            )
            .await,
            model: config.openai.model.clone(),
            temperature: config.agent.temperature,
            max_tokens: config.openai.max_tokens,
            history_window: config.agent.history_window,
            graph_limit: config.zep.graph_limit,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            user_id: "vk_user".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: String::new(),
            temperature: 0.2,
            max_tokens: None,
            history_window: 6,
            graph_limit: 50,
        }
    }
}

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    /// The caller's history plus this exchange, trimmed to the window.
    pub history: Vec<ChatMessage>,
}

/// Health of one adapter as reported by [`ChatService::health`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterHealth {
    pub name: String,
    pub kind: AdapterType,
    pub status: HealthStatus,
}

async fn check_adapter<A: PluginAdapter + ?Sized>(adapter: &A) -> AdapterHealth {
    let status = adapter
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
    if status != HealthStatus::Healthy {
        warn!(adapter = adapter.name(), status = ?status, "adapter not healthy");
    }
    AdapterHealth {
        name: adapter.name().to_string(),
        kind: adapter.adapter_type(),
        status,
    }
}

/// Runs chat turns against an LLM provider and a memory service.
pub struct ChatService {
    provider: Arc<dyn ProviderAdapter>,
    memory: Arc<dyn MemoryAdapter>,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        memory: Arc<dyn MemoryAdapter>,
        settings: ChatSettings,
    ) -> Self {
        info!(
            user_id = settings.user_id.as_str(),
            provider = provider.name(),
            memory = memory.name(),
            "chat service initialized"
        );
        Self {
            provider,
            memory,
            settings,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Resolves the thread to talk on.
    ///
    /// Makes sure the user exists, reuses `requested` when the memory service
    /// knows it, and otherwise creates a fresh UUIDv4 thread. A creation that
    /// fails because the user is missing is retried once after re-ensuring
    /// the user.
    pub async fn open_thread(&self, requested: Option<ThreadId>) -> Result<ThreadId, MemchatError> {
        let user_id = self.settings.user_id.as_str();
        self.memory.ensure_user(user_id).await?;

        if let Some(thread) = requested.filter(|t| !t.as_str().trim().is_empty()) {
            if self.memory.thread_exists(&thread).await? {
                debug!(thread_id = %thread, "reusing existing thread");
                return Ok(thread);
            }
            info!(thread_id = %thread, "requested thread not found, starting a new one");
        }

        let thread = ThreadId(uuid::Uuid::new_v4().to_string());
        match self.memory.create_thread(&thread, user_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(user_id, error = %e, "user missing during thread creation, retrying");
                self.memory.ensure_user(user_id).await?;
                self.memory.create_thread(&thread, user_id).await?;
            }
            Err(e) => return Err(e),
        }

        info!(thread_id = %thread, "opened new thread");
        Ok(thread)
    }

    /// Runs one chat turn on `thread`.
    ///
    /// `history` is the caller's short conversation window; only user and
    /// assistant messages are replayed. A failed memory-context read is
    /// logged and treated as empty context. Every other failure aborts the
    /// turn, and nothing is written to memory when the LLM call fails.
    pub async fn respond(
        &self,
        thread: &ThreadId,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Result<ChatReply, MemchatError> {
        let context = match self.memory.context(thread).await {
            Ok(context) => context,
            Err(e) => {
                warn!(thread_id = %thread, error = %e, "memory context unavailable, continuing without it");
                String::new()
            }
        };

        let history = self.window(history);
        let messages = self.build_messages(&context, &history, user_text);

        let request = ProviderRequest {
            model: self.model().to_string(),
            messages,
            temperature: Some(self.settings.temperature),
            max_tokens: self.settings.max_tokens,
        };
        let response = self.provider.complete(request).await?;
        let reply = response.content;

        debug!(
            thread_id = %thread,
            model = response.model.as_str(),
            input_tokens = response.usage.map(|u| u.input_tokens),
            output_tokens = response.usage.map(|u| u.output_tokens),
            "LLM reply received"
        );

        let now = chrono::Utc::now().to_rfc3339();
        let turns = [
            Turn {
                role: Role::User,
                content: user_text.to_string(),
                timestamp: now.clone(),
            },
            Turn {
                role: Role::Assistant,
                content: reply.clone(),
                timestamp: now,
            },
        ];
        self.memory.add_turns(thread, &turns).await?;

        let mut updated = history;
        updated.push(ChatMessage::user(user_text));
        updated.push(ChatMessage::assistant(reply.clone()));

        Ok(ChatReply {
            reply,
            history: self.window(&updated),
        })
    }

    /// Fetches the user's knowledge graph and reshapes it for the visualizer.
    pub async fn export_graph(&self, limit: Option<usize>) -> Result<GraphView, MemchatError> {
        let limit = limit.unwrap_or(self.settings.graph_limit);
        let raw = self.memory.graph(&self.settings.user_id, limit).await?;
        let view = memchat_graph::reshape(&raw)?;
        info!(
            nodes = view.nodes.len(),
            edges = view.edges.len(),
            "graph exported"
        );
        Ok(view)
    }

    /// Checks the provider, then the memory service. A failed check is
    /// reported as unhealthy rather than returned.
    pub async fn health(&self) -> Vec<AdapterHealth> {
        vec![
            check_adapter(self.provider.as_ref()).await,
            check_adapter(self.memory.as_ref()).await,
        ]
    }

    /// Configured model, or the provider's default when none is set.
    fn model(&self) -> &str {
        match self.settings.model.trim() {
            "" => self.provider.default_model(),
            model => model,
        }
    }

    /// Last `history_window` user/assistant messages.
    fn window(&self, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let kept: Vec<&ChatMessage> = history
            .iter()
            .filter(|m| matches!(m.role, Role::User | Role::Assistant))
            .collect();
        let skip = kept.len().saturating_sub(self.settings.history_window);
        kept.into_iter().skip(skip).cloned().collect()
    }

    fn build_messages(
        &self,
        context: &str,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(ChatMessage::system(self.settings.system_prompt.as_str()));
        if !context.trim().is_empty() {
            messages.push(ChatMessage::system(format!("{CONTEXT_HEADER}\n{context}")));
        }
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(user_text));
        messages
    }
}
