// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level memchat configuration.
///
/// Every section is optional and defaults to working values; only the two
/// API keys have no usable default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemchatConfig {
    /// Assistant behaviour settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// OpenAI chat-completions settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Zep memory service settings.
    #[serde(default)]
    pub zep: ZepConfig,

    /// Web UI server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Assistant behaviour configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system prompt. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a markdown file containing the system prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Number of recent messages (user and assistant) replayed to the LLM.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Sampling temperature for replies.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            history_window: default_history_window(),
            temperature: default_temperature(),
        }
    }
}

fn default_agent_name() -> String {
    "memchat".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_window() -> usize {
    6
}

fn default_temperature() -> f32 {
    0.2
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` requires the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat model identifier.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API base URL, without the `/chat/completions` suffix.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Optional cap on generated tokens.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds.
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            max_tokens: None,
            timeout_secs: default_openai_timeout(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_timeout() -> u64 {
    120
}

/// Zep Cloud memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZepConfig {
    /// Zep API key. `None` requires the `ZEP_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_zep_base_url")]
    pub base_url: String,

    /// User that owns threads and the knowledge graph.
    #[serde(default = "default_zep_user_id")]
    pub user_id: String,

    /// Thread to resume. A fresh thread is created when unset or unknown.
    #[serde(default)]
    pub thread_id: Option<String>,

    /// Longest message body sent in one piece; longer text is chunked.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Records fetched per graph half.
    #[serde(default = "default_graph_limit")]
    pub graph_limit: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_zep_timeout")]
    pub timeout_secs: u64,
}

impl Default for ZepConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_zep_base_url(),
            user_id: default_zep_user_id(),
            thread_id: None,
            max_message_chars: default_max_message_chars(),
            graph_limit: default_graph_limit(),
            timeout_secs: default_zep_timeout(),
        }
    }
}

fn default_zep_base_url() -> String {
    "https://api.getzep.com/api/v2".to_string()
}

fn default_zep_user_id() -> String {
    "vk_user".to_string()
}

fn default_max_message_chars() -> usize {
    2400
}

fn default_graph_limit() -> usize {
    50
}

fn default_zep_timeout() -> u64 {
    60
}

/// Web UI server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8501
}
