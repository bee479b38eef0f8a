// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::MemchatConfig;

/// Zep caps graph search results at this many records.
pub const MAX_GRAPH_LIMIT: usize = 50;

/// Zep rejects message bodies longer than this.
pub const MAX_MESSAGE_CHARS: usize = 2500;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &MemchatConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.history_window == 0 {
        fail("agent.history_window must be at least 1".to_string());
    }

    let temperature = config.agent.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        fail(format!(
            "agent.temperature must be between 0 and 2, got {temperature}"
        ));
    }

    for (key, url) in [
        ("openai.base_url", &config.openai.base_url),
        ("zep.base_url", &config.zep.base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            fail(format!("{key} must be an http(s) URL, got `{url}`"));
        }
    }

    if config.zep.user_id.trim().is_empty() {
        fail("zep.user_id must not be empty".to_string());
    }

    if let Some(thread) = &config.zep.thread_id
        && thread.trim().is_empty()
    {
        fail("zep.thread_id must not be blank when set".to_string());
    }

    let limit = config.zep.graph_limit;
    if limit == 0 || limit > MAX_GRAPH_LIMIT {
        fail(format!(
            "zep.graph_limit must be between 1 and {MAX_GRAPH_LIMIT}, got {limit}"
        ));
    }

    let chars = config.zep.max_message_chars;
    if chars == 0 || chars > MAX_MESSAGE_CHARS {
        fail(format!(
            "zep.max_message_chars must be between 1 and {MAX_MESSAGE_CHARS}, got {chars}"
        ));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
