// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the memchat configuration system.

use memchat_config::diagnostic::ConfigError;
use memchat_config::model::MemchatConfig;
use memchat_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with every known section deserializes successfully.
#[test]
fn valid_toml_deserializes_into_memchat_config() {
    let toml = r#"
[agent]
name = "helper"
log_level = "debug"
system_prompt = "Be brief."
history_window = 4
temperature = 0.5

[openai]
api_key = "sk-123"
model = "gpt-4.1-mini"
max_tokens = 512

[zep]
api_key = "z-123"
user_id = "alice"
thread_id = "t-1"
graph_limit = 25

[gateway]
host = "0.0.0.0"
port = 9000
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "helper");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.system_prompt.as_deref(), Some("Be brief."));
    assert_eq!(config.agent.history_window, 4);
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-123"));
    assert_eq!(config.openai.model, "gpt-4.1-mini");
    assert_eq!(config.openai.max_tokens, Some(512));
    assert_eq!(config.zep.user_id, "alice");
    assert_eq!(config.zep.thread_id.as_deref(), Some("t-1"));
    assert_eq!(config.zep.graph_limit, 25);
    assert_eq!(config.zep.max_message_chars, 2400);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9000);
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").unwrap();
    let defaults = MemchatConfig::default();
    assert_eq!(config.openai.model, defaults.openai.model);
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
    assert_eq!(config.zep.base_url, "https://api.getzep.com/api/v2");
    assert_eq!(config.zep.user_id, "vk_user");
    assert!(config.zep.thread_id.is_none());
    assert_eq!(config.gateway.port, 8501);
}

/// Unknown keys are rejected with a suggestion for the closest valid key.
#[test]
fn unknown_key_in_zep_suggests_user_id() {
    let toml = r#"
[zep]
usr_id = "alice"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "usr_id" && suggestion.as_deref() == Some("user_id")
        )
    });
    assert!(found, "expected UnknownKey for usr_id, got: {errors:?}");
}

/// Unknown keys list the valid keys of their section.
#[test]
fn unknown_key_lists_valid_keys() {
    let toml = "[openai]\nmodle = \"x\"\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    match &errors[0] {
        ConfigError::UnknownKey {
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(suggestion.as_deref(), Some("model"));
            assert!(valid_keys.contains("base_url"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level sections are rejected.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telegram]\nbot_token = \"x\"\n").unwrap_err();
    assert!(!errors.is_empty());
}

/// Wrong value types produce a typed diagnostic.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[gateway]\nport = \"eighty\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_load_and_validate() {
    let errors = load_and_validate_str("[zep]\ngraph_limit = 500\n").unwrap_err();
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("graph_limit")
    )));
}
