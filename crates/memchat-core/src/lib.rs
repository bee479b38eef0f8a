// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for memchat.
//!
//! Provides the trait definitions, error type, and common types used
//! throughout the workspace. The OpenAI and Zep adapters implement the
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MemchatError;
pub use types::{
    AdapterType, ChatMessage, GraphScope, HealthStatus, ProviderRequest, ProviderResponse,
    RawGraph, Role, ThreadId, TokenUsage, Turn,
};

pub use traits::{MemoryAdapter, PluginAdapter, ProviderAdapter};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn memchat_error_variants_render() {
        let cases = [
            (MemchatError::Config("missing key".into()), "configuration error: missing key"),
            (MemchatError::provider("bad model"), "provider error: bad model"),
            (MemchatError::memory("503"), "memory error: 503"),
            (MemchatError::NotFound("user u1".into()), "not found: user u1"),
            (MemchatError::Graph("nodes[0]".into()), "invalid graph data: nodes[0]"),
            (MemchatError::Internal("boom".into()), "internal error: boom"),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
        let timeout = MemchatError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert!(timeout.to_string().contains("30s"));
    }

    #[test]
    fn not_found_is_detectable() {
        assert!(MemchatError::NotFound("thread".into()).is_not_found());
        assert!(!MemchatError::memory("thread").is_not_found());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn chat_message_serializes_as_openai_shape() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn graph_scope_wire_names() {
        assert_eq!(GraphScope::Nodes.to_string(), "nodes");
        let json = serde_json::to_string(&GraphScope::Edges).unwrap();
        assert_eq!(json, "\"edges\"");
    }

    #[test]
    fn thread_id_is_transparent() {
        let id = ThreadId::from("t-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"t-1\"");
        assert_eq!(id.to_string(), "t-1");
    }

    #[test]
    fn raw_graph_defaults_to_null_halves() {
        let raw: RawGraph = serde_json::from_str("{}").unwrap();
        assert!(raw.nodes.is_null());
        assert!(raw.edges.is_null());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_memory_adapter<T: MemoryAdapter>() {}
    }
}
