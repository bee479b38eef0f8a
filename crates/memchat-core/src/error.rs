// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for memchat.

use thiserror::Error;

/// The primary error type used across all memchat adapters and operations.
#[derive(Debug, Error)]
pub enum MemchatError {
    /// Configuration errors (missing API keys, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM provider errors (API failure, malformed completion).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Memory service errors (API failure, malformed response).
    #[error("memory error: {message}")]
    Memory {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A resource (user, thread) does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// Graph payload failed validation during reshaping.
    #[error("invalid graph data: {0}")]
    Graph(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MemchatError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        MemchatError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a memory error without an underlying source.
    pub fn memory(message: impl Into<String>) -> Self {
        MemchatError::Memory {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the error reports a missing upstream resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MemchatError::NotFound(_))
    }
}
