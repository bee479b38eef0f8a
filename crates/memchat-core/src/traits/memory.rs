// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory adapter trait for hosted long-term memory services.

use async_trait::async_trait;

use crate::error::MemchatError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{RawGraph, ThreadId, Turn};

/// Adapter for a hosted memory service that stores turns per thread and
/// derives a knowledge graph per user.
///
/// Implementations hold no state between calls beyond connection pooling.
#[async_trait]
pub trait MemoryAdapter: PluginAdapter {
    /// Makes sure the user exists upstream, creating it when missing.
    async fn ensure_user(&self, user_id: &str) -> Result<(), MemchatError>;

    /// Returns whether the thread exists upstream.
    async fn thread_exists(&self, thread: &ThreadId) -> Result<bool, MemchatError>;

    /// Creates a thread owned by `user_id`.
    ///
    /// Fails with [`MemchatError::NotFound`] when the user does not exist.
    async fn create_thread(&self, thread: &ThreadId, user_id: &str) -> Result<(), MemchatError>;

    /// Appends turns to the thread, in order.
    async fn add_turns(&self, thread: &ThreadId, turns: &[Turn]) -> Result<(), MemchatError>;

    /// Returns the memory context relevant to the thread's latest messages.
    ///
    /// Empty when the service has nothing to offer.
    async fn context(&self, thread: &ThreadId) -> Result<String, MemchatError>;

    /// Fetches the user's knowledge graph, at most `limit` records per half
    /// where the service caps results.
    async fn graph(&self, user_id: &str, limit: usize) -> Result<RawGraph, MemchatError>;
}
