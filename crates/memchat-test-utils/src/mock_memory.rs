// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process memory adapter that behaves like the hosted service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use memchat_core::{
    AdapterType, HealthStatus, MemchatError, MemoryAdapter, PluginAdapter, RawGraph, ThreadId,
    Turn,
};

#[derive(Default)]
struct State {
    users: HashSet<String>,
    threads: HashMap<ThreadId, Vec<Turn>>,
    calls: Vec<String>,
    context: String,
    fail_context: bool,
    reject_next_create: bool,
    graph: RawGraph,
    fail_graph: bool,
    health: Option<HealthStatus>,
}

/// A mock memory service.
///
/// Threads require an existing user, like the real service. Every trait call
/// is logged as `"<operation>:<argument>"` so tests can assert on ordering.
#[derive(Clone, Default)]
pub struct MockMemory {
    state: Arc<Mutex<State>>,
}

impl MockMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user_id: &str) {
        self.state.lock().await.users.insert(user_id.to_string());
    }

    /// Register an existing thread with no turns.
    pub async fn add_thread(&self, thread: &ThreadId) {
        self.state
            .lock()
            .await
            .threads
            .insert(thread.clone(), Vec::new());
    }

    /// Context returned by [`MemoryAdapter::context`].
    pub async fn set_context(&self, context: impl Into<String>) {
        self.state.lock().await.context = context.into();
    }

    /// Make [`MemoryAdapter::context`] fail.
    pub async fn fail_context(&self) {
        self.state.lock().await.fail_context = true;
    }

    /// Make the next `create_thread` fail with `NotFound` even if the user exists.
    pub async fn reject_next_create(&self) {
        self.state.lock().await.reject_next_create = true;
    }

    pub async fn set_graph(&self, graph: RawGraph) {
        self.state.lock().await.graph = graph;
    }

    /// Make [`MemoryAdapter::graph`] fail.
    pub async fn fail_graph(&self) {
        self.state.lock().await.fail_graph = true;
    }

    /// Status returned by [`PluginAdapter::health_check`]; healthy by default.
    pub async fn set_health(&self, status: HealthStatus) {
        self.state.lock().await.health = Some(status);
    }

    /// Turns written to `thread`, oldest first.
    pub async fn turns(&self, thread: &ThreadId) -> Vec<Turn> {
        self.state
            .lock()
            .await
            .threads
            .get(thread)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_user(&self, user_id: &str) -> bool {
        self.state.lock().await.users.contains(user_id)
    }

    pub async fn thread_count(&self) -> usize {
        self.state.lock().await.threads.len()
    }

    /// Calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockMemory {
    fn name(&self) -> &str {
        "mock-memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Memory
    }

    async fn health_check(&self) -> Result<HealthStatus, MemchatError> {
        let state = self.state.lock().await;
        Ok(state.health.clone().unwrap_or(HealthStatus::Healthy))
    }
}

#[async_trait]
impl MemoryAdapter for MockMemory {
    async fn ensure_user(&self, user_id: &str) -> Result<(), MemchatError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("ensure_user:{user_id}"));
        state.users.insert(user_id.to_string());
        Ok(())
    }

    async fn thread_exists(&self, thread: &ThreadId) -> Result<bool, MemchatError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("thread_exists:{thread}"));
        Ok(state.threads.contains_key(thread))
    }

    async fn create_thread(&self, thread: &ThreadId, user_id: &str) -> Result<(), MemchatError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("create_thread:{thread}"));
        if std::mem::take(&mut state.reject_next_create) || !state.users.contains(user_id) {
            return Err(MemchatError::NotFound(format!("user {user_id}")));
        }
        state.threads.insert(thread.clone(), Vec::new());
        Ok(())
    }

    async fn add_turns(&self, thread: &ThreadId, turns: &[Turn]) -> Result<(), MemchatError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("add_turns:{thread}"));
        let stored = state
            .threads
            .get_mut(thread)
            .ok_or_else(|| MemchatError::NotFound(format!("thread {thread}")))?;
        stored.extend_from_slice(turns);
        Ok(())
    }

    async fn context(&self, thread: &ThreadId) -> Result<String, MemchatError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("context:{thread}"));
        if state.fail_context {
            return Err(MemchatError::memory("context unavailable"));
        }
        Ok(state.context.clone())
    }

    async fn graph(&self, user_id: &str, _limit: usize) -> Result<RawGraph, MemchatError> {
        let mut state = self.state.lock().await;
        state.calls.push(format!("graph:{user_id}"));
        if state.fail_graph {
            return Err(MemchatError::memory("graph unavailable"));
        }
        Ok(state.graph.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_thread_requires_user() {
        let memory = MockMemory::new();
        let thread = ThreadId::from("t1");
        let err = memory.create_thread(&thread, "alice").await.unwrap_err();
        assert!(err.is_not_found());

        memory.ensure_user("alice").await.unwrap();
        memory.create_thread(&thread, "alice").await.unwrap();
        assert!(memory.thread_exists(&thread).await.unwrap());
    }

    #[tokio::test]
    async fn rejected_create_succeeds_on_retry() {
        let memory = MockMemory::new();
        memory.add_user("alice").await;
        memory.reject_next_create().await;
        let thread = ThreadId::from("t1");
        assert!(memory.create_thread(&thread, "alice").await.is_err());
        assert!(memory.create_thread(&thread, "alice").await.is_ok());
    }
}
