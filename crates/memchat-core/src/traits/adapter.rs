// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and health shared by the provider and memory adapters.

use async_trait::async_trait;

use crate::error::MemchatError;
use crate::types::{AdapterType, HealthStatus};

/// Common surface of every hosted-service adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short service name used in logs and `/health` (`"openai"`, `"zep"`).
    fn name(&self) -> &str;

    fn adapter_type(&self) -> AdapterType;

    /// Reports whether the adapter can serve requests. Must not spend
    /// provider tokens or write upstream.
    async fn health_check(&self) -> Result<HealthStatus, MemchatError>;
}
