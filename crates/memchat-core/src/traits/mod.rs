// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every adapter extends the [`PluginAdapter`] base trait and uses
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod memory;
pub mod provider;

pub use adapter::PluginAdapter;
pub use memory::MemoryAdapter;
pub use provider::ProviderAdapter;
