// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for memchat.
//!
//! - [`MockProvider`] - LLM provider with queued responses that records requests
//! - [`MockMemory`] - in-process stand-in for the hosted memory service

pub mod mock_memory;
pub mod mock_provider;

pub use mock_memory::MockMemory;
pub use mock_provider::MockProvider;
