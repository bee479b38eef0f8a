// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web surface for memchat.
//!
//! Serves a single page with a chat column and a knowledge-graph column,
//! plus the JSON endpoints the page calls. The server holds no
//! conversation state: the page keeps the thread id and the short history
//! and sends them with every chat request.

pub mod handlers;
pub mod server;
pub mod ui;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
