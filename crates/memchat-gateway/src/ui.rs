// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The embedded chat and graph page.

use axum::response::Html;

/// Single-page UI. Renders the graph with Cytoscape.js.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

/// GET / - serve the page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
