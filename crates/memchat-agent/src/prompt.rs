// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt resolution.

use tracing::{info, warn};

/// Prompt used when neither a prompt file nor an inline prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.
Use long-term memory from Zep when relevant.
If memory conflicts with the user's latest instruction, follow the latest instruction.";

/// Loads the system prompt following priority: file > inline > default.
///
/// An unreadable or blank file falls through to the next source.
pub async fn load_system_prompt(
    inline_prompt: &Option<String>,
    prompt_file: &Option<String>,
) -> String {
    if let Some(file_path) = prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = file_path, "loaded system prompt from file");
                    return trimmed.to_string();
                }
            }
            Err(e) => {
                warn!(
                    path = file_path,
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(prompt) = inline_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.clone();
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn file_wins_over_inline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  From file.  ").unwrap();
        let path = Some(file.path().display().to_string());

        let prompt = load_system_prompt(&Some("Inline.".into()), &path).await;
        assert_eq!(prompt, "From file.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let prompt =
            load_system_prompt(&Some("Inline.".into()), &Some("/nonexistent/prompt.md".into()))
                .await;
        assert_eq!(prompt, "Inline.");
    }

    #[tokio::test]
    async fn default_when_nothing_configured() {
        let prompt = load_system_prompt(&None, &None).await;
        assert_eq!(prompt, DEFAULT_SYSTEM_PROMPT);
    }
}
