// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splits long message bodies to fit Zep's per-message size limit.

/// Splits `text` into chunks of at most `max_chars` characters.
///
/// Text that fits is returned whole. Longer text is split on blank-line
/// paragraph breaks and paragraphs are packed greedily; a paragraph longer
/// than the limit is hard-split. Blank paragraphs are dropped. Always returns
/// at least one chunk, so empty input yields `[""]`.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        if paragraph.trim().is_empty() {
            continue;
        }

        if !current.is_empty() {
            let candidate = format!("{current}\n\n{paragraph}");
            let candidate = candidate.trim();
            if candidate.chars().count() <= max_chars {
                current = candidate.to_string();
                continue;
            }
            parts.push(std::mem::take(&mut current));
        } else if paragraph.chars().count() <= max_chars {
            current = paragraph.to_string();
            continue;
        }

        let mut rest = paragraph;
        while rest.chars().count() > max_chars {
            let split_at = rest
                .char_indices()
                .nth(max_chars)
                .map_or(rest.len(), |(i, _)| i);
            parts.push(rest[..split_at].to_string());
            rest = &rest[split_at..];
        }
        current = rest.to_string();
    }

    if !current.is_empty() {
        parts.push(current);
    }
    if parts.is_empty() {
        parts.push(String::new());
    }
    parts
}
