//! JSON extraction for model replies.
//!
//! Local models in particular like to wrap the requested object in markdown
//! fences or a sentence of prose. Extraction handles nested braces and
//! string escaping.

use crate::commit::CommitMessage;
use crate::error::BackendError;

/// Longest slice of a bad reply quoted back in the error.
const PREVIEW_CHARS: usize = 200;

/// Pull the JSON object out of a reply.
///
/// Looks for, in order: a fenced code block (with or without a language tag)
/// whose content is an object, then the first parseable `{...}` anywhere in
/// the text. Falls back to the trimmed reply so the caller's parse error
/// shows what the model actually said.
pub fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    fenced_object(trimmed)
        .or_else(|| embedded_object(trimmed))
        .unwrap_or(trimmed)
        .to_string()
}

/// Parse a model reply into a [`CommitMessage`].
pub fn parse_commit_message(response: &str) -> Result<CommitMessage, BackendError> {
    if let Ok(message) = serde_json::from_str::<CommitMessage>(response) {
        return Ok(message);
    }

    serde_json::from_str(&extract_json(response)).map_err(|e| {
        let preview: String = response.chars().take(PREVIEW_CHARS).collect();
        BackendError::InvalidJson(format!("{e}. Response: {preview}"))
    })
}

/// Content of the first ```` ``` ```` block, if it holds an object.
fn fenced_object(text: &str) -> Option<&str> {
    const FENCE: &str = "```";

    let open = text.find(FENCE)? + FENCE.len();
    let after_open = &text[open..];
    // Skip a language tag such as `json`.
    let body_start = after_open.len()
        - after_open
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
            .len();
    let body = &after_open[body_start..];
    let close = body.find(FENCE)?;

    let inner = body[..close].trim();
    inner.starts_with('{').then_some(inner)
}

/// First balanced `{...}` in `text` that is valid JSON.
fn embedded_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .filter_map(|(start, _)| balanced_object(&text[start..]))
        .find(|candidate| serde_json::from_str::<serde_json::Value>(candidate).is_ok())
}

/// Prefix of `text` (which starts at a `{`) up to its matching `}`.
/// Braces inside string literals do not count.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}
