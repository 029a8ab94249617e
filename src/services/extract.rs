use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Isolates and parses a JSON array from free-form model text
///
/// The model is not contractually bound to a schema: it emits prose plus an
/// embedded array, and occasionally wraps the array in an object. The
/// fallback chain, in order:
/// 1. A fenced block tagged `json` (most reliable when present).
/// 2. The substring between the first `[` and the last `]`, inclusive.
/// 3. If the parsed value is an object, the first top-level property whose
///    value is an array.
pub fn extract(text: &str) -> AppResult<Vec<Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyResponse);
    }

    let candidate = fenced_json_block(trimmed)
        .or_else(|| bracketed_slice(trimmed))
        .unwrap_or(trimmed);

    let parsed: Value = serde_json::from_str(candidate).map_err(|e| {
        tracing::error!(
            snippet = %snippet(candidate),
            error = %e,
            "Failed to parse model response JSON"
        );
        AppError::MalformedPayload(e.to_string())
    })?;

    match parsed {
        Value::Array(items) => Ok(items),
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, value)| match value {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or(AppError::UnexpectedShape),
        _ => Err(AppError::UnexpectedShape),
    }
}

/// Returns the interior of the first ```json fenced block, if one is closed
fn fenced_json_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Returns the substring spanning the first `[` through the last `]`
fn bracketed_slice(text: &str) -> Option<&str> {
    let first = text.find('[')?;
    let last = text.rfind(']')?;
    if last < first {
        return None;
    }
    Some(&text[first..=last])
}

fn snippet(text: &str) -> String {
    let mut s: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        s.push_str("...");
    }
    s
}
