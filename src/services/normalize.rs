use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::models::ShowRecord;

const DEFAULT_TITLE: &str = "Unknown Title";
const DEFAULT_YEAR: &str = "N/A";
const DEFAULT_SUMMARY: &str = "No summary available.";
const DEFAULT_GENRE: &str = "N/A";

/// Maps raw parsed objects into full-shaped [`ShowRecord`]s
///
/// Total over any input: every field is treated as optional, type-checked,
/// and defaulted. Nothing here can fail; garbage in a field just means the
/// documented default comes out.
///
/// `context` labels the source (catalog name or "all") and is folded into
/// each synthesized id.
pub fn normalize(items: &[Value], context: &str) -> Vec<ShowRecord> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| ShowRecord {
            id: synthesize_id(context, index),
            title: text_field(item, "title", DEFAULT_TITLE),
            year: text_field(item, "year", DEFAULT_YEAR),
            critic_score: score_field(item, "criticScore"),
            audience_score: score_field(item, "audienceScore"),
            summary: text_field(item, "summary", DEFAULT_SUMMARY),
            watch_link: optional_field(item, "serviceLink"),
            review_link: optional_field(item, "rtLink"),
            genre: text_field(item, "genre", DEFAULT_GENRE),
            source_catalog: optional_field(item, "service"),
        })
        .collect()
}

/// Synthesizes a list-rendering key from context, position, time, and a
/// random suffix
///
/// Practically unique within one call even when titles collide; not a
/// persisted identity.
fn synthesize_id(context: &str, index: usize) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!(
        "{}-{}-{}-{}",
        context,
        index,
        Utc::now().timestamp_millis(),
        suffix
    )
}

/// String-ish field: accepts strings and numbers, defaults everything else
fn text_field(item: &Value, field: &str, default: &str) -> String {
    match &item[field] {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Score field: absent unless the raw value is numeric, clamped into [0, 100]
fn score_field(item: &Value, field: &str) -> Option<u8> {
    item[field]
        .as_f64()
        .map(|score| score.clamp(0.0, 100.0).round() as u8)
}

/// Optional string field: absent unless a non-empty string
fn optional_field(item: &Value, field: &str) -> Option<String> {
    item[field]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
