//! Heuristic answer extraction from arbitrary JSON.
//!
//! Gateways disagree on where the answer lives, so a result is run through a
//! fixed chain of matchers and the first hit wins. When nothing matches the
//! whole value is pretty-printed instead; extraction never fails.

use serde_json::Value;

/// Keys that may hold the answer, in priority order.
pub const TEXT_FIELDS: [&str; 7] = [
    "text", "response", "answer", "result", "output", "message", "content",
];

/// Where the answer text was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A non-empty string under one of [`TEXT_FIELDS`].
    Field { key: &'static str, text: String },
    /// `content[0].text`, the MCP tool-result layout.
    ContentBlock(String),
    /// Nothing recognizable; the pretty-printed value.
    RawJson(String),
}

impl Extraction {
    pub fn text(&self) -> &str {
        match self {
            Extraction::Field { text, .. } => text,
            Extraction::ContentBlock(text) | Extraction::RawJson(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Extraction::Field { text, .. } => text,
            Extraction::ContentBlock(text) | Extraction::RawJson(text) => text,
        }
    }
}

type Matcher = fn(&Value) -> Option<Extraction>;

const MATCHERS: [Matcher; 2] = [match_text_field, match_content_block];

/// Runs the matcher chain over `value`
pub fn extract(value: &Value) -> Extraction {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(value))
        .unwrap_or_else(|| raw_json(value))
}

/// Shorthand for `extract(value).into_text()`
pub fn extract_text(value: &Value) -> String {
    extract(value).into_text()
}

fn match_text_field(value: &Value) -> Option<Extraction> {
    let object = value.as_object()?;
    TEXT_FIELDS.iter().find_map(|&key| match object.get(key) {
        Some(Value::String(text)) if !text.is_empty() => Some(Extraction::Field {
            key,
            text: text.clone(),
        }),
        _ => None,
    })
}

fn match_content_block(value: &Value) -> Option<Extraction> {
    let first = value.get("content")?.as_array()?.first()?;
    let text = first.as_object()?.get("text")?.as_str()?;
    Some(Extraction::ContentBlock(text.to_string()))
}

fn raw_json(value: &Value) -> Extraction {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    Extraction::RawJson(pretty)
}
