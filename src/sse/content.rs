//! Content decoding for data payloads.
//!
//! Backends wrap the same logical text delta in different JSON shapes.
//! Decoding classifies a payload into one known shape, checked in a fixed
//! order because some payloads carry more than one of them at different
//! nesting levels.

use serde_json::Value;

/// Known payload shapes, in order of preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    /// Not valid JSON; the raw payload is the text
    PlainText(String),
    /// A JSON string literal
    JsonString(String),
    /// `{"content": "..."}`
    Content(String),
    /// `{"choices": [{"delta": {"content": "..."}}]}`
    ChoiceDelta(String),
    /// `{"delta": {"content": "..."}}`
    Delta(String),
    /// Valid JSON without any known content field
    Unrecognized,
}

impl PayloadShape {
    /// Classify a raw payload.
    ///
    /// Object fields only match when they hold a non-empty string; an
    /// empty or non-string `content` falls through to the nested shapes.
    pub fn decode(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return PayloadShape::PlainText(raw.to_string()),
        };

        if let Value::String(text) = value {
            return PayloadShape::JsonString(text);
        }
        if let Some(text) = non_empty_str(value.get("content")) {
            return PayloadShape::Content(text);
        }
        if let Some(text) = non_empty_str(value.pointer("/choices/0/delta/content")) {
            return PayloadShape::ChoiceDelta(text);
        }
        if let Some(text) = non_empty_str(value.pointer("/delta/content")) {
            return PayloadShape::Delta(text);
        }
        PayloadShape::Unrecognized
    }

    /// The decoded fragment; empty for [`PayloadShape::Unrecognized`].
    pub fn text(&self) -> &str {
        match self {
            PayloadShape::PlainText(text)
            | PayloadShape::JsonString(text)
            | PayloadShape::Content(text)
            | PayloadShape::ChoiceDelta(text)
            | PayloadShape::Delta(text) => text,
            PayloadShape::Unrecognized => "",
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PayloadShape::PlainText(_) => "plain_text",
            PayloadShape::JsonString(_) => "json_string",
            PayloadShape::Content(_) => "content",
            PayloadShape::ChoiceDelta(_) => "choice_delta",
            PayloadShape::Delta(_) => "delta",
            PayloadShape::Unrecognized => "unrecognized",
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
