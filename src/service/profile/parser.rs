//! Recovers the JSON object from a raw model response
//!
//! Models are told to answer with bare JSON but frequently wrap it in a fenced
//! code block or pad it with whitespace. Those two cases are unwrapped; anything
//! else (prose around the JSON, truncated output) is rejected rather than repaired.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// One fenced block spanning the whole response, optional language tag on the opening fence
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+\-]*[ \t]*\r?\n?(.*?)\r?\n?```\z")
        .expect("fenced block pattern is valid")
});

/// Error type for response parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model response is empty")]
    Empty,

    #[error("model response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model response is JSON but not an object (found {0})")]
    NotAnObject(&'static str),
}

/// Extract the JSON object from a model response
pub fn extract_json(response: &str) -> Result<Map<String, Value>, ParseError> {
    let candidate = unwrap_fence(response.trim());
    if candidate.is_empty() {
        return Err(ParseError::Empty);
    }

    match serde_json::from_str::<Value>(candidate)? {
        Value::Object(object) => Ok(object),
        other => Err(ParseError::NotAnObject(json_kind(&other))),
    }
}

/// Inner region of a fenced block, or the input unchanged
fn unwrap_fence(text: &str) -> &str {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str().trim())
        .unwrap_or(text)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
