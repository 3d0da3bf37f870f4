//! Parsing of AI response bodies into annotations.
//!
//! Two layers:
//! - [`extract_json_array`] finds the annotation array in a body. Structural
//!   failures (no JSON, wrong top-level shape) reject the whole payload.
//! - [`parse_entry`] turns one array element into an [`Annotation`]. An entry
//!   that is not an object, or whose `original_text` / `suggested_text` is
//!   missing or blank after trimming, yields `None` and is skipped.
use serde_json::{Map, Value};

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::metadata::{resolve_annotation_id, sanitize_display_string};
use crate::types::{Annotation, AnnotationSource, ColorCode, Severity};

/// Locate and parse the JSON array carried by `body`.
///
/// The trimmed body is parsed first. When that fails, the contents of each
/// markdown code fence are tried, then every `[` in the body in turn; an
/// array holding at least one object is preferred over a bare one, so
/// bracketed prose such as `[draft]` or `[1]` does not shadow the payload.
pub fn extract_json_array(body: &str) -> Result<Vec<Value>, IngestError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(IngestError::EmptyPayload);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => return Ok(items),
        Ok(other) => return Err(IngestError::NotAnArray(value_kind(&other).to_string())),
        Err(_) => {}
    }

    for block in fenced_blocks(trimmed) {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(block.trim()) {
            return Ok(items);
        }
    }

    let mut fallback = None;
    let mut last_error = None;
    for (open, _) in trimmed.match_indices('[') {
        match leading_value(&trimmed[open..]) {
            Ok(Value::Array(items)) if items.iter().any(Value::is_object) => return Ok(items),
            Ok(Value::Array(items)) => {
                fallback.get_or_insert(items);
            }
            Ok(_) => {}
            Err(err) => last_error = Some(err),
        }
    }

    match (fallback, last_error) {
        (Some(items), _) => Ok(items),
        (None, Some(err)) => Err(IngestError::MalformedJson(err.to_string())),
        (None, None) => Err(IngestError::MalformedJson(
            "no JSON array found in payload".to_string(),
        )),
    }
}

/// Bodies of the ```` ``` ```` fences in `text`, info string removed.
fn fenced_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split("```")
        .skip(1)
        .step_by(2)
        .map(|block| block.split_once('\n').map_or(block, |(_, rest)| rest))
}

/// Parse the first JSON value at the start of `text`, ignoring whatever
/// follows it.
fn leading_value(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .unwrap_or_else(|| serde_json::from_str(text))
}

/// Convert one array element. `index` is the element's position in the
/// array and feeds id derivation.
pub fn parse_entry(
    value: &Value,
    index: usize,
    source: AnnotationSource,
    cfg: &IngestConfig,
) -> Option<Annotation> {
    let object = value.as_object()?;

    let original_text = required_text(object, "original_text")?;
    let suggested_text = required_text(object, "suggested_text")?;

    let severity = match source {
        AnnotationSource::ColorCoded => Some(
            string_field(object, "color_code")
                .map(|code| ColorCode::parse(&code))
                .unwrap_or(ColorCode::Other)
                .severity(),
        ),
        AnnotationSource::Suggestions | AnnotationSource::AssistantReply => {
            string_field(object, "severity").and_then(|label| Severity::parse(&label))
        }
    };

    let id = resolve_annotation_id(
        cfg,
        id_field(object),
        index,
        &original_text,
        &suggested_text,
    );

    Some(Annotation {
        id,
        reason: sanitize_display_string(string_field(object, "reason"), cfg.strip_control_chars),
        legal_reference: sanitize_display_string(
            string_field(object, "legal_reference"),
            cfg.strip_control_chars,
        ),
        severity,
        original_text,
        suggested_text,
    })
}

/// Text fields are kept verbatim; only their emptiness is judged after
/// trimming.
fn required_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    let text = object.get(key)?.as_str()?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

/// Upstream ids arrive as strings or integers.
fn id_field(object: &Map<String, Value>) -> Option<String> {
    match object.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
