//! Core data model for annotations and ingest envelopes.
//!
//! ```text
//! RawAnnotationPayload
//! ├── source: AnnotationSource
//! └── body: String            (JSON array, possibly wrapped in prose)
//!
//!         ↓ ingest()
//!
//! AnnotationBatch
//! ├── batch_id: Uuid          (v4)
//! ├── received_at: DateTime<Utc>
//! ├── source: AnnotationSource
//! ├── annotations: Vec<Annotation>
//! └── dropped: usize          (malformed entries skipped)
//! ```
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, caller-stable identifier for an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AnnotationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Three-tier importance classification driving highlight color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    /// Parse a severity label. Only the exact lowercase labels `high`,
    /// `medium` and `low` are accepted; anything else is discarded.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Traffic-light code used by the color-coded upstream response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Red,
    Yellow,
    Other,
}

impl ColorCode {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "red" => ColorCode::Red,
            "yellow" => ColorCode::Yellow,
            _ => ColorCode::Other,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ColorCode::Red => Severity::High,
            ColorCode::Yellow => Severity::Medium,
            ColorCode::Other => Severity::Low,
        }
    }
}

/// An AI-produced suggestion targeting an exact snippet of document text.
///
/// Immutable once received. `original_text` is kept exactly as supplied
/// (no trimming) since it is what gets anchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub original_text: String,
    pub suggested_text: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub legal_reference: Option<String>,
}

impl Annotation {
    pub fn new(
        id: impl Into<AnnotationId>,
        original_text: impl Into<String>,
        suggested_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            original_text: original_text.into(),
            suggested_text: suggested_text.into(),
            reason: None,
            severity: None,
            legal_reference: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_legal_reference(mut self, reference: impl Into<String>) -> Self {
        self.legal_reference = Some(reference.into());
        self
    }

    /// Severity with the medium default applied.
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }

    /// False for empty or whitespace-only snippets, which can never anchor.
    pub fn is_matchable(&self) -> bool {
        !self.original_text.trim().is_empty()
    }

    /// True when applying would actually change the text: the suggestion is
    /// non-empty and differs from the original after trimming.
    pub fn has_actionable_suggestion(&self) -> bool {
        let suggested = self.suggested_text.trim();
        !suggested.is_empty() && suggested != self.original_text.trim()
    }
}

/// Which upstream path produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationSource {
    /// Text-analysis endpoint returning `severity` labels.
    Suggestions,
    /// Review endpoint returning `color_code` labels.
    ColorCoded,
    /// Assistant chat reply carrying a suggestions array inside prose.
    AssistantReply,
}

/// Raw response body as received from the AI service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnnotationPayload {
    pub source: AnnotationSource,
    pub body: String,
}

impl RawAnnotationPayload {
    pub fn new(source: AnnotationSource, body: impl Into<String>) -> Self {
        Self {
            source,
            body: body.into(),
        }
    }
}

/// Validated annotations from one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBatch {
    pub batch_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub source: AnnotationSource,
    pub annotations: Vec<Annotation>,
    /// Entries skipped because required text fields were missing or blank.
    pub dropped: usize,
}
