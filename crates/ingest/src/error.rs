//! Error types produced by the ingest crate.
//!
//! Only whole-payload failures are errors. An individual entry that is
//! missing its text fields is skipped and counted in
//! [`AnnotationBatch::dropped`](crate::AnnotationBatch::dropped); it never
//! aborts the batch.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | [`PayloadTooLarge`](IngestError::PayloadTooLarge) | body exceeds `max_payload_bytes` |
//! | [`EmptyPayload`](IngestError::EmptyPayload) | body blank after trimming |
//! | [`MalformedJson`](IngestError::MalformedJson) | no parseable JSON array in the body |
//! | [`NotAnArray`](IngestError::NotAnArray) | valid JSON, wrong top-level shape |
//! | [`TooManyAnnotations`](IngestError::TooManyAnnotations) | entry count exceeds `max_annotations` |
//! | [`InvalidConfig`](IngestError::InvalidConfig) | config failed validation |
use thiserror::Error;

/// Errors that reject a whole annotation payload.
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::NotAnArray("object".into());
/// assert_eq!(err.to_string(), "expected a JSON array of annotations, found object");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    #[error("payload exceeds size limit: {0}")]
    PayloadTooLarge(String),

    #[error("annotation payload is empty")]
    EmptyPayload,

    #[error("malformed annotation payload: {0}")]
    MalformedJson(String),

    /// The body parsed as JSON but the top level is not an array.
    #[error("expected a JSON array of annotations, found {0}")]
    NotAnArray(String),

    #[error("payload carries {count} annotations, limit is {limit}")]
    TooManyAnnotations { count: usize, limit: usize },

    #[error("invalid ingest config: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    /// True for failures caused by the upstream payload rather than local
    /// configuration.
    pub fn is_payload_error(&self) -> bool {
        !matches!(self, IngestError::InvalidConfig(_))
    }
}
