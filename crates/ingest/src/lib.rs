//! Annotext ingest layer.
//!
//! This is where AI suggestions enter the engine. We take a raw response body
//! from the text-analysis service, find the annotation array in it, and hand
//! back validated [`Annotation`]s that the matcher can anchor.
//!
//! ## What we do here
//!
//! - **Find the array** - plain JSON, or JSON wrapped in an assistant's prose
//!   and code fences
//! - **Drop bad entries** - entries missing `original_text` or
//!   `suggested_text` are skipped, never fatal
//! - **Map severity** - `severity` labels or `color_code` traffic lights,
//!   unknown labels fall back to the medium default
//! - **Generate IDs** - entries without an id get a UUIDv5, same entry gives
//!   same id every time
//! - **Enforce limits** - body size and entry count
//!
//! ## Entry points
//!
//! - [`ingest`] returns an [`AnnotationBatch`] or a typed [`IngestError`]
//! - [`try_parse_annotations`] / [`try_parse_color_coded`] are the strict
//!   shortcuts
//! - [`parse_annotations`] / [`parse_color_coded`] fail closed: any
//!   structural problem gives an empty list
//!
//! ## Example
//!
//! ```
//! use ingest::{parse_annotations, Severity};
//!
//! let body = r#"[
//!     {"original_text": "shall be", "suggested_text": "is", "severity": "low"},
//!     {"original_text": "   ", "suggested_text": "dropped"}
//! ]"#;
//! let annotations = parse_annotations(body);
//! assert_eq!(annotations.len(), 1);
//! assert_eq!(annotations[0].effective_severity(), Severity::Low);
//! ```
use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn, Level};
use uuid::Uuid;

mod config;
mod error;
mod metadata;
mod payload;
mod types;

use crate::metadata::derive_annotation_id;

pub use crate::config::{ConfigError, IngestConfig};
pub use crate::error::IngestError;
pub use crate::payload::{extract_json_array, parse_entry};
pub use crate::types::{
    Annotation, AnnotationBatch, AnnotationId, AnnotationSource, ColorCode, RawAnnotationPayload,
    Severity,
};

/// Ingest a raw AI response into a batch of annotations.
pub fn ingest(
    raw: RawAnnotationPayload,
    cfg: &IngestConfig,
) -> Result<AnnotationBatch, IngestError> {
    let start = Instant::now();
    let batch_id = Uuid::new_v4();

    let span = tracing::span!(
        Level::INFO,
        "ingest.ingest",
        batch_id = %batch_id,
        source = ?raw.source,
        body_len = raw.body.len()
    );
    let _guard = span.enter();

    match ingest_inner(batch_id, raw, cfg) {
        Ok(batch) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                accepted = batch.annotations.len(),
                dropped = batch.dropped,
                elapsed_micros,
                "annotations_ingested"
            );
            Ok(batch)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(
                error = %err,
                payload_error = err.is_payload_error(),
                elapsed_micros,
                "ingest_failure"
            );
            Err(err)
        }
    }
}

fn ingest_inner(
    batch_id: Uuid,
    raw: RawAnnotationPayload,
    cfg: &IngestConfig,
) -> Result<AnnotationBatch, IngestError> {
    cfg.validate()
        .map_err(|err| IngestError::InvalidConfig(err.to_string()))?;

    let RawAnnotationPayload { source, body } = raw;

    if let Some(limit) = cfg.max_payload_bytes {
        let len = body.len();
        if len > limit {
            return Err(IngestError::PayloadTooLarge(format!(
                "raw payload size {len} exceeds limit of {limit}"
            )));
        }
    }

    let items = extract_json_array(&body)?;

    if let Some(limit) = cfg.max_annotations {
        if items.len() > limit {
            return Err(IngestError::TooManyAnnotations {
                count: items.len(),
                limit,
            });
        }
    }

    let mut seen = HashSet::with_capacity(items.len());
    let mut annotations = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(mut annotation) = parse_entry(item, index, source, cfg) else {
            continue;
        };
        // Ids key hover and apply, so a repeated upstream id is replaced by
        // the derived one for that entry.
        if !seen.insert(annotation.id.clone()) {
            let derived = derive_annotation_id(
                cfg,
                index,
                &annotation.original_text,
                &annotation.suggested_text,
            );
            warn!(
                annotation_id = %annotation.id,
                replacement = %derived,
                index,
                "duplicate_annotation_id"
            );
            seen.insert(derived.clone());
            annotation.id = derived;
        }
        annotations.push(annotation);
    }
    let dropped = items.len() - annotations.len();

    Ok(AnnotationBatch {
        batch_id,
        received_at: Utc::now(),
        source,
        annotations,
        dropped,
    })
}

/// Strict parse of a `severity`-labelled suggestions array.
pub fn try_parse_annotations(body: &str) -> Result<Vec<Annotation>, IngestError> {
    let raw = RawAnnotationPayload::new(AnnotationSource::Suggestions, body);
    ingest(raw, &IngestConfig::default()).map(|batch| batch.annotations)
}

/// Strict parse of a `color_code`-labelled review array.
pub fn try_parse_color_coded(body: &str) -> Result<Vec<Annotation>, IngestError> {
    let raw = RawAnnotationPayload::new(AnnotationSource::ColorCoded, body);
    ingest(raw, &IngestConfig::default()).map(|batch| batch.annotations)
}

/// Lenient parse: a malformed payload yields no annotations rather than a
/// partial set.
pub fn parse_annotations(body: &str) -> Vec<Annotation> {
    try_parse_annotations(body).unwrap_or_default()
}

/// Lenient counterpart of [`try_parse_color_coded`].
pub fn parse_color_coded(body: &str) -> Vec<Annotation> {
    try_parse_color_coded(body).unwrap_or_default()
}
