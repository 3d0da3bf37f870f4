//! Cleanup of descriptive annotation fields and id derivation.
use normalize::collapse_whitespace;
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::types::AnnotationId;

/// Strip control characters (when enabled) and trim; blank becomes `None`.
pub(crate) fn sanitize_optional_string(
    value: Option<String>,
    strip_control: bool,
) -> Option<String> {
    value.and_then(|raw| {
        let filtered = if strip_control {
            raw.chars().filter(|c| !c.is_control()).collect::<String>()
        } else {
            raw
        };
        let trimmed = filtered.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Tooltip text (`reason`, `legal_reference`): sanitized like any optional
/// field, then folded onto one line.
pub(crate) fn sanitize_display_string(
    value: Option<String>,
    strip_control: bool,
) -> Option<String> {
    sanitize_optional_string(value, strip_control)
        .map(|text| collapse_whitespace(&text))
        .filter(|text| !text.is_empty())
}

/// Deterministic id for an entry that arrived without one.
///
/// Material is `index \0 original_text \0 suggested_text`; the index keeps two
/// identical suggestions in one payload distinct, the separators prevent
/// field-boundary collisions.
pub(crate) fn derive_annotation_id(
    cfg: &IngestConfig,
    index: usize,
    original_text: &str,
    suggested_text: &str,
) -> AnnotationId {
    let index = index.to_string();
    let mut material =
        Vec::with_capacity(index.len() + original_text.len() + suggested_text.len() + 2);
    material.extend_from_slice(index.as_bytes());
    material.push(0);
    material.extend_from_slice(original_text.as_bytes());
    material.push(0);
    material.extend_from_slice(suggested_text.as_bytes());
    AnnotationId::new(Uuid::new_v5(&cfg.id_namespace, &material).to_string())
}

/// Use the supplied id when it survives sanitizing, otherwise derive one.
pub(crate) fn resolve_annotation_id(
    cfg: &IngestConfig,
    supplied: Option<String>,
    index: usize,
    original_text: &str,
    suggested_text: &str,
) -> AnnotationId {
    match sanitize_optional_string(supplied, cfg.strip_control_chars) {
        Some(id) => AnnotationId::new(id),
        None => derive_annotation_id(cfg, index, original_text, suggested_text),
    }
}
