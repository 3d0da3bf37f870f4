use std::collections::HashSet;
use std::ops::Range;

use document::DocumentRange;
use ingest::AnnotationId;
use normalize::NormalizeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    /// Semantic version of the matching rules. Must be >= 1.
    pub version: u32,

    /// Normalization applied to both document text and snippets.
    #[serde(default = "NormalizeConfig::long_document")]
    pub normalize: NormalizeConfig,

    /// Extend a resolved range whose end falls inside a grapheme cluster to
    /// the end of that cluster.
    #[serde(default = "MatchConfig::default_snap_to_graphemes")]
    pub snap_to_graphemes: bool,
}

impl MatchConfig {
    pub const fn default_snap_to_graphemes() -> bool {
        true
    }

    /// Same rules with the in-editor normalization profile.
    pub fn editor() -> Self {
        Self {
            normalize: NormalizeConfig::editor(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version == 0 {
            return Err(MatchError::InvalidConfig(
                "version must be >= 1".into(),
            ));
        }
        self.normalize
            .validate()
            .map_err(|err| MatchError::InvalidConfig(format!("normalize: {err}")))
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize: NormalizeConfig::long_document(),
            snap_to_graphemes: Self::default_snap_to_graphemes(),
        }
    }
}

/// Counts reported after every matching pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Annotations with a non-blank snippet.
    pub provided: usize,
    /// Annotations that resolved to a document range.
    pub matched: usize,
    /// Always `provided - matched`.
    pub unmatched: usize,
}

impl MatchStats {
    pub fn new(provided: usize, matched: usize) -> Self {
        Self {
            provided,
            matched,
            unmatched: provided.saturating_sub(matched),
        }
    }
}

/// A snippet located in flattened text, before span resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub annotation_id: AnnotationId,
    /// Position within the active (non-blank) annotation list.
    pub annotation_index: usize,
    /// Raw byte range in the flattened text.
    pub text_range: Range<usize>,
    /// The end offset could not be mapped and the range covers only the
    /// first matched char.
    pub end_fallback: bool,
}

/// Result of matching against flattened text only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMatchPass {
    pub matches: Vec<TextMatch>,
    pub provided: usize,
}

impl TextMatchPass {
    pub fn stats(&self) -> MatchStats {
        MatchStats::new(self.provided, self.matches.len())
    }
}

/// A snippet resolved to a concrete document range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationMatch<N> {
    pub annotation_id: AnnotationId,
    pub annotation_index: usize,
    pub range: DocumentRange<N>,
    pub end_fallback: bool,
}

/// Hits, matched ids and counts of one pass over a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome<N> {
    pub hits: Vec<AnnotationMatch<N>>,
    pub matched_ids: HashSet<AnnotationId>,
    pub stats: MatchStats,
}

impl<N> Default for MatchOutcome<N> {
    fn default() -> Self {
        Self {
            hits: Vec::new(),
            matched_ids: HashSet::new(),
            stats: MatchStats::default(),
        }
    }
}

impl<N> MatchOutcome<N> {
    pub fn hit_for(&self, id: &AnnotationId) -> Option<&AnnotationMatch<N>> {
        self.hits.iter().find(|hit| &hit.annotation_id == id)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_long_document() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.normalize, NormalizeConfig::long_document());
        assert!(cfg.snap_to_graphemes);
    }

    #[test]
    fn zero_version_rejected() {
        let cfg = MatchConfig {
            version: 0,
            ..MatchConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("version")),
        }
    }

    #[test]
    fn nested_normalize_version_checked() {
        let cfg = MatchConfig {
            normalize: NormalizeConfig {
                version: 0,
                ..NormalizeConfig::editor()
            },
            ..MatchConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(err.to_string().contains("normalize"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let cfg: MatchConfig = serde_json::from_str(r#"{"version": 1}"#).expect("parse");
        assert_eq!(cfg, MatchConfig::default());
    }

    #[test]
    fn stats_unmatched_is_difference() {
        assert_eq!(
            MatchStats::new(5, 3),
            MatchStats {
                provided: 5,
                matched: 3,
                unmatched: 2
            }
        );
    }
}
