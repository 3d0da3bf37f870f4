//! Configuration types for the normalizer.
//!
//! [`NormalizeConfig`] selects which diacritic policy runs on top of the
//! always-on passes (invisible-mark stripping and whitespace collapsing).
//!
//! # Versioning
//!
//! The `version` field tracks behavior changes. Anything that changes the
//! normalized output for a given input (even a bug fix) bumps the version so
//! callers persisting normalized needles can tell which rules produced them.
//!
//! # Examples
//!
//! ```rust
//! use normalize::{DiacriticPolicy, NormalizeConfig};
//!
//! let editor = NormalizeConfig::editor();
//! assert_eq!(editor.diacritics, DiacriticPolicy::Keep);
//!
//! let long = NormalizeConfig::long_document();
//! assert_eq!(long.diacritics, DiacriticPolicy::Arabic);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Which combining marks are removed before whitespace collapsing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiacriticPolicy {
    /// Leave every mark in place.
    #[default]
    Keep,
    /// Drop Arabic harakat (U+064B..=U+065F) and the superscript alef U+0670.
    Arabic,
    /// Drop Arabic harakat plus every nonspacing or enclosing mark left after
    /// canonical decomposition, so `"café"` and `"cafe"` normalize alike.
    AllMarks,
}

/// Configuration for [`normalize_with`](crate::normalize_with).
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configuration files.
///
/// ```json
/// {
///   "version": 1,
///   "diacritics": "arabic"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Semantic version of the normalization rules. Must be >= 1.
    pub version: u32,

    /// Diacritic stripping policy. Case is never altered regardless of policy.
    #[serde(default)]
    pub diacritics: DiacriticPolicy,
}

impl NormalizeConfig {
    /// Base profile used while a document is being edited in place.
    pub fn editor() -> Self {
        Self {
            version: 1,
            diacritics: DiacriticPolicy::Keep,
        }
    }

    /// Profile for long documents, where vocalized and unvocalized Arabic
    /// spellings of the same phrase must anchor to each other.
    pub fn long_document() -> Self {
        Self {
            version: 1,
            diacritics: DiacriticPolicy::Arabic,
        }
    }

    /// Validate the configuration. Version 0 is reserved.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.version == 0 {
            return Err(NormalizeError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::editor()
    }
}
