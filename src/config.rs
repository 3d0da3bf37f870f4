//! YAML configuration file support.
//!
//! All stage settings live in one file and are converted into the per-crate
//! config structs at startup. Every section is optional.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "contracts"
//!
//! normalize:
//!   version: 1
//!   diacritics: "arabic"
//!
//! ingest:
//!   version: 1
//!   id_namespace: "6ba7b812-9dad-11d1-80b4-00c04fd430c8"
//!   strip_control_chars: true
//!   max_payload_bytes: 1048576
//!   max_annotations: 500
//!
//! matcher:
//!   version: 1
//!   snap_to_graphemes: true
//!
//! overlay:
//!   version: 1
//!   throttle_to_frames: true
//!   palette:
//!     high: "rgba(239, 68, 68, 0.35)"
//!     medium: "rgba(245, 158, 11, 0.35)"
//!     low: "rgba(59, 130, 246, 0.30)"
//!   tooltip:
//!     width: 320
//!     gap: 6
//!     min_top: 8
//!     edge_padding: 8
//! ```

use std::fs;
use std::path::Path;

use ingest::IngestConfig;
use matcher::MatchConfig;
use normalize::{DiacriticPolicy, NormalizeConfig};
use overlay::{OverlayConfig, SeverityPalette, TooltipConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the whole engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnnotextConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalize: NormalizeYamlConfig,

    #[serde(default)]
    pub ingest: IngestYamlConfig,

    #[serde(default)]
    pub matcher: MatchYamlConfig,

    #[serde(default)]
    pub overlay: OverlayYamlConfig,
}

impl AnnotextConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AnnotextConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.normalize_config()
            .validate()
            .map_err(|err| stage_error("normalize", err))?;
        self.ingest_config()
            .validate()
            .map_err(|err| stage_error("ingest", err))?;
        self.match_config()
            .validate()
            .map_err(|err| stage_error("matcher", err))?;
        self.overlay_config()
            .validate()
            .map_err(|err| stage_error("overlay", err))?;
        Ok(())
    }

    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            version: self.normalize.version,
            diacritics: self.normalize.diacritics,
        }
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            version: self.ingest.version,
            id_namespace: self.ingest.id_namespace,
            strip_control_chars: self.ingest.strip_control_chars,
            max_payload_bytes: self.ingest.max_payload_bytes,
            max_annotations: self.ingest.max_annotations,
        }
    }

    /// Matcher settings; the `normalize` section selects its profile.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            version: self.matcher.version,
            normalize: self.normalize_config(),
            snap_to_graphemes: self.matcher.snap_to_graphemes,
        }
    }

    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            version: self.overlay.version,
            palette: self.overlay.palette.clone(),
            tooltip: self.overlay.tooltip,
            throttle_to_frames: self.overlay.throttle_to_frames,
        }
    }
}

impl Default for AnnotextConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalize: NormalizeYamlConfig::default(),
            ingest: IngestYamlConfig::default(),
            matcher: MatchYamlConfig::default(),
            overlay: OverlayYamlConfig::default(),
        }
    }
}

fn stage_error(stage: &str, err: impl std::fmt::Display) -> ConfigLoadError {
    ConfigLoadError::Validation(format!("{stage}: {err}"))
}

/// Normalizer YAML configuration. Defaults to the long-document profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_diacritics")]
    pub diacritics: DiacriticPolicy,
}

impl Default for NormalizeYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            diacritics: default_diacritics(),
        }
    }
}

/// Ingest stage YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_id_namespace")]
    pub id_namespace: Uuid,

    #[serde(default = "true_value")]
    pub strip_control_chars: bool,

    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: Option<usize>,

    #[serde(default = "default_max_annotations")]
    pub max_annotations: Option<usize>,
}

impl Default for IngestYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            id_namespace: default_id_namespace(),
            strip_control_chars: true,
            max_payload_bytes: default_max_payload_bytes(),
            max_annotations: default_max_annotations(),
        }
    }
}

/// Matcher YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub snap_to_graphemes: bool,
}

impl Default for MatchYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            snap_to_graphemes: true,
        }
    }
}

/// Overlay YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub throttle_to_frames: bool,

    #[serde(default)]
    pub palette: SeverityPalette,

    #[serde(default)]
    pub tooltip: TooltipConfig,
}

impl Default for OverlayYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            throttle_to_frames: true,
            palette: SeverityPalette::default(),
            tooltip: TooltipConfig::default(),
        }
    }
}

// Helper functions for serde defaults
fn default_version() -> u32 {
    1
}
fn true_value() -> bool {
    true
}
fn default_diacritics() -> DiacriticPolicy {
    DiacriticPolicy::Arabic
}
fn default_id_namespace() -> Uuid {
    Uuid::NAMESPACE_OID
}
fn default_max_payload_bytes() -> Option<usize> {
    Some(1024 * 1024)
}
fn default_max_annotations() -> Option<usize> {
    Some(500)
}
