//! Configuration for annotation ingest.
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.max_annotations, Some(500));
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Runtime configuration for [`ingest`](crate::ingest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Config schema version. `0` is reserved and rejected.
    pub version: u32,

    /// Namespace for deterministic ids of entries that arrive without one:
    /// `UUIDv5(id_namespace, index + "\0" + original_text + "\0" + suggested_text)`.
    #[serde(default = "default_namespace")]
    pub id_namespace: Uuid,

    /// Strip ASCII control characters from `reason`, `legal_reference` and
    /// supplied ids. `original_text` is never touched since it must match
    /// the document verbatim.
    #[serde(default = "default_strip_control_chars")]
    pub strip_control_chars: bool,

    /// Maximum raw body size in bytes, checked before parsing.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: Option<usize>,

    /// Maximum number of array entries accepted from one payload.
    #[serde(default = "default_max_annotations")]
    pub max_annotations: Option<usize>,
}

fn default_namespace() -> Uuid {
    Uuid::NAMESPACE_OID
}

fn default_strip_control_chars() -> bool {
    true
}

fn default_max_payload_bytes() -> Option<usize> {
    Some(1024 * 1024)
}

fn default_max_annotations() -> Option<usize> {
    Some(500)
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            id_namespace: default_namespace(),
            strip_control_chars: default_strip_control_chars(),
            max_payload_bytes: default_max_payload_bytes(),
            max_annotations: default_max_annotations(),
        }
    }
}

impl IngestConfig {
    /// Validate configuration invariants; call once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidVersion);
        }
        if self.id_namespace.is_nil() {
            return Err(ConfigError::NilNamespace);
        }
        if let Some(0) = self.max_payload_bytes {
            return Err(ConfigError::ZeroLimit("max_payload_bytes"));
        }
        if let Some(0) = self.max_annotations {
            return Err(ConfigError::ZeroLimit("max_annotations"));
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config version must be >= 1")]
    InvalidVersion,
    #[error("id_namespace must not be the nil uuid")]
    NilNamespace,
    #[error("{0} must be greater than zero when set")]
    ZeroLimit(&'static str),
}
