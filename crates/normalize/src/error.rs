use thiserror::Error;

/// Errors surfaced by normalizer configuration checks.
///
/// Normalization itself never fails; only configuration validation does.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
