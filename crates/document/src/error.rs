use thiserror::Error;

/// Why a range replacement was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplaceError {
    /// The range was resolved against an older document revision. Re-run
    /// matching and retry with the fresh range.
    #[error("range resolved at revision {range} but document is at {document}")]
    StaleRange { range: u64, document: u64 },

    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A range endpoint refers to a unit no longer attached to the document.
    #[error("range endpoint refers to a detached or unknown node")]
    NodeNotFound,
}
