//! # Annotext Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` anchors annotation snippets onto a live document. It sits on
//! top of the normalizer (`normalize`) and the document layer (`document`):
//!
//! 1. drop annotations whose snippet is blank after trimming
//! 2. normalize the flattened document text once per pass
//! 3. normalize each snippet and find its **leftmost** occurrence
//! 4. map the normalized hit back to raw offsets, optionally snapping the
//!    end to a grapheme boundary
//! 5. resolve the raw range through the span table into document points
//!
//! A snippet that is not found, or whose range cannot be resolved, is simply
//! unmatched. Nothing in a pass fails; the caller learns about misses through
//! [`MatchStats`].
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: normalization profile and grapheme snapping.
//! - [`Matcher`]: runs passes over text ([`Matcher::match_text`]), an
//!   existing index ([`Matcher::match_index`]) or a host tree
//!   ([`Matcher::match_document`]).
//! - [`MatchOutcome`]: hits, matched ids and [`MatchStats`].
//!
//! ## Example Usage
//!
//! ```
//! use document::MemoryDocument;
//! use ingest::Annotation;
//! use matcher::{MatchConfig, Matcher};
//!
//! let doc = MemoryDocument::from_text("The lessee shall  pay the rent.");
//! let annotations = vec![
//!     Annotation::new("a1", "shall pay", "must pay"),
//!     Annotation::new("a2", "deposit", "security deposit"),
//! ];
//!
//! let matcher = Matcher::new(MatchConfig::default()).expect("valid config");
//! let outcome = matcher.match_document(&doc, &annotations);
//!
//! assert_eq!(outcome.stats.matched, 1);
//! assert_eq!(outcome.stats.unmatched, 1);
//! assert_eq!(outcome.hits[0].range.text_range, 11..21);
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to
//! record per-pass latency and counts. Every [`Matcher`] shares the same
//! recorder.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::{active_annotations, Matcher};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::types::{
    AnnotationMatch, MatchConfig, MatchError, MatchOutcome, MatchStats, TextMatch, TextMatchPass,
};
