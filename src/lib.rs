//! Workspace umbrella crate for Annotext.
//!
//! Annotext anchors AI-produced suggestions ("annotations") onto the live
//! text of a rich-text editor. This crate stitches the stages together so a
//! host only has to feed events and read back highlights:
//!
//! 1. [`ingest`](ingest::ingest) the service response into [`Annotation`]s
//! 2. index the host document and match every snippet ([`Matcher`])
//! 3. project matches into container-relative rectangles ([`project_hits`])
//! 4. keep highlight and tooltip state ([`OverlayView`])
//! 5. apply a suggestion in place ([`replace_range`])
//!
//! [`OverlayEngine`] runs 2-5 in response to [`EngineEvent`]s.
//!
//! ```
//! use annotext::{
//!     Annotation, CellMetrics, EngineEvent, MatchConfig, MemoryDocument, MonospaceLayout,
//!     OverlayConfig, OverlayEngine, Schedule, Size,
//! };
//!
//! let mut doc = MemoryDocument::from_text("The tenant shall pay rent.");
//! let layout = MonospaceLayout::new(CellMetrics::default(), Size::new(640.0, 480.0));
//! let annotations = vec![Annotation::new("a1", "shall pay", "must pay")];
//!
//! let mut engine = OverlayEngine::new(MatchConfig::default(), OverlayConfig::default())
//!     .expect("valid config");
//! assert_eq!(engine.handle(EngineEvent::AnnotationsChanged), Schedule::Recompute);
//! let stats = engine.recompute(&doc, &layout, &annotations);
//! assert_eq!(stats.matched, 1);
//!
//! engine.apply(&mut doc, &annotations, &"a1".into()).expect("applied");
//! assert_eq!(annotext::flattened_text(&doc), "The tenant must pay rent.");
//! ```

pub mod config;
mod engine;

pub use crate::config::{
    AnnotextConfig, ConfigLoadError, IngestYamlConfig, MatchYamlConfig, NormalizeYamlConfig,
    OverlayYamlConfig,
};
pub use crate::engine::{EngineEvent, EngineObserver, OverlayEngine, Schedule};

pub use document::{
    flattened_text, index, replace_range, DocumentPoint, DocumentRange, MemoryDocument, NodeId,
    RangeHost, ReplaceError, TextIndex, TextSpan, TextTree,
};
pub use ingest::{
    ingest, parse_annotations, parse_color_coded, try_parse_annotations, try_parse_color_coded,
    Annotation, AnnotationBatch, AnnotationId, AnnotationSource, IngestConfig, IngestError,
    RawAnnotationPayload, Severity,
};
pub use matcher::{
    set_match_metrics, MatchConfig, MatchError, MatchMetrics, MatchOutcome, MatchStats, Matcher,
};
pub use normalize::{normalize, normalize_with, DiacriticPolicy, NormalizeConfig, NormalizedText};
pub use overlay::{
    project_hits, CellMetrics, ContainerBox, GeometryOracle, Highlight, MonospaceLayout,
    OverlayConfig, OverlayError, OverlayHit, OverlayView, Point, Rect, Size, Tooltip,
};

use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the engine. Matching misses are not errors; they only
/// show up in [`MatchStats`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("ingest failure: {0}")]
    Ingest(#[from] IngestError),

    #[error("matcher config rejected: {0}")]
    Match(#[from] MatchError),

    #[error("overlay config rejected: {0}")]
    Overlay(#[from] OverlayError),

    #[error("replacement failed: {0}")]
    Replace(#[from] ReplaceError),

    #[error("annotation {0} is not in the active list")]
    UnknownAnnotation(AnnotationId),

    #[error("annotation {0} no longer matches the document")]
    NotMatched(AnnotationId),

    #[error("annotation {0} carries no suggestion to apply")]
    NothingToApply(AnnotationId),
}

/// Metrics observer for engine passes.
pub trait PipelineMetrics: Send + Sync {
    fn record_recompute(&self, latency: Duration, stats: &MatchStats);
    fn record_apply(&self, latency: Duration, result: Result<(), EngineError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

const SAMPLE_MEMO: &str = include_str!("../data/sample_memo.txt");
const SAMPLE_ANNOTATIONS: &str = include_str!("../data/sample_annotations.json");

/// What the bundled demo produced.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub batch: AnnotationBatch,
    pub stats: MatchStats,
    pub unmatched: Vec<AnnotationId>,
    pub highlights: Vec<Highlight>,
    pub tooltip: Option<Tooltip>,
    pub applied: Option<AnnotationId>,
    pub text_after_apply: String,
}

/// Feed the bundled sample memo and AI reply through the whole pipeline:
/// ingest, recompute, hover the first hit, apply it, recompute again.
pub fn sample_memo_demo(cfg: &AnnotextConfig) -> Result<DemoReport, EngineError> {
    let payload = RawAnnotationPayload::new(AnnotationSource::AssistantReply, SAMPLE_ANNOTATIONS);
    let batch = ingest(payload, &cfg.ingest_config())?;
    let mut annotations = batch.annotations.clone();

    let mut doc = MemoryDocument::from_text(SAMPLE_MEMO);
    let layout = MonospaceLayout::new(CellMetrics::default(), Size::new(720.0, 480.0));
    let mut engine = OverlayEngine::new(cfg.match_config(), cfg.overlay_config())?;

    let stats = engine.recompute(&doc, &layout, &annotations);
    let unmatched = annotations
        .iter()
        .filter(|a| a.is_matchable() && !engine.matched_ids().contains(&a.id))
        .map(|a| a.id.clone())
        .collect();
    let highlights = engine.highlights(&annotations);

    let first_hit = engine.hits().first().map(|hit| hit.annotation_id.clone());
    let tooltip = first_hit
        .as_ref()
        .and_then(|id| engine.pointer_enter(id, &annotations).cloned());

    let mut applied = None;
    if let Some(tip) = tooltip.as_ref().filter(|tip| tip.show_apply) {
        let done = engine.apply(&mut doc, &annotations, &tip.annotation_id)?;
        annotations.retain(|a| a.id != done.id);
        engine.recompute(&doc, &layout, &annotations);
        applied = Some(done.id);
    }

    Ok(DemoReport {
        batch,
        stats,
        unmatched,
        highlights,
        tooltip,
        applied,
        text_after_apply: flattened_text(&doc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingMetrics {
        events: Mutex<Vec<&'static str>>,
    }

    impl CountingMetrics {
        fn snapshot(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }
    }

    impl PipelineMetrics for CountingMetrics {
        fn record_recompute(&self, _latency: Duration, _stats: &MatchStats) {
            self.events.lock().unwrap().push("recompute");
        }

        fn record_apply(&self, _latency: Duration, result: Result<(), EngineError>) {
            let label = if result.is_ok() { "apply_ok" } else { "apply_err" };
            self.events.lock().unwrap().push(label);
        }
    }

    #[test]
    fn demo_matches_and_applies() {
        let report = sample_memo_demo(&AnnotextConfig::default()).expect("demo runs");
        assert!(report.stats.provided >= 3);
        assert!(report.stats.matched >= 2);
        assert_eq!(
            report.stats.unmatched,
            report.stats.provided - report.stats.matched
        );
        assert_eq!(report.unmatched.len(), report.stats.unmatched);
        assert!(report.applied.is_some());
        assert!(!report.highlights.is_empty());
    }

    #[test]
    fn metrics_recorder_tracks_engine_passes() {
        let metrics = Arc::new(CountingMetrics::default());
        set_pipeline_metrics(Some(metrics.clone()));

        let report = sample_memo_demo(&AnnotextConfig::default());
        assert!(report.is_ok());

        let events = metrics.snapshot();
        assert!(events.contains(&"recompute"));
        assert!(events.contains(&"apply_ok"));

        set_pipeline_metrics(None);
    }
}
