//! The event-driven overlay pipeline.
//!
//! Every recompute is a full redo: index the document, match, project,
//! refresh the view. Nothing is patched incrementally, so the visible state
//! always reflects the last completed pass.
use std::collections::HashSet;
use std::time::Instant;

use document::{index, replace_range, RangeHost, TextTree};
use ingest::{Annotation, AnnotationId};
use matcher::{active_annotations, MatchConfig, MatchStats, Matcher};
use overlay::{
    project_hits, ContainerBox, FrameThrottle, GeometryOracle, Highlight, OverlayConfig,
    OverlayHit, OverlayView, Point, Tooltip, Trigger,
};
use tracing::{info, info_span, warn};

use crate::{metrics_recorder, EngineError};


/// Something happened that may invalidate the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    AnnotationsChanged,
    ContentChanged,
    Scroll,
    Resize,
}

/// What the host should do after [`OverlayEngine::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Call [`OverlayEngine::recompute`] now.
    Recompute,
    /// Schedule one animation frame and call
    /// [`OverlayEngine::on_animation_frame`] from it.
    RequestFrame,
    /// A frame is already scheduled.
    Nothing,
}

/// Callbacks into the UI layer that owns the annotation list.
pub trait EngineObserver {
    /// Fired after every recompute.
    fn on_annotations_matched(&mut self, _stats: &MatchStats) {}

    /// Fired after a successful replacement. The caller usually drops the
    /// annotation from its active list.
    fn on_annotation_applied(&mut self, _annotation: &Annotation) {}
}

pub struct OverlayEngine {
    matcher: Matcher,
    view: OverlayView,
    throttle: FrameThrottle,
    throttle_to_frames: bool,
    container: ContainerBox,
    stats: MatchStats,
    matched_ids: HashSet<AnnotationId>,
    observer: Option<Box<dyn EngineObserver>>,
}

impl std::fmt::Debug for OverlayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("matcher", &self.matcher)
            .field("view", &self.view)
            .field("throttle", &self.throttle)
            .field("stats", &self.stats)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl OverlayEngine {
    pub fn new(match_cfg: MatchConfig, overlay_cfg: OverlayConfig) -> Result<Self, EngineError> {
        overlay_cfg.validate()?;
        let matcher = Matcher::new(match_cfg)?;
        Ok(Self {
            matcher,
            throttle_to_frames: overlay_cfg.throttle_to_frames,
            view: OverlayView::new(overlay_cfg),
            throttle: FrameThrottle::new(),
            container: ContainerBox::default(),
            stats: MatchStats::default(),
            matched_ids: HashSet::new(),
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn EngineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn EngineObserver>>) {
        self.observer = observer;
    }

    /// Decide how to react to `event`. Annotation and content changes
    /// recompute immediately; scroll and resize go through the frame
    /// throttle unless throttling is disabled.
    pub fn handle(&mut self, event: EngineEvent) -> Schedule {
        let trigger = match event {
            EngineEvent::AnnotationsChanged | EngineEvent::ContentChanged => {
                return Schedule::Recompute;
            }
            EngineEvent::Scroll => Trigger::Scroll,
            EngineEvent::Resize => Trigger::Resize,
        };
        if !self.throttle_to_frames {
            return Schedule::Recompute;
        }
        if self.throttle.request(trigger) {
            Schedule::RequestFrame
        } else {
            Schedule::Nothing
        }
    }

    /// Run the recompute a throttled trigger asked for, if any is pending.
    pub fn on_animation_frame<T, G>(
        &mut self,
        doc: &T,
        geometry: &G,
        annotations: &[Annotation],
    ) -> Option<MatchStats>
    where
        T: TextTree + ?Sized,
        G: GeometryOracle<T::Node> + ?Sized,
    {
        self.throttle.take()?;
        Some(self.recompute(doc, geometry, annotations))
    }

    /// Full pass: index, match, project, refresh. Never fails; misses show
    /// up in the returned stats.
    pub fn recompute<T, G>(&mut self, doc: &T, geometry: &G, annotations: &[Annotation]) -> MatchStats
    where
        T: TextTree + ?Sized,
        G: GeometryOracle<T::Node> + ?Sized,
    {
        let span = info_span!("engine.recompute", annotations = annotations.len());
        let _guard = span.enter();
        let start = Instant::now();

        let idx = index(doc);
        let outcome = self.matcher.match_index(&idx, annotations);
        let hits = project_hits(geometry, &idx, &outcome.hits);
        let active = active_annotations(annotations);
        self.container = geometry.container_box();
        let tooltip_closed = self.view.refresh(hits, &active, &self.container);

        self.stats = outcome.stats;
        self.matched_ids = outcome.matched_ids;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_annotations_matched(&self.stats);
        }

        let latency = start.elapsed();
        if let Some(recorder) = metrics_recorder() {
            recorder.record_recompute(latency, &self.stats);
        }
        info!(
            provided = self.stats.provided,
            matched = self.stats.matched,
            unmatched = self.stats.unmatched,
            hits = self.view.hits().len(),
            revision = idx.revision,
            tooltip_closed,
            elapsed_micros = latency.as_micros(),
            "overlay_recomputed"
        );
        self.stats
    }

    /// Open the tooltip for `id`. Returns `None` when the annotation has no
    /// hit in the last pass.
    pub fn pointer_enter(
        &mut self,
        id: &AnnotationId,
        annotations: &[Annotation],
    ) -> Option<&Tooltip> {
        let active = active_annotations(annotations);
        self.view.pointer_enter(id, &active, &self.container)
    }

    /// Pointer moved to `point` (container coordinates). Opens the tooltip
    /// of the highlight under it; a miss leaves the current tooltip alone.
    pub fn pointer_at(&mut self, point: Point, annotations: &[Annotation]) -> Option<&Tooltip> {
        let id = self.view.hit_at(point)?.annotation_id.clone();
        self.pointer_enter(&id, annotations)
    }

    pub fn tooltip_leave(&mut self) {
        self.view.tooltip_leave();
    }

    /// Replace the matched text of `id` with its suggestion.
    ///
    /// The range is re-resolved against the current document right before
    /// the edit. On success the hits are cleared and the tooltip closed; the
    /// host's change notification drives the next recompute.
    pub fn apply<H>(
        &mut self,
        doc: &mut H,
        annotations: &[Annotation],
        id: &AnnotationId,
    ) -> Result<Annotation, EngineError>
    where
        H: RangeHost + ?Sized,
    {
        let span = info_span!("engine.apply", annotation_id = %id);
        let _guard = span.enter();
        let start = Instant::now();

        let result = self.apply_inner(doc, annotations, id);
        let latency = start.elapsed();
        if let Some(recorder) = metrics_recorder() {
            recorder.record_apply(latency, result.as_ref().map(|_| ()).map_err(Clone::clone));
        }

        match &result {
            Ok(annotation) => {
                self.view.clear();
                self.matched_ids.clear();
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_annotation_applied(annotation);
                }
                info!(
                    annotation_id = %annotation.id,
                    replaced_len = annotation.original_text.len(),
                    inserted_len = annotation.suggested_text.len(),
                    elapsed_micros = latency.as_micros(),
                    "annotation_applied"
                );
            }
            Err(err) => {
                warn!(
                    annotation_id = %id,
                    error = %err,
                    elapsed_micros = latency.as_micros(),
                    "apply_failure"
                );
            }
        }
        result
    }

    fn apply_inner<H>(
        &self,
        doc: &mut H,
        annotations: &[Annotation],
        id: &AnnotationId,
    ) -> Result<Annotation, EngineError>
    where
        H: RangeHost + ?Sized,
    {
        let candidates: Vec<&Annotation> = annotations
            .iter()
            .filter(|a| &a.id == id && a.is_matchable())
            .collect();
        if candidates.is_empty() {
            return Err(EngineError::UnknownAnnotation(id.clone()));
        }
        if !candidates.iter().any(|a| a.has_actionable_suggestion()) {
            return Err(EngineError::NothingToApply(id.clone()));
        }

        let outcome = self.matcher.match_document(&*doc, annotations);
        let hit = outcome
            .hit_for(id)
            .ok_or_else(|| EngineError::NotMatched(id.clone()))?;
        // The suggestion must come from the entry whose snippet produced the
        // hit, even when ids repeat.
        let annotation = active_annotations(annotations)
            .get(hit.annotation_index)
            .copied()
            .filter(|a| &a.id == id)
            .ok_or_else(|| EngineError::NotMatched(id.clone()))?;
        if !annotation.has_actionable_suggestion() {
            return Err(EngineError::NothingToApply(id.clone()));
        }

        replace_range(doc, &hit.range, &annotation.suggested_text)?;
        Ok(annotation.clone())
    }

    pub fn hits(&self) -> &[OverlayHit] {
        self.view.hits()
    }

    /// Paintable rectangles of the last pass.
    pub fn highlights(&self, annotations: &[Annotation]) -> Vec<Highlight> {
        self.view.highlights(&active_annotations(annotations))
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.view.tooltip()
    }

    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    pub fn matched_ids(&self) -> &HashSet<AnnotationId> {
        &self.matched_ids
    }

    /// Number of scroll/resize triggers absorbed by an already scheduled
    /// frame.
    pub fn coalesced_triggers(&self) -> u64 {
        self.throttle.coalesced()
    }
}
