//! Highlight painting data and the single-slot tooltip state machine.
//!
//! ```text
//!            pointer_enter(id)
//!   Closed ───────────────────▶ Open(id)
//!     ▲                           │  pointer_enter(other) ─▶ Open(other)
//!     │ tooltip_leave / close     │
//!     └───────────────────────────┤
//!     ▲                           │ refresh without a hit for id
//!     └───────────────────────────┘
//! ```
use ingest::{Annotation, AnnotationId, Severity};
use serde::Serialize;
use tracing::debug;

use crate::config::{OverlayConfig, TooltipConfig};
use crate::geometry::{ContainerBox, OverlayHit, Point, Rect};

/// One paintable rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub annotation_id: AnnotationId,
    pub annotation_index: usize,
    pub rect: Rect,
    pub severity: Severity,
    pub color: String,
    pub active: bool,
}

/// Content and placement of the open tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub annotation_id: AnnotationId,
    pub annotation_index: usize,
    /// Top-left corner, container-relative.
    pub position: Point,
    pub width: f64,
    pub severity: Severity,
    pub reason: Option<String>,
    pub legal_reference: Option<String>,
    pub suggested_text: String,
    /// False for purely informational annotations.
    pub show_apply: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayView {
    cfg: OverlayConfig,
    hits: Vec<OverlayHit>,
    tooltip: Option<Tooltip>,
}

impl OverlayView {
    pub fn new(cfg: OverlayConfig) -> Self {
        Self {
            cfg,
            hits: Vec::new(),
            tooltip: None,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.cfg
    }

    pub fn hits(&self) -> &[OverlayHit] {
        &self.hits
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn active_id(&self) -> Option<&AnnotationId> {
        self.tooltip.as_ref().map(|t| &t.annotation_id)
    }

    /// Swap in freshly computed hits. An open tooltip follows its hit or is
    /// force-closed when the hit is gone; returns true in the latter case.
    pub fn refresh(
        &mut self,
        hits: Vec<OverlayHit>,
        annotations: &[&Annotation],
        container: &ContainerBox,
    ) -> bool {
        self.hits = hits;
        let Some(active) = self.tooltip.as_ref().map(|t| t.annotation_id.clone()) else {
            return false;
        };
        if let Some(moved) = self.open(&active, annotations, container) {
            self.tooltip = Some(moved);
            return false;
        }
        debug!(annotation_id = %active, "tooltip_force_closed");
        self.tooltip = None;
        true
    }

    /// Drop every hit and close the tooltip.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.tooltip = None;
    }

    /// One entry per rectangle of every hit, colored by severity.
    pub fn highlights(&self, annotations: &[&Annotation]) -> Vec<Highlight> {
        let active = self.active_id();
        self.hits
            .iter()
            .flat_map(|hit| {
                let severity = lookup(annotations, hit)
                    .map(Annotation::effective_severity)
                    .unwrap_or_default();
                let color = self.cfg.palette.color(severity).to_string();
                let is_active = active == Some(&hit.annotation_id);
                hit.rects.iter().map(move |rect| Highlight {
                    annotation_id: hit.annotation_id.clone(),
                    annotation_index: hit.annotation_index,
                    rect: *rect,
                    severity,
                    color: color.clone(),
                    active: is_active,
                })
            })
            .collect()
    }

    /// First hit with a rectangle under `point` (container coordinates).
    pub fn hit_at(&self, point: Point) -> Option<&OverlayHit> {
        self.hits
            .iter()
            .find(|hit| hit.rects.iter().any(|rect| rect.contains(point)))
    }

    /// The pointer entered a rectangle of `id`'s hit: open its tooltip,
    /// replacing any other.
    pub fn pointer_enter(
        &mut self,
        id: &AnnotationId,
        annotations: &[&Annotation],
        container: &ContainerBox,
    ) -> Option<&Tooltip> {
        let tooltip = self.open(id, annotations, container)?;
        self.tooltip = Some(tooltip);
        self.tooltip.as_ref()
    }

    /// The pointer left the tooltip itself. Leaving a highlight does not
    /// close it.
    pub fn tooltip_leave(&mut self) {
        self.tooltip = None;
    }

    pub fn close(&mut self) {
        self.tooltip = None;
    }

    fn open(
        &self,
        id: &AnnotationId,
        annotations: &[&Annotation],
        container: &ContainerBox,
    ) -> Option<Tooltip> {
        let hit = self.hits.iter().find(|hit| &hit.annotation_id == id)?;
        let annotation = lookup(annotations, hit)?;
        Some(Tooltip {
            annotation_id: hit.annotation_id.clone(),
            annotation_index: hit.annotation_index,
            position: tooltip_position(hit.anchor_rect, container, &self.cfg.tooltip),
            width: self.cfg.tooltip.width,
            severity: annotation.effective_severity(),
            reason: annotation.reason.clone(),
            legal_reference: annotation.legal_reference.clone(),
            suggested_text: annotation.suggested_text.clone(),
            show_apply: annotation.has_actionable_suggestion(),
        })
    }
}

/// The annotation a hit points at, if the active list still agrees on its
/// position.
fn lookup<'a>(annotations: &[&'a Annotation], hit: &OverlayHit) -> Option<&'a Annotation> {
    annotations
        .get(hit.annotation_index)
        .copied()
        .filter(|annotation| annotation.id == hit.annotation_id)
}

/// Below the anchor, kept inside the visible width and under the minimum
/// top margin.
pub fn tooltip_position(anchor: Rect, container: &ContainerBox, cfg: &TooltipConfig) -> Point {
    let min_x = container.scroll.x + cfg.edge_padding;
    let max_x = container.scroll.x + container.viewport.width - cfg.width - cfg.edge_padding;
    let x = if max_x < min_x {
        min_x
    } else {
        anchor.left.clamp(min_x, max_x)
    };
    let y = (anchor.bottom() + cfg.gap).max(container.scroll.y + cfg.min_top);
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn container() -> ContainerBox {
        ContainerBox {
            origin: Point::new(0.0, 0.0),
            scroll: Point::new(0.0, 0.0),
            viewport: Size::new(600.0, 400.0),
        }
    }

    fn hit(id: &str, index: usize, rect: Rect) -> OverlayHit {
        OverlayHit {
            annotation_id: id.into(),
            annotation_index: index,
            rects: vec![rect],
            anchor_rect: rect,
        }
    }

    fn annotations() -> Vec<Annotation> {
        vec![
            Annotation::new("a", "shall", "must")
                .with_severity(Severity::High)
                .with_reason("modal verb")
                .with_legal_reference("Style guide 4.2"),
            Annotation::new("b", "herein", " herein "),
        ]
    }

    fn view_with_hits() -> OverlayView {
        let mut view = OverlayView::new(OverlayConfig::default());
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        view.refresh(
            vec![
                hit("a", 0, Rect::new(10.0, 20.0, 40.0, 18.0)),
                hit("b", 1, Rect::new(100.0, 60.0, 48.0, 18.0)),
            ],
            &refs,
            &container(),
        );
        view
    }

    #[test]
    fn pointer_enter_opens_tooltip_with_details() {
        let mut view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        let tooltip = view
            .pointer_enter(&"a".into(), &refs, &container())
            .expect("tooltip opens")
            .clone();
        assert_eq!(tooltip.reason.as_deref(), Some("modal verb"));
        assert_eq!(tooltip.legal_reference.as_deref(), Some("Style guide 4.2"));
        assert!(tooltip.show_apply);
        assert_eq!(tooltip.position, Point::new(10.0, 44.0));
    }

    #[test]
    fn informational_annotation_hides_apply() {
        let mut view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        let tooltip = view
            .pointer_enter(&"b".into(), &refs, &container())
            .expect("tooltip opens");
        assert!(!tooltip.show_apply);
    }

    #[test]
    fn only_one_tooltip_at_a_time() {
        let mut view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        view.pointer_enter(&"a".into(), &refs, &container());
        view.pointer_enter(&"b".into(), &refs, &container());
        assert_eq!(view.active_id().map(AnnotationId::as_str), Some("b"));
    }

    #[test]
    fn leaving_tooltip_closes_and_hover_reopens() {
        let mut view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        view.pointer_enter(&"a".into(), &refs, &container());
        view.tooltip_leave();
        assert!(view.tooltip().is_none());
        assert!(view.pointer_enter(&"a".into(), &refs, &container()).is_some());
    }

    #[test]
    fn refresh_force_closes_when_hit_disappears() {
        let mut view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        view.pointer_enter(&"a".into(), &refs, &container());

        let closed = view.refresh(
            vec![hit("b", 1, Rect::new(100.0, 60.0, 48.0, 18.0))],
            &refs,
            &container(),
        );
        assert!(closed);
        assert!(view.tooltip().is_none());
    }

    #[test]
    fn refresh_moves_open_tooltip_with_its_hit() {
        let mut view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        view.pointer_enter(&"a".into(), &refs, &container());

        let closed = view.refresh(
            vec![hit("a", 0, Rect::new(10.0, 120.0, 40.0, 18.0))],
            &refs,
            &container(),
        );
        assert!(!closed);
        assert_eq!(view.tooltip().map(|t| t.position.y), Some(144.0));
    }

    #[test]
    fn unknown_id_opens_nothing() {
        let mut view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        assert!(view.pointer_enter(&"zzz".into(), &refs, &container()).is_none());
        assert!(view.tooltip().is_none());
    }

    #[test]
    fn highlights_use_severity_colors() {
        let view = view_with_hits();
        let list = annotations();
        let refs: Vec<&Annotation> = list.iter().collect();
        let highlights = view.highlights(&refs);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].severity, Severity::High);
        assert_eq!(highlights[0].color, view.config().palette.high);
        assert_eq!(highlights[1].severity, Severity::Medium);
    }

    #[test]
    fn tooltip_is_clamped_to_viewport() {
        let cfg = TooltipConfig::default();
        let near_right = tooltip_position(Rect::new(580.0, 20.0, 10.0, 18.0), &container(), &cfg);
        assert_eq!(near_right.x, 600.0 - cfg.width - cfg.edge_padding);

        let near_left = tooltip_position(Rect::new(-30.0, 20.0, 10.0, 18.0), &container(), &cfg);
        assert_eq!(near_left.x, cfg.edge_padding);

        let scrolled = ContainerBox {
            scroll: Point::new(0.0, 500.0),
            ..container()
        };
        let above = tooltip_position(Rect::new(10.0, 100.0, 10.0, 18.0), &scrolled, &cfg);
        assert_eq!(above.y, 500.0 + cfg.min_top);
    }

    #[test]
    fn narrow_viewport_pins_tooltip_left() {
        let cfg = TooltipConfig::default();
        let narrow = ContainerBox {
            viewport: Size::new(100.0, 400.0),
            ..container()
        };
        let pos = tooltip_position(Rect::new(50.0, 0.0, 10.0, 18.0), &narrow, &cfg);
        assert_eq!(pos.x, cfg.edge_padding);
    }

    #[test]
    fn hit_testing_finds_rect_under_pointer() {
        let view = view_with_hits();
        assert_eq!(
            view.hit_at(Point::new(110.0, 65.0)).map(|h| h.annotation_id.as_str()),
            Some("b")
        );
        assert!(view.hit_at(Point::new(0.0, 0.0)).is_none());
    }
}
