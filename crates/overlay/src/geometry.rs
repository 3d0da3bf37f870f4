//! Geometry projection: document ranges to container-relative rectangles.
//!
//! The host supplies client-space rectangles through [`GeometryOracle`].
//! [`project`] moves them into the scroll container's content space:
//!
//! ```text
//! container = client - container.origin + container.scroll
//! ```
//!
//! so an overlay layer positioned inside the container lines up with the
//! text regardless of where the container sits or how far it is scrolled.
use document::{DocumentRange, TextIndex};
use ingest::AnnotationId;
use matcher::AnnotationMatch;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Positive, finite extent in both directions.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }
}

/// Current placement of the scroll container in client space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerBox {
    /// Top-left corner of the container's bounding box.
    pub origin: Point,
    /// Scroll offsets of the container itself.
    pub scroll: Point,
    /// Visible size of the container.
    pub viewport: Size,
}

/// Host capability that knows how text is laid out on screen.
pub trait GeometryOracle<N> {
    /// Client-space rectangles covered by `range`, one per visual line.
    /// `index` is the snapshot the range was resolved against.
    fn client_rects(&self, index: &TextIndex<N>, range: &DocumentRange<N>) -> Vec<Rect>;

    fn container_box(&self) -> ContainerBox;
}

/// A matched annotation with its on-screen rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayHit {
    pub annotation_id: AnnotationId,
    pub annotation_index: usize,
    /// Container-relative, in reading order. Never empty.
    pub rects: Vec<Rect>,
    /// First rectangle; tooltips anchor here.
    pub anchor_rect: Rect,
}

/// Container-relative rectangles for one range. Rectangles without area
/// are dropped.
pub fn project<N, G>(oracle: &G, index: &TextIndex<N>, range: &DocumentRange<N>) -> Vec<Rect>
where
    G: GeometryOracle<N> + ?Sized,
{
    let container = oracle.container_box();
    let dx = container.scroll.x - container.origin.x;
    let dy = container.scroll.y - container.origin.y;
    oracle
        .client_rects(index, range)
        .into_iter()
        .filter(Rect::has_area)
        .map(|rect| rect.translate(dx, dy))
        .collect()
}

/// Project every match; matches that yield no rectangles produce no hit.
pub fn project_hits<N, G>(
    oracle: &G,
    index: &TextIndex<N>,
    matches: &[AnnotationMatch<N>],
) -> Vec<OverlayHit>
where
    G: GeometryOracle<N> + ?Sized,
{
    matches
        .iter()
        .filter_map(|found| {
            let rects = project(oracle, index, &found.range);
            let Some(anchor_rect) = rects.first().copied() else {
                debug!(annotation_id = %found.annotation_id, "hit_without_geometry");
                return None;
            };
            Some(OverlayHit {
                annotation_id: found.annotation_id.clone(),
                annotation_index: found.annotation_index,
                rects,
                anchor_rect,
            })
        })
        .collect()
}
