//! # Annotext Overlay (`overlay`)
//!
//! Turns matched document ranges into something a UI can paint and hover.
//!
//! - [`project`] / [`project_hits`] ask a host [`GeometryOracle`] for client
//!   rectangles and move them into the scroll container's content space.
//! - [`OverlayView`] holds the current hits and the single active tooltip.
//!   It produces severity-colored [`Highlight`]s and positions the
//!   [`Tooltip`] under its anchor rectangle.
//! - [`FrameThrottle`] collapses bursts of scroll/resize triggers into one
//!   recompute per animation frame.
//! - [`MonospaceLayout`] is a fixed-cell oracle for hosts without a
//!   rendering engine.
//!
//! Rectangles are recomputed from scratch on every pass; nothing here caches
//! geometry across frames.
//!
//! ```
//! use document::{index, MemoryDocument};
//! use ingest::Annotation;
//! use matcher::{MatchConfig, Matcher};
//! use overlay::{project_hits, CellMetrics, MonospaceLayout, OverlayConfig, OverlayView, Size};
//!
//! let doc = MemoryDocument::from_text("Rent is due monthly in advance.");
//! let annotations = vec![Annotation::new("a1", "monthly", "on the first day of each month")];
//!
//! let idx = index(&doc);
//! let matcher = Matcher::new(MatchConfig::default()).expect("valid config");
//! let outcome = matcher.match_index(&idx, &annotations);
//!
//! let layout = MonospaceLayout::new(CellMetrics::default(), Size::new(800.0, 600.0));
//! let mut view = OverlayView::new(OverlayConfig::default());
//! let active: Vec<&Annotation> = annotations.iter().collect();
//! view.refresh(project_hits(&layout, &idx, &outcome.hits), &active, &Default::default());
//!
//! assert_eq!(view.highlights(&active).len(), 1);
//! ```

pub mod config;
pub mod geometry;
pub mod layout;
pub mod throttle;
pub mod view;

pub use crate::config::{OverlayConfig, OverlayError, SeverityPalette, TooltipConfig};
pub use crate::geometry::{
    project, project_hits, ContainerBox, GeometryOracle, OverlayHit, Point, Rect, Size,
};
pub use crate::layout::{CellMetrics, MonospaceLayout};
pub use crate::throttle::{FrameThrottle, Trigger};
pub use crate::view::{tooltip_position, Highlight, OverlayView, Tooltip};
