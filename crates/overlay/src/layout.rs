//! Deterministic fixed-cell layout for hosts without a rendering engine.
//!
//! Every char except `\n` takes one cell. Lines hard-wrap when they reach
//! the column count derived from the viewport width; `\n` and the start of a
//! new block both begin a new line and take no cell.
use document::{DocumentRange, TextIndex};
use serde::{Deserialize, Serialize};

use crate::geometry::{ContainerBox, GeometryOracle, Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub line_height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 18.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceLayout {
    metrics: CellMetrics,
    container: ContainerBox,
}

impl MonospaceLayout {
    pub fn new(metrics: CellMetrics, viewport: Size) -> Self {
        Self {
            metrics,
            container: ContainerBox {
                viewport,
                ..ContainerBox::default()
            },
        }
    }

    /// Place the container's top-left corner in client space.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.container.origin = origin;
        self
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.container.scroll = scroll;
    }

    /// Resize the viewport; line wrapping follows the new width.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.container.viewport = viewport;
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Cells per line, never less than one.
    pub fn columns(&self) -> usize {
        let columns = self.container.viewport.width / self.metrics.cell_width;
        if columns.is_finite() && columns >= 1.0 {
            columns as usize
        } else {
            1
        }
    }

    /// Runs of `(line, first_col, end_col)` covered by `range` in `text`.
    /// `block_starts` are ascending offsets where a new block begins.
    fn line_runs(
        &self,
        text: &str,
        block_starts: &[usize],
        range: std::ops::Range<usize>,
    ) -> Vec<(usize, usize, usize)> {
        let columns = self.columns();
        let mut runs: Vec<(usize, usize, usize)> = Vec::new();
        let (mut line, mut col) = (0usize, 0usize);
        let mut blocks = block_starts.iter().copied().peekable();

        for (offset, ch) in text.char_indices() {
            if offset >= range.end {
                break;
            }
            while blocks.next_if(|start| *start <= offset).is_some() {
                // A block that follows a line break is already on a fresh line.
                if col > 0 {
                    line += 1;
                    col = 0;
                }
            }
            if ch == '\n' {
                line += 1;
                col = 0;
                continue;
            }
            if col == columns {
                line += 1;
                col = 0;
            }
            if offset >= range.start {
                match runs.last_mut() {
                    Some((run_line, _, end)) if *run_line == line => *end = col + 1,
                    _ => runs.push((line, col, col + 1)),
                }
            }
            col += 1;
        }
        runs
    }
}

impl<N> GeometryOracle<N> for MonospaceLayout {
    fn client_rects(&self, index: &TextIndex<N>, range: &DocumentRange<N>) -> Vec<Rect> {
        let CellMetrics {
            cell_width,
            line_height,
        } = self.metrics;
        let left0 = self.container.origin.x - self.container.scroll.x;
        let top0 = self.container.origin.y - self.container.scroll.y;

        self.line_runs(&index.full_text, &index.block_starts, range.text_range.clone())
            .into_iter()
            .map(|(line, first, end)| {
                Rect::new(
                    left0 + first as f64 * cell_width,
                    top0 + line as f64 * line_height,
                    (end - first) as f64 * cell_width,
                    line_height,
                )
            })
            .collect()
    }

    fn container_box(&self) -> ContainerBox {
        self.container
    }
}
