//! Host-facing read interface and the text-node indexer.
//!
//! ```text
//! Root
//! ├── Block
//! │   ├── Text "Hello "        span [0, 6)
//! │   ├── Text "world"         span [6, 11)
//! │   └── LineBreak "\n"       span [11, 12)
//! └── Block
//!     └── Text "  "            span [12, 14)
//!
//! full_text = "Hello world\n  "
//! block_starts = [12]
//! ```
use std::fmt;
use std::ops::Range;

/// Read-only view of a rendered document as a tree of units, some of which
/// carry text.
///
/// Implementors only describe structure; traversal order and offset
/// bookkeeping live in [`index`].
pub trait TextTree {
    /// Non-owning handle to a unit of the document. Handles are only
    /// meaningful until the next mutation.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Root of the rendered surface, or `None` when it is not mounted yet.
    fn root(&self) -> Option<Self::Node>;

    /// Direct children in reading order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Text of a text-bearing leaf. Units returning `Some` are not descended
    /// into.
    fn text(&self, node: &Self::Node) -> Option<&str>;

    /// True for units that start a new visual line, such as paragraphs.
    /// Block boundaries contribute no text to `full_text`.
    fn is_block(&self, _node: &Self::Node) -> bool {
        false
    }

    /// Monotonic content version; bumped by every mutation. Hosts that
    /// cannot track revisions keep the default.
    fn revision(&self) -> u64 {
        0
    }
}

/// One text-bearing unit and the slice of `full_text` it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan<N> {
    pub node: N,
    pub start: usize,
    pub end: usize,
}

impl<N> TextSpan<N> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A position inside one text-bearing unit. `offset` is a byte offset into
/// that unit's own text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPoint<N> {
    pub node: N,
    pub offset: usize,
}

/// A concrete document range resolved against a specific revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRange<N> {
    pub start: DocumentPoint<N>,
    pub end: DocumentPoint<N>,
    /// Same range expressed in `full_text` offsets.
    pub text_range: Range<usize>,
    /// Revision of the document the range was resolved against.
    pub revision: u64,
}

/// Flattened text plus the span table produced by [`index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextIndex<N> {
    pub full_text: String,
    pub spans: Vec<TextSpan<N>>,
    /// `full_text` offsets where a block other than the first begins,
    /// ascending.
    pub block_starts: Vec<usize>,
    pub revision: u64,
}

impl<N> Default for TextIndex<N> {
    fn default() -> Self {
        Self {
            full_text: String::new(),
            spans: Vec::new(),
            block_starts: Vec::new(),
            revision: 0,
        }
    }
}

impl<N: Clone> TextIndex<N> {
    /// True when there is nothing to match against, including the unmounted
    /// case.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn span_text(&self, span: &TextSpan<N>) -> &str {
        &self.full_text[span.start..span.end]
    }

    /// Point for a range start: the span with `start <= offset < end`.
    pub fn locate_start(&self, offset: usize) -> Option<DocumentPoint<N>> {
        self.spans
            .iter()
            .find(|span| span.start <= offset && offset < span.end)
            .map(|span| DocumentPoint {
                node: span.node.clone(),
                offset: offset - span.start,
            })
    }

    /// Point for a range end: the span with `start < offset <= end`, so an
    /// end on a span boundary stays in the earlier span.
    pub fn locate_end(&self, offset: usize) -> Option<DocumentPoint<N>> {
        self.spans
            .iter()
            .find(|span| span.start < offset && offset <= span.end)
            .map(|span| DocumentPoint {
                node: span.node.clone(),
                offset: offset - span.start,
            })
    }

    /// Resolve a non-empty `full_text` range into a document range. `None`
    /// if either boundary falls outside every span.
    pub fn resolve(&self, range: Range<usize>) -> Option<DocumentRange<N>> {
        if range.start >= range.end || range.end > self.full_text.len() {
            return None;
        }
        let start = self.locate_start(range.start)?;
        let end = self.locate_end(range.end)?;
        Some(DocumentRange {
            start,
            end,
            text_range: range,
            revision: self.revision,
        })
    }
}

/// Walk every text-bearing unit under the root in reading order and build
/// the flattened text and span table.
///
/// Units with empty or whitespace-only text still get a span. An unmounted
/// root yields an empty index. The traversal is iterative so deeply nested
/// documents cannot exhaust the stack.
pub fn index<T>(tree: &T) -> TextIndex<T::Node>
where
    T: TextTree + ?Sized,
{
    let revision = tree.revision();
    let Some(root) = tree.root() else {
        return TextIndex {
            revision,
            ..TextIndex::default()
        };
    };

    let mut full_text = String::new();
    let mut spans = Vec::new();
    let mut block_starts: Vec<usize> = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let starts_block = tree.is_block(&node) && !full_text.is_empty();
        if starts_block && block_starts.last() != Some(&full_text.len()) {
            block_starts.push(full_text.len());
        }
        if let Some(text) = tree.text(&node) {
            let start = full_text.len();
            full_text.push_str(text);
            spans.push(TextSpan {
                node,
                start,
                end: full_text.len(),
            });
            continue;
        }
        let children = tree.children(&node);
        stack.extend(children.into_iter().rev());
    }

    TextIndex {
        full_text,
        spans,
        block_starts,
        revision,
    }
}

/// Flattened plain text of the whole document.
pub fn flattened_text<T>(tree: &T) -> String
where
    T: TextTree + ?Sized,
{
    index(tree).full_text
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal host: nested vectors of leaves.
    struct Nested {
        mounted: bool,
        blocks: Vec<Vec<&'static str>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Handle {
        Root,
        Block(usize),
        Leaf(usize, usize),
    }

    impl TextTree for Nested {
        type Node = Handle;

        fn root(&self) -> Option<Handle> {
            self.mounted.then_some(Handle::Root)
        }

        fn children(&self, node: &Handle) -> Vec<Handle> {
            match node {
                Handle::Root => (0..self.blocks.len()).map(Handle::Block).collect(),
                Handle::Block(b) => (0..self.blocks[*b].len())
                    .map(|i| Handle::Leaf(*b, i))
                    .collect(),
                Handle::Leaf(..) => Vec::new(),
            }
        }

        fn text(&self, node: &Handle) -> Option<&str> {
            match node {
                Handle::Leaf(b, i) => Some(self.blocks[*b][*i]),
                _ => None,
            }
        }

        fn is_block(&self, node: &Handle) -> bool {
            matches!(node, Handle::Block(_))
        }
    }

    fn sample() -> Nested {
        Nested {
            mounted: true,
            blocks: vec![vec!["Hello ", "world"], vec!["  "], vec![], vec!["", "end"]],
        }
    }

    #[test]
    fn spans_cover_full_text_in_order() {
        let tree = sample();
        let idx = index(&tree);
        assert_eq!(idx.full_text, "Hello world  end");
        let joined: String = idx.spans.iter().map(|s| idx.span_text(s)).collect();
        assert_eq!(joined, idx.full_text);
        assert_eq!(idx.spans.len(), 5);
        for pair in idx.spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn whitespace_and_empty_units_keep_spans() {
        let idx = index(&sample());
        assert_eq!(idx.spans[2].node, Handle::Leaf(1, 0));
        assert_eq!(idx.spans[2].len(), 2);
        assert!(idx.spans[3].is_empty());
    }

    #[test]
    fn block_starts_skip_first_and_empty_blocks() {
        let idx = index(&sample());
        assert_eq!(idx.block_starts, vec![11, 13]);
    }

    #[test]
    fn unmounted_root_gives_empty_index() {
        let tree = Nested {
            mounted: false,
            blocks: vec![vec!["x"]],
        };
        let idx = index(&tree);
        assert!(idx.is_empty());
        assert!(idx.full_text.is_empty());
        assert_eq!(idx.resolve(0..1), None);
    }

    #[test]
    fn boundary_offsets_pick_adjacent_spans() {
        let idx = index(&sample());
        // offset 6 is the end of "Hello " and the start of "world"
        let start = idx.locate_start(6).expect("start");
        let end = idx.locate_end(6).expect("end");
        assert_eq!(start, DocumentPoint { node: Handle::Leaf(0, 1), offset: 0 });
        assert_eq!(end, DocumentPoint { node: Handle::Leaf(0, 0), offset: 6 });
    }

    #[test]
    fn resolve_skips_empty_spans() {
        let idx = index(&sample());
        let range = idx.resolve(13..16).expect("resolved");
        assert_eq!(range.start.node, Handle::Leaf(3, 1));
        assert_eq!(range.end, DocumentPoint { node: Handle::Leaf(3, 1), offset: 3 });
    }

    #[test]
    fn resolve_rejects_out_of_bounds() {
        let idx = index(&sample());
        assert_eq!(idx.resolve(3..3), None);
        assert_eq!(idx.resolve(10..99), None);
    }

    #[test]
    fn flattened_text_matches_index() {
        assert_eq!(flattened_text(&sample()), "Hello world  end");
    }
}
