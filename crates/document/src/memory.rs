//! Arena-backed reference host.
//!
//! [`MemoryDocument`] models the shape rich-text editors render: a root of
//! blocks, each holding text runs and explicit line-break units. It
//! implements both host traits, tracks a revision per mutation, and queues
//! the change notifications that [`RangeHost::dispatch_change`] synthesizes.
use serde::{Deserialize, Serialize};

use crate::error::ReplaceError;
use crate::replace::{split_lines, InsertPiece, RangeHost};
use crate::tree::{index, DocumentPoint, DocumentRange, TextTree};

/// Text a line-break unit contributes to the flattened document.
pub const LINE_BREAK_TEXT: &str = "\n";

/// Handle into a [`MemoryDocument`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Block,
    Text(String),
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentEvent {
    ContentChanged { revision: u64 },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
    revision: u64,
    events: Vec<DocumentEvent>,
}

impl MemoryDocument {
    /// Mounted, empty document.
    pub fn new() -> Self {
        let mut doc = Self::default();
        doc.mount();
        doc
    }

    /// Document whose surface has not been mounted yet.
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// One block; newlines in `text` become line-break units.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.push_paragraph(text);
        doc
    }

    /// One block per paragraph.
    pub fn from_paragraphs<'a>(paragraphs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut doc = Self::new();
        for paragraph in paragraphs {
            doc.push_paragraph(paragraph);
        }
        doc
    }

    /// Create the root if missing and return it.
    pub fn mount(&mut self) -> NodeId {
        if let Some(root) = self.root {
            return root;
        }
        let root = self.alloc(NodeKind::Root, None);
        self.root = Some(root);
        self.revision += 1;
        root
    }

    /// Drop the root, as when the editor surface is torn down.
    pub fn unmount(&mut self) {
        if self.root.take().is_some() {
            self.revision += 1;
        }
    }

    /// Append a block holding `text` split into runs and line breaks.
    pub fn push_paragraph(&mut self, text: &str) -> NodeId {
        self.push_runs([text])
    }

    /// Append a block with one text unit per run, so a phrase can straddle
    /// several units the way formatting splits it in a live editor.
    pub fn push_runs<'a>(&mut self, runs: impl IntoIterator<Item = &'a str>) -> NodeId {
        let root = self.mount();
        let block = self.alloc(NodeKind::Block, Some(root));
        self.nodes[root.0].children.push(block);
        for run in runs {
            for piece in split_lines(run) {
                let child = self.alloc(piece_kind(piece), Some(block));
                self.nodes[block.0].children.push(child);
            }
        }
        self.revision += 1;
        block
    }

    /// Replace the whole content, as on a document switch.
    pub fn set_text(&mut self, text: &str) {
        let revision = self.revision;
        *self = Self::from_text(text);
        self.revision = revision + 1;
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node.0).map(|data| &data.kind)
    }

    /// True when `node` is reachable from the mounted root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let mut current = Some(node);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|data| data.parent);
        }
        false
    }

    /// Drain queued change notifications.
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.nodes.get_mut(node.0).and_then(|data| data.parent.take());
        if let Some(parent) = parent {
            if let Some(data) = self.nodes.get_mut(parent.0) {
                data.children.retain(|child| *child != node);
            }
        }
    }

    fn check_point(&self, point: &DocumentPoint<NodeId>) -> Result<(), ReplaceError> {
        if !self.is_attached(point.node) {
            return Err(ReplaceError::NodeNotFound);
        }
        let valid = match self.kind(point.node) {
            Some(NodeKind::Text(text)) => text.is_char_boundary(point.offset),
            Some(NodeKind::LineBreak) => point.offset <= LINE_BREAK_TEXT.len(),
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(ReplaceError::InvalidRange(format!(
                "offset {} is not a position inside {:?}",
                point.offset, point.node
            )))
        }
    }

    fn text_mut(&mut self, node: NodeId) -> Option<&mut String> {
        match self.nodes.get_mut(node.0).map(|data| &mut data.kind) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// A fully covered line break turns into an empty run so the caret keeps
    /// a text unit to sit in.
    fn blank_line_break(&mut self, node: NodeId) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.kind = NodeKind::Text(String::new());
        }
    }

    fn is_line_break(&self, node: NodeId) -> bool {
        matches!(self.kind(node), Some(NodeKind::LineBreak))
    }
}

fn piece_kind(piece: InsertPiece) -> NodeKind {
    match piece {
        InsertPiece::Text(text) => NodeKind::Text(text),
        InsertPiece::LineBreak => NodeKind::LineBreak,
    }
}

impl TextTree for MemoryDocument {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn text(&self, node: &NodeId) -> Option<&str> {
        match self.kind(*node)? {
            NodeKind::Text(text) => Some(text.as_str()),
            NodeKind::LineBreak => Some(LINE_BREAK_TEXT),
            NodeKind::Root | NodeKind::Block => None,
        }
    }

    fn is_block(&self, node: &NodeId) -> bool {
        matches!(self.kind(*node), Some(NodeKind::Block))
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

impl RangeHost for MemoryDocument {
    fn delete(
        &mut self,
        range: &DocumentRange<NodeId>,
    ) -> Result<DocumentPoint<NodeId>, ReplaceError> {
        self.check_point(&range.start)?;
        self.check_point(&range.end)?;

        let leaves: Vec<NodeId> = index(&*self).spans.into_iter().map(|s| s.node).collect();
        let position = |node: NodeId| leaves.iter().position(|leaf| *leaf == node);
        let (Some(first), Some(last)) = (position(range.start.node), position(range.end.node))
        else {
            return Err(ReplaceError::NodeNotFound);
        };
        if first > last || (first == last && range.start.offset > range.end.offset) {
            return Err(ReplaceError::InvalidRange(
                "range end precedes range start".to_string(),
            ));
        }

        let start = range.start.clone();
        let end = range.end.clone();

        if first == last {
            if self.is_line_break(start.node) {
                if start.offset == 0 && end.offset == LINE_BREAK_TEXT.len() {
                    self.blank_line_break(start.node);
                    self.revision += 1;
                    return Ok(DocumentPoint {
                        node: start.node,
                        offset: 0,
                    });
                }
                return Ok(start);
            }
            if let Some(text) = self.text_mut(start.node) {
                text.replace_range(start.offset..end.offset, "");
            }
            self.revision += 1;
            return Ok(start);
        }

        let caret = if self.is_line_break(start.node) {
            if start.offset == 0 {
                self.blank_line_break(start.node);
            }
            start.clone()
        } else {
            if let Some(text) = self.text_mut(start.node) {
                text.truncate(start.offset);
            }
            start.clone()
        };

        for middle in &leaves[first + 1..last] {
            self.detach(*middle);
        }

        if self.is_line_break(end.node) {
            if end.offset == LINE_BREAK_TEXT.len() {
                self.detach(end.node);
            }
        } else if let Some(text) = self.text_mut(end.node) {
            text.replace_range(..end.offset, "");
        }

        self.revision += 1;
        Ok(caret)
    }

    fn insert(
        &mut self,
        at: &DocumentPoint<NodeId>,
        pieces: &[InsertPiece],
    ) -> Result<(), ReplaceError> {
        self.check_point(at)?;
        if pieces.is_empty() {
            return Ok(());
        }

        let parent = self
            .nodes
            .get(at.node.0)
            .and_then(|data| data.parent)
            .ok_or(ReplaceError::NodeNotFound)?;
        let slot = self.nodes[parent.0]
            .children
            .iter()
            .position(|child| *child == at.node)
            .ok_or(ReplaceError::NodeNotFound)?;

        let mut kinds: Vec<NodeKind> = pieces.iter().cloned().map(piece_kind).collect();
        let insert_at = if self.is_line_break(at.node) {
            slot + at.offset
        } else {
            let tail = self
                .text_mut(at.node)
                .map(|text| text.split_off(at.offset))
                .unwrap_or_default();
            if !tail.is_empty() {
                kinds.push(NodeKind::Text(tail));
            }
            slot + 1
        };

        for (i, kind) in kinds.into_iter().enumerate() {
            let child = self.alloc(kind, Some(parent));
            self.nodes[parent.0].children.insert(insert_at + i, child);
        }

        self.revision += 1;
        Ok(())
    }

    fn dispatch_change(&mut self) {
        self.events.push(DocumentEvent::ContentChanged {
            revision: self.revision,
        });
    }
}
