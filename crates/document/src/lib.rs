//! Annotext document layer.
//!
//! The engine never owns the document. Hosts (editor bindings) implement two
//! narrow traits and everything else is shared:
//!
//! - [`TextTree`] - read access: root, children, leaf text, revision
//! - [`RangeHost`] - edit access: delete, insert, dispatch change
//!
//! On top of those this crate provides:
//!
//! - [`index`] - flatten the tree into `full_text` plus a span table mapping
//!   each slice back to the unit it came from
//! - [`TextIndex::resolve`] - turn a `full_text` range into concrete
//!   [`DocumentPoint`]s
//! - [`replace_range`] - delete, insert with explicit line-break units, then
//!   notify the host
//! - [`MemoryDocument`] - arena-backed reference host used by tests, benches
//!   and the demo binary
//!
//! ## Example
//!
//! ```
//! use document::{index, replace_range, MemoryDocument, TextTree};
//!
//! let mut doc = MemoryDocument::from_text("pay within 30 days");
//! let idx = index(&doc);
//! let range = idx.resolve(11..13).expect("inside the document");
//!
//! replace_range(&mut doc, &range, "14").expect("fresh range");
//! assert_eq!(index(&doc).full_text, "pay within 14 days");
//! assert!(doc.revision() > idx.revision);
//! ```

mod error;
mod memory;
mod replace;
mod tree;

pub use crate::error::ReplaceError;
pub use crate::memory::{DocumentEvent, MemoryDocument, NodeId, NodeKind, LINE_BREAK_TEXT};
pub use crate::replace::{replace_range, split_lines, InsertPiece, RangeHost};
pub use crate::tree::{
    flattened_text, index, DocumentPoint, DocumentRange, TextIndex, TextSpan, TextTree,
};
