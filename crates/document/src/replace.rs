//! Range replacement shared by every host.
//!
//! Hosts expose three narrow edit primitives through [`RangeHost`];
//! [`replace_range`] sequences them so the delete / insert / notify contract
//! is implemented once.
use tracing::{debug, warn};

use crate::error::ReplaceError;
use crate::tree::{DocumentPoint, DocumentRange, TextTree};

/// One unit of inserted content. Line breaks are explicit units, never a
/// literal newline inside a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPiece {
    Text(String),
    LineBreak,
}

/// Edit primitives a host document must provide.
pub trait RangeHost: TextTree {
    /// Remove the content covered by `range` and return the collapsed caret
    /// where insertion should happen.
    fn delete(
        &mut self,
        range: &DocumentRange<Self::Node>,
    ) -> Result<DocumentPoint<Self::Node>, ReplaceError>;

    /// Insert `pieces` at `at`, in order.
    fn insert(
        &mut self,
        at: &DocumentPoint<Self::Node>,
        pieces: &[InsertPiece],
    ) -> Result<(), ReplaceError>;

    /// Emit the host's "content changed" notification, as a user edit would.
    fn dispatch_change(&mut self);
}

/// Split replacement text into text runs and line-break units.
///
/// `\r\n`, `\n` and a lone `\r` each count as one break. Empty runs between
/// breaks are omitted.
///
/// ```rust
/// use document::{split_lines, InsertPiece};
///
/// assert_eq!(
///     split_lines("one\r\ntwo\n"),
///     vec![
///         InsertPiece::Text("one".into()),
///         InsertPiece::LineBreak,
///         InsertPiece::Text("two".into()),
///         InsertPiece::LineBreak,
///     ]
/// );
/// ```
pub fn split_lines(text: &str) -> Vec<InsertPiece> {
    let mut pieces = Vec::new();
    let mut run = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if !run.is_empty() {
                    pieces.push(InsertPiece::Text(std::mem::take(&mut run)));
                }
                pieces.push(InsertPiece::LineBreak);
            }
            _ => run.push(ch),
        }
    }
    if !run.is_empty() {
        pieces.push(InsertPiece::Text(run));
    }
    pieces
}

/// Replace the content of `range` with `new_text` and notify the host.
///
/// The range must have been resolved against the host's current revision;
/// otherwise [`ReplaceError::StaleRange`] is returned and nothing changes.
///
/// The edit is not atomic. If insertion fails after the deletion went
/// through, the host is still notified of the change before the error is
/// returned, so its listeners see the partially edited content.
pub fn replace_range<H>(
    host: &mut H,
    range: &DocumentRange<H::Node>,
    new_text: &str,
) -> Result<(), ReplaceError>
where
    H: RangeHost + ?Sized,
{
    let document = host.revision();
    if range.revision != document {
        return Err(ReplaceError::StaleRange {
            range: range.revision,
            document,
        });
    }
    if range.text_range.start >= range.text_range.end {
        return Err(ReplaceError::InvalidRange(format!(
            "empty text range {:?}",
            range.text_range
        )));
    }

    let caret = host.delete(range)?;
    let pieces = split_lines(new_text);
    let inserted = host.insert(&caret, &pieces);
    host.dispatch_change();
    if let Err(err) = inserted {
        warn!(
            start = range.text_range.start,
            end = range.text_range.end,
            error = %err,
            "replace_insert_failed"
        );
        return Err(err);
    }

    debug!(
        start = range.text_range.start,
        end = range.text_range.end,
        inserted_len = new_text.len(),
        pieces = pieces.len(),
        "range_replaced"
    );
    Ok(())
}
