//! Normalized text together with its reverse position map.
//!
//! Every char of [`NormalizedText::as_str`] carries a [`CharOrigin`] naming
//! the raw char that produced it. Dropped characters (invisible marks,
//! stripped diacritics, the tail of a whitespace run) own no entry, so the
//! map has exactly one entry per normalized char.
//!
//! ```text
//! raw:         "a", "\u{200B}", "b", " ", "\n", "c"
//! raw offset:   0      1         4    5    6    7
//! normalized:  "a",   "b", " ", "c"
//! origins:      0      4    5    7
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Where a normalized char came from in the raw string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharOrigin {
    /// Byte offset of this char in the normalized text.
    pub norm_offset: usize,
    /// Byte offset of the producing char in the raw text.
    pub raw_offset: usize,
    /// UTF-8 width of the producing raw char.
    pub raw_len: usize,
}

impl CharOrigin {
    /// Exclusive raw end of the producing char.
    pub fn raw_end(&self) -> usize {
        self.raw_offset + self.raw_len
    }
}

/// A normalized range mapped back onto raw offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpan {
    /// Raw byte range, start inclusive, end exclusive.
    pub range: Range<usize>,
    /// True when the end could not be mapped and the range was shrunk to the
    /// first matched raw char.
    pub end_fallback: bool,
}

/// Output of [`normalize`](crate::normalize).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedText {
    text: String,
    origins: Vec<CharOrigin>,
}

impl NormalizedText {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            origins: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, ch: char, raw_offset: usize, raw_len: usize) {
        self.origins.push(CharOrigin {
            norm_offset: self.text.len(),
            raw_offset,
            raw_len,
        });
        self.text.push(ch);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Byte length of the normalized text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of normalized chars, equal to `origins().len()`.
    pub fn char_count(&self) -> usize {
        self.origins.len()
    }

    /// Per-char reverse map in normalized order.
    pub fn origins(&self) -> &[CharOrigin] {
        &self.origins
    }

    /// Raw byte offset for each normalized char, indexed by char position.
    pub fn orig_index_by_norm_index(&self) -> Vec<usize> {
        self.origins.iter().map(|o| o.raw_offset).collect()
    }

    /// Char position of the normalized char starting at `norm_offset`.
    ///
    /// Returns `None` when the offset is not a char boundary of the
    /// normalized text.
    pub fn char_index_at(&self, norm_offset: usize) -> Option<usize> {
        self.origins
            .binary_search_by_key(&norm_offset, |o| o.norm_offset)
            .ok()
    }

    /// Leftmost occurrence of `needle` as a normalized byte range.
    ///
    /// Empty needles never match.
    pub fn find(&self, needle: &str) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        self.text
            .find(needle)
            .map(|start| start..start + needle.len())
    }

    /// Map a normalized byte range back onto the raw text.
    ///
    /// The raw start is the producing offset of the first char. The raw end
    /// is the exclusive end of the char producing the last normalized char
    /// inside `norm`. If that lookup fails, the span falls back to the first
    /// char alone so callers still get a one-char range.
    pub fn raw_span(&self, norm: Range<usize>) -> Option<RawSpan> {
        if norm.start >= norm.end {
            return None;
        }
        let first = self.origins[self.char_index_at(norm.start)?];
        let last = self
            .origins
            .partition_point(|o| o.norm_offset < norm.end)
            .checked_sub(1)
            .map(|idx| self.origins[idx])
            .filter(|o| o.norm_offset >= first.norm_offset);

        Some(match last {
            Some(last) => RawSpan {
                range: first.raw_offset..last.raw_end().max(first.raw_end()),
                end_fallback: false,
            },
            None => RawSpan {
                range: first.raw_offset..first.raw_end(),
                end_fallback: true,
            },
        })
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
