//! Character classes shared by the normalizer and its callers.
//!
//! Whitespace follows Unicode's `White_Space` property (`char::is_whitespace`).
//! Invisible marks are the zero-width and bidirectional control characters
//! that editors sprinkle into rendered text without any visible effect:
//!
//! | range              | what                                   |
//! |--------------------|----------------------------------------|
//! | U+200B..=U+200F    | zero-width space/joiners, LRM, RLM     |
//! | U+202A..=U+202E    | bidi embeddings and overrides          |
//! | U+FEFF             | zero-width no-break space / BOM        |

/// Zero-width and bidi control characters dropped by every profile.
pub fn is_invisible_mark(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{FEFF}')
}

/// Arabic harakat (fathatan through wavy hamza below) and the superscript alef.
pub fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Tidies a display string: whitespace runs become one space, invisible
/// marks are dropped and the ends are trimmed.
///
/// Unlike [`normalize`](crate::normalize) this keeps no position map; ingest
/// runs it over annotation reasons and legal references before they reach a
/// tooltip.
///
/// ```rust
/// use normalize::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  see   art.\u{200B} 12  "), "see art. 12");
/// assert_eq!(collapse_whitespace("tone\r\n\tissue"), "tone issue");
/// assert_eq!(collapse_whitespace("   \n\u{FEFF}   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if is_invisible_mark(ch) {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invisible_marks_cover_documented_ranges() {
        for ch in ['\u{200B}', '\u{200C}', '\u{200D}', '\u{200E}', '\u{200F}'] {
            assert!(is_invisible_mark(ch), "{:?}", ch);
        }
        for ch in ['\u{202A}', '\u{202C}', '\u{202E}', '\u{FEFF}'] {
            assert!(is_invisible_mark(ch), "{:?}", ch);
        }
        assert!(!is_invisible_mark('\u{2010}'));
        assert!(!is_invisible_mark('\u{202F}'));
        assert!(!is_invisible_mark(' '));
    }

    #[test]
    fn arabic_diacritics_exclude_letters() {
        // fatha, kasra, shadda, sukun, superscript alef
        for ch in ['\u{064E}', '\u{0650}', '\u{0651}', '\u{0652}', '\u{0670}'] {
            assert!(is_arabic_diacritic(ch));
        }
        // alef, lam, tatweel
        for ch in ['\u{0627}', '\u{0644}', '\u{0640}'] {
            assert!(!is_arabic_diacritic(ch));
        }
    }

    #[test]
    fn collapse_handles_unicode_whitespace() {
        assert_eq!(collapse_whitespace("a\u{00A0}\u{2003}b"), "a b");
    }

    #[test]
    fn collapse_drops_marks_without_splitting_words() {
        assert_eq!(collapse_whitespace("fo\u{200D}o \u{202B}bar"), "foo bar");
        assert_eq!(collapse_whitespace("\u{200F} lead"), "lead");
    }
}
