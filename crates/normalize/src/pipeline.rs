use unicode_categories::UnicodeCategories;
use unicode_normalization::char::decompose_canonical;

use crate::config::{DiacriticPolicy, NormalizeConfig};
use crate::text::NormalizedText;
use crate::whitespace::{is_arabic_diacritic, is_invisible_mark};

/// Normalize with the base (editor) profile.
pub fn normalize(raw: &str) -> NormalizedText {
    normalize_with(raw, &NormalizeConfig::editor())
}

/// Main entry point. Canonicalizes `raw` for matching and records, for each
/// surviving char, the raw char it came from.
///
/// Passes, in order, over each raw char:
/// 1. invisible marks are dropped,
/// 2. diacritics are dropped per [`DiacriticPolicy`],
/// 3. any whitespace run becomes one ASCII space.
///
/// Dropped chars never break a whitespace run, so `"a \u{200B} b"` still
/// collapses to `"a b"`. Leading and trailing whitespace is kept (as a single
/// space) so that offsets stay total over the raw string.
pub fn normalize_with(raw: &str, cfg: &NormalizeConfig) -> NormalizedText {
    let mut out = NormalizedText::with_capacity(raw.len());
    let mut in_whitespace = false;

    for (raw_offset, ch) in raw.char_indices() {
        let raw_len = ch.len_utf8();

        if is_invisible_mark(ch) {
            continue;
        }

        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ', raw_offset, raw_len);
                in_whitespace = true;
            }
            continue;
        }

        let emitted = match cfg.diacritics {
            DiacriticPolicy::Keep => {
                out.push(ch, raw_offset, raw_len);
                true
            }
            DiacriticPolicy::Arabic => {
                if is_arabic_diacritic(ch) {
                    false
                } else {
                    out.push(ch, raw_offset, raw_len);
                    true
                }
            }
            DiacriticPolicy::AllMarks => push_without_marks(&mut out, ch, raw_offset, raw_len),
        };

        if emitted {
            in_whitespace = false;
        }
    }

    out
}

/// Decompose `ch` canonically and keep only its non-mark parts. Every kept
/// part points at the same raw char.
fn push_without_marks(out: &mut NormalizedText, ch: char, raw_offset: usize, raw_len: usize) -> bool {
    if is_arabic_diacritic(ch) {
        return false;
    }
    let mut emitted = false;
    decompose_canonical(ch, |part| {
        if part.is_mark_nonspacing() || part.is_mark_enclosing() {
            return;
        }
        out.push(part, raw_offset, raw_len);
        emitted = true;
    });
    emitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_document(raw: &str) -> NormalizedText {
        normalize_with(raw, &NormalizeConfig::long_document())
    }

    fn all_marks(raw: &str) -> NormalizedText {
        normalize_with(
            raw,
            &NormalizeConfig {
                version: 1,
                diacritics: DiacriticPolicy::AllMarks,
            },
        )
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("a   b\n\nc").as_str(), "a b c");
        assert_eq!(normalize("a\t\u{00A0}\u{2028}b").as_str(), "a b");
    }

    #[test]
    fn keeps_single_edge_space() {
        assert_eq!(normalize("  a  ").as_str(), " a ");
    }

    #[test]
    fn strips_zero_width_and_bidi_marks() {
        assert_eq!(normalize("a\u{200B}b").as_str(), "ab");
        assert_eq!(normalize("\u{FEFF}\u{202B}x\u{202C}\u{200F}").as_str(), "x");
    }

    #[test]
    fn invisible_mark_inside_whitespace_run_does_not_split_it() {
        assert_eq!(normalize("a \u{200B} b").as_str(), "a b");
    }

    #[test]
    fn case_is_preserved() {
        assert_eq!(normalize("Hello WORLD").as_str(), "Hello WORLD");
    }

    #[test]
    fn editor_profile_keeps_arabic_diacritics() {
        let raw = "مُحَمَّد";
        assert_eq!(normalize(raw).as_str(), raw);
    }

    #[test]
    fn long_document_profile_strips_arabic_diacritics() {
        assert_eq!(long_document("مُحَمَّد").as_str(), "محمد");
        assert_eq!(long_document("إِلَىٰ").as_str(), "إلى");
    }

    #[test]
    fn stripped_diacritic_between_spaces_collapses() {
        assert_eq!(long_document("a \u{064E} b").as_str(), "a b");
    }

    #[test]
    fn all_marks_profile_folds_latin_accents() {
        assert_eq!(all_marks("café").as_str(), "cafe");
        assert_eq!(all_marks("Cafe\u{0301}").as_str(), "Cafe");
        assert_eq!(all_marks("مُحَمَّد").as_str(), "محمد");
    }

    #[test]
    fn all_marks_points_decomposed_parts_at_raw_char() {
        let raw = "xé";
        let norm = all_marks(raw);
        assert_eq!(norm.as_str(), "xe");
        assert_eq!(norm.orig_index_by_norm_index(), vec![0, 1]);
        assert_eq!(norm.origins()[1].raw_len, 2);
    }

    #[test]
    fn reverse_map_points_at_producing_chars() {
        let raw = "a\u{200B}b \nc";
        let norm = normalize(raw);
        assert_eq!(norm.as_str(), "ab c");
        assert_eq!(norm.orig_index_by_norm_index(), vec![0, 4, 5, 7]);
        assert_eq!(norm.char_count(), norm.as_str().chars().count());
    }

    #[test]
    fn empty_and_invisible_only_inputs() {
        assert!(normalize("").is_empty());
        assert!(normalize("\u{200B}\u{FEFF}").is_empty());
        assert_eq!(normalize(" \u{200B} ").as_str(), " ");
    }
}
