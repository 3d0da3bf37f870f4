//! Annotext normalization layer.
//!
//! Canonicalizes rendered document text so that annotation snippets can be
//! found in it despite invisible formatting noise, while keeping a map from
//! every normalized char back to the raw offset that produced it.
//!
//! ## What we do
//!
//! - Drop zero-width and bidi control marks (no placeholder is kept)
//! - Optionally drop diacritics ([`DiacriticPolicy`])
//! - Collapse any run of Unicode whitespace into one ASCII space
//! - Record a [`CharOrigin`] per surviving char for exact reverse mapping
//!
//! ## What we never do
//!
//! Change case, stem, or substitute synonyms. Matching downstream is
//! case-sensitive and exact after these passes.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clocks, no locale. [`normalize`] can be called repeatedly and
//! from any thread; same input and config give the same output.
//!
//! ## Invariants worth knowing
//!
//! - `origins().len()` equals the number of chars in the normalized text
//! - origins are strictly increasing in `norm_offset` and non-decreasing in
//!   `raw_offset`
//! - `normalize(normalize(s).as_str())` equals `normalize(s)` as text

mod config;
mod error;
mod pipeline;
mod text;
mod whitespace;

pub use crate::config::{DiacriticPolicy, NormalizeConfig};
pub use crate::error::NormalizeError;
pub use crate::pipeline::{normalize, normalize_with};
pub use crate::text::{CharOrigin, NormalizedText, RawSpan};
pub use crate::whitespace::{collapse_whitespace, is_arabic_diacritic, is_invisible_mark};

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILES: [DiacriticPolicy; 3] = [
        DiacriticPolicy::Keep,
        DiacriticPolicy::Arabic,
        DiacriticPolicy::AllMarks,
    ];

    #[test]
    fn normalization_is_idempotent_across_profiles() {
        let samples = [
            "a   b\n\nc",
            " lead and trail ",
            "x\u{200B}\u{200F}y",
            "يجب على الموظف الالتزام  بالنظام",
            "مُحَمَّد  \u{FEFF} café",
        ];
        for diacritics in PROFILES {
            let cfg = NormalizeConfig {
                version: 1,
                diacritics,
            };
            for raw in samples {
                let once = normalize_with(raw, &cfg);
                let twice = normalize_with(once.as_str(), &cfg);
                assert_eq!(once.as_str(), twice.as_str(), "{diacritics:?} {raw:?}");
            }
        }
    }

    #[test]
    fn double_space_scenario_matches_single_space_needle() {
        let cfg = NormalizeConfig::long_document();
        let raw = "يجب على الموظف الالتزام  بالنظام";
        let haystack = normalize_with(raw, &cfg);
        let needle = normalize_with("الالتزام بالنظام", &cfg);

        let hit = haystack.find(needle.as_str()).expect("needle found");
        let span = haystack.raw_span(hit).expect("span mapped");
        assert_eq!(&raw[span.range], "الالتزام  بالنظام");
    }

    #[test]
    fn origins_are_monotonic() {
        let norm = normalize_with(
            "a\u{200B} \t é\u{0301}  z",
            &NormalizeConfig {
                version: 1,
                diacritics: DiacriticPolicy::AllMarks,
            },
        );
        for pair in norm.origins().windows(2) {
            assert!(pair[0].norm_offset < pair[1].norm_offset);
            assert!(pair[0].raw_offset <= pair[1].raw_offset);
        }
    }
}
