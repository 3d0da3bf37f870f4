use std::collections::HashSet;
use std::ops::Range;
use std::time::Instant;

use document::{index, TextIndex, TextTree};
use ingest::Annotation;
use normalize::{normalize_with, NormalizedText};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::metrics::metrics_recorder;
use crate::types::{
    AnnotationMatch, MatchConfig, MatchError, MatchOutcome, MatchStats, TextMatch, TextMatchPass,
};

#[cfg(test)]
mod tests;

/// Annotations that can take part in matching, in their original order.
/// `annotation_index` values refer to positions in this list.
pub fn active_annotations(annotations: &[Annotation]) -> Vec<&Annotation> {
    annotations.iter().filter(|a| a.is_matchable()).collect()
}

/// Anchors annotation snippets onto document text.
///
/// Matching is read-only: it never touches the document or the annotation
/// list. Each pass normalizes the document once and searches every snippet
/// independently for its leftmost occurrence.
#[derive(Debug, Clone)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    pub fn new(cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Locate snippets in flattened text. Ranges are raw byte offsets into
    /// `full_text`.
    pub fn match_text(&self, full_text: &str, annotations: &[Annotation]) -> TextMatchPass {
        let start = Instant::now();
        let pass = self.text_pass(full_text, annotations);
        record_pass(&pass.stats(), start);
        pass
    }

    /// Locate snippets and resolve them through the span table of `index`.
    pub fn match_index<N: Clone>(
        &self,
        index: &TextIndex<N>,
        annotations: &[Annotation],
    ) -> MatchOutcome<N> {
        let start = Instant::now();
        let pass = self.text_pass(&index.full_text, annotations);

        let mut hits = Vec::with_capacity(pass.matches.len());
        let mut matched_ids = HashSet::with_capacity(pass.matches.len());
        for found in pass.matches {
            let Some(range) = index.resolve(found.text_range.clone()) else {
                warn!(
                    annotation_id = %found.annotation_id,
                    start = found.text_range.start,
                    end = found.text_range.end,
                    "annotation_unresolved"
                );
                continue;
            };
            matched_ids.insert(found.annotation_id.clone());
            hits.push(AnnotationMatch {
                annotation_id: found.annotation_id,
                annotation_index: found.annotation_index,
                range,
                end_fallback: found.end_fallback,
            });
        }

        let stats = MatchStats::new(pass.provided, hits.len());
        record_pass(&stats, start);
        MatchOutcome {
            hits,
            matched_ids,
            stats,
        }
    }

    /// Index `tree` and match against it. An unmounted tree yields no hits.
    pub fn match_document<T>(
        &self,
        tree: &T,
        annotations: &[Annotation],
    ) -> MatchOutcome<T::Node>
    where
        T: TextTree + ?Sized,
    {
        self.match_index(&index(tree), annotations)
    }

    fn text_pass(&self, full_text: &str, annotations: &[Annotation]) -> TextMatchPass {
        let active = active_annotations(annotations);
        let haystack = normalize_with(full_text, &self.cfg.normalize);

        let matches = active
            .iter()
            .enumerate()
            .filter_map(|(annotation_index, annotation)| {
                let found = self.locate(full_text, &haystack, annotation);
                if found.is_none() {
                    debug!(annotation_id = %annotation.id, "annotation_unmatched");
                }
                found.map(|(text_range, end_fallback)| TextMatch {
                    annotation_id: annotation.id.clone(),
                    annotation_index,
                    text_range,
                    end_fallback,
                })
            })
            .collect();

        TextMatchPass {
            matches,
            provided: active.len(),
        }
    }

    fn locate(
        &self,
        full_text: &str,
        haystack: &NormalizedText,
        annotation: &Annotation,
    ) -> Option<(Range<usize>, bool)> {
        let needle = normalize_with(annotation.original_text.trim(), &self.cfg.normalize);
        // A leading invisible mark can leave a collapsed space behind.
        let needle = needle.as_str().trim_matches(' ');

        let hit = haystack.find(needle)?;
        let span = haystack.raw_span(hit)?;
        let range = if self.cfg.snap_to_graphemes {
            snap_end_to_grapheme(full_text, span.range)
        } else {
            span.range
        };
        Some((range, span.end_fallback))
    }
}

/// Move `range.end` forward to the next grapheme cluster boundary.
fn snap_end_to_grapheme(text: &str, range: Range<usize>) -> Range<usize> {
    let tail = &text[range.start..];
    let end = tail
        .grapheme_indices(true)
        .map(|(offset, _)| range.start + offset)
        .find(|boundary| *boundary >= range.end)
        .unwrap_or(text.len());
    range.start..end
}

fn record_pass(stats: &MatchStats, start: Instant) {
    let latency = start.elapsed();
    debug!(
        provided = stats.provided,
        matched = stats.matched,
        unmatched = stats.unmatched,
        elapsed_micros = latency.as_micros(),
        "match_pass"
    );
    if let Some(recorder) = metrics_recorder() {
        recorder.record_pass(stats, latency);
    }
}
