use super::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use document::MemoryDocument;
use ingest::AnnotationId;
use normalize::NormalizeConfig;

use crate::metrics::{set_match_metrics, MatchMetrics};

fn annotation(id: &str, original: &str) -> Annotation {
    Annotation::new(id, original, format!("{original} (revised)"))
}

fn matcher() -> Matcher {
    Matcher::new(MatchConfig::default()).expect("default config is valid")
}

#[test]
fn double_space_in_document_matches_single_space_snippet() {
    let doc = MemoryDocument::from_text("يجب على الموظف الالتزام  بالنظام");
    let annotations = vec![annotation("a1", "الالتزام بالنظام")];

    let outcome = matcher().match_document(&doc, &annotations);

    assert_eq!(outcome.stats, MatchStats::new(1, 1));
    let hit = &outcome.hits[0];
    let full = index(&doc).full_text;
    assert_eq!(&full[hit.range.text_range.clone()], "الالتزام  بالنظام");
    assert!(!hit.end_fallback);
}

#[test]
fn first_occurrence_wins_deterministically() {
    let text = "X and X";
    let annotations = vec![annotation("x", "X")];
    let m = matcher();
    for _ in 0..5 {
        let pass = m.match_text(text, &annotations);
        assert_eq!(pass.matches.len(), 1);
        assert_eq!(pass.matches[0].text_range, 0..1);
    }
}

#[test]
fn blank_snippets_are_not_provided() {
    let annotations = vec![
        annotation("blank", "   "),
        annotation("empty", ""),
        annotation("real", "text"),
    ];
    let pass = matcher().match_text("some text", &annotations);
    assert_eq!(pass.provided, 1);
    assert_eq!(pass.matches[0].annotation_id.as_str(), "real");
    assert_eq!(pass.matches[0].annotation_index, 0);
}

#[test]
fn unmatched_annotations_are_counted() {
    let doc = MemoryDocument::from_paragraphs(["The tenant shall pay rent.", "Notice is due monthly."]);
    let annotations = vec![
        annotation("1", "tenant"),
        annotation("2", "shall pay"),
        annotation("3", "landlord"),
        annotation("4", "Notice is due"),
        annotation("5", "annually"),
    ];
    let outcome = matcher().match_document(&doc, &annotations);
    assert_eq!(
        outcome.stats,
        MatchStats {
            provided: 5,
            matched: 3,
            unmatched: 2
        }
    );
    assert!(outcome.matched_ids.contains(&AnnotationId::from("4")));
    assert!(!outcome.matched_ids.contains(&AnnotationId::from("3")));
    assert!(outcome.hit_for(&AnnotationId::from("5")).is_none());
}

#[test]
fn annotation_index_counts_only_active_entries() {
    let annotations = vec![
        annotation("skip", " "),
        annotation("first", "alpha"),
        annotation("second", "beta"),
    ];
    let pass = matcher().match_text("alpha beta", &annotations);
    let indices: Vec<_> = pass.matches.iter().map(|m| m.annotation_index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn match_spanning_runs_resolves_both_nodes() {
    let mut doc = MemoryDocument::new();
    doc.push_runs(["The ", "quick", " brown fox"]);
    let outcome = matcher().match_document(&doc, &[annotation("q", "quick brown")]);
    let idx = index(&doc);
    let hit = &outcome.hits[0];
    assert_eq!(hit.range.start.node, idx.spans[1].node);
    assert_eq!(hit.range.start.offset, 0);
    assert_eq!(hit.range.end.node, idx.spans[2].node);
    assert_eq!(hit.range.end.offset, " brown".len());
}

#[test]
fn zero_width_marks_inside_document_are_skipped() {
    let pass = matcher().match_text("xx a\u{200B}b yy", &[annotation("ab", "ab")]);
    assert_eq!(pass.matches[0].text_range, 3..8);
}

#[test]
fn matching_is_case_sensitive() {
    let pass = matcher().match_text("Hello world", &[annotation("h", "hello")]);
    assert!(pass.matches.is_empty());
    assert_eq!(pass.stats(), MatchStats::new(1, 0));
}

#[test]
fn snippet_with_leading_invisible_mark_still_matches() {
    let pass = matcher().match_text("one two", &[annotation("t", "\u{200B} two")]);
    assert_eq!(pass.matches[0].text_range, 4..7);
}

#[test]
fn unmounted_document_gives_no_hits() {
    let doc = MemoryDocument::unmounted();
    let outcome = matcher().match_document(&doc, &[annotation("a", "anything")]);
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.stats, MatchStats::new(1, 0));
}

#[test]
fn grapheme_snapping_keeps_trailing_marks() {
    let text = "إِلَىٰ البيت";
    let word_end = "إِلَىٰ".len();
    let annotations = [annotation("w", "إلى")];

    let snapped = matcher().match_text(text, &annotations);
    assert_eq!(snapped.matches[0].text_range, 0..word_end);

    let unsnapped = Matcher::new(MatchConfig {
        snap_to_graphemes: false,
        ..MatchConfig::default()
    })
    .expect("valid config")
    .match_text(text, &annotations);
    assert_eq!(unsnapped.matches[0].text_range, 0..word_end - '\u{0670}'.len_utf8());
}

#[test]
fn editor_profile_does_not_strip_diacritics() {
    let m = Matcher::new(MatchConfig::editor()).expect("valid config");
    let pass = m.match_text("مُحَمَّد", &[annotation("m", "محمد")]);
    assert!(pass.matches.is_empty());
}

#[test]
fn invalid_config_rejected() {
    let err = Matcher::new(MatchConfig {
        version: 1,
        normalize: NormalizeConfig {
            version: 0,
            ..NormalizeConfig::long_document()
        },
        snap_to_graphemes: true,
    })
    .expect_err("config should be invalid");
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}

#[derive(Default)]
struct RecordingMetrics {
    passes: Mutex<Vec<(MatchStats, Duration)>>,
}

impl MatchMetrics for RecordingMetrics {
    fn record_pass(&self, stats: &MatchStats, latency: Duration) {
        self.passes
            .lock()
            .expect("metrics lock")
            .push((*stats, latency));
    }
}

#[test]
fn metrics_recorder_sees_each_pass() {
    let recorder = Arc::new(RecordingMetrics::default());
    set_match_metrics(Some(recorder.clone()));

    let annotations: Vec<_> = (0..7).map(|i| annotation(&i.to_string(), "zz-metrics")).collect();
    matcher().match_text("zz-metrics", &annotations);

    set_match_metrics(None);
    let passes = recorder.passes.lock().expect("metrics lock");
    assert!(passes
        .iter()
        .any(|(stats, _)| *stats == MatchStats::new(7, 7)));
}
