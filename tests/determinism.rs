use annotext::{
    ingest, normalize, AnnotationSource, CellMetrics, IngestConfig, MatchConfig, Matcher,
    MemoryDocument, MonospaceLayout, OverlayConfig, OverlayEngine, RawAnnotationPayload, Size,
};

const BODY: &str = r#"[
    {"original_text": "the Supplier", "suggested_text": "the Vendor"},
    {"original_text": "thirty days", "suggested_text": "30 days", "severity": "low"}
]"#;

fn payload() -> RawAnnotationPayload {
    RawAnnotationPayload::new(AnnotationSource::Suggestions, BODY)
}

#[test]
fn generated_ids_are_stable_across_batches() {
    let cfg = IngestConfig::default();
    let a = ingest(payload(), &cfg).expect("first");
    let b = ingest(payload(), &cfg).expect("second");

    assert_ne!(a.batch_id, b.batch_id);
    let ids_a: Vec<_> = a.annotations.iter().map(|x| x.id.clone()).collect();
    let ids_b: Vec<_> = b.annotations.iter().map(|x| x.id.clone()).collect();
    assert_eq!(ids_a, ids_b);
    assert_ne!(ids_a[0], ids_a[1]);
}

#[test]
fn first_occurrence_wins_every_time() {
    let doc = MemoryDocument::from_text("Pay the Supplier, then notify the Supplier in thirty days.");
    let annotations = ingest(payload(), &IngestConfig::default())
        .expect("valid")
        .annotations;
    let matcher = Matcher::new(MatchConfig::default()).expect("valid config");

    let first = matcher.match_document(&doc, &annotations);
    for _ in 0..10 {
        let again = matcher.match_document(&doc, &annotations);
        assert_eq!(again.hits, first.hits);
    }
    assert_eq!(first.hits[0].range.text_range, 4..16);
}

#[test]
fn recompute_is_idempotent() {
    let doc = MemoryDocument::from_text("Pay the Supplier within thirty days of delivery.");
    let annotations = ingest(payload(), &IngestConfig::default())
        .expect("valid")
        .annotations;
    let layout = MonospaceLayout::new(CellMetrics::default(), Size::new(160.0, 400.0));
    let mut engine =
        OverlayEngine::new(MatchConfig::default(), OverlayConfig::default()).expect("valid");

    engine.recompute(&doc, &layout, &annotations);
    let hits = engine.hits().to_vec();
    let highlights = engine.highlights(&annotations);
    engine.recompute(&doc, &layout, &annotations);
    assert_eq!(engine.hits(), hits.as_slice());
    assert_eq!(engine.highlights(&annotations), highlights);
}

#[test]
fn equivalent_spellings_normalize_alike() {
    let a = normalize(" Hello \u{200B}  world\u{FEFF} ");
    let b = normalize(" Hello world ");
    assert_eq!(a.as_str(), b.as_str());
    assert_eq!(normalize("a   b\n\nc").as_str(), "a b c");
    assert_eq!(normalize("a\u{200B}b").as_str(), "ab");
}
