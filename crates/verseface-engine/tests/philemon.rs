use std::path::PathBuf;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use verseface_engine::{AnalysisSet, VerseRef, annotate, io, parse_usfm};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
}

#[test]
fn parses_philemon_excerpt() {
    let book = io::read_book(&fixture("58-PHM.usfm")).unwrap();

    assert_eq!(book.book_id(), Some("PHM"));
    assert_eq!(book.len(), 1);
    assert_eq!(book.verse_count(), 11);

    let refs = book
        .verses()
        .map(|(reference, _)| reference.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    assert_snapshot!(refs, @"PHM 1:1 PHM 1:2 PHM 1:3 PHM 1:4 PHM 1:5 PHM 1:6 PHM 1:7 PHM 1:8 PHM 1:9 PHM 1:10 PHM 1:11");
}

#[test]
fn philemon_verses_are_clean_text() {
    let book = io::read_book(&fixture("58-PHM.usfm")).unwrap();
    let verse = |reference: &str| {
        let reference: VerseRef = reference.parse().unwrap();
        book.lookup(&reference).unwrap().to_string()
    };

    assert_eq!(
        verse("PHM 1:1"),
        "Paul, a prisoner of Christ Jesus, and Timothy our brother, to Philemon, our beloved fellow worker,"
    );
    // Section headings are not verse boundaries
    assert_eq!(
        verse("PHM 1:3"),
        "Grace to you and peace from God our Father and the Lord Jesus Christ. Philemon’s Love and Faith"
    );
    assert_eq!(
        verse("PHM 1:7"),
        "For we have much joy and comfort in your love, because the hearts of the saints have been refreshed through you, brother. Paul’s Plea for Onesimus"
    );
    // Word-alignment spans go with their content
    assert_eq!(
        verse("PHM 1:10"),
        "I you for my child Onesimus, whom I have become the father of in my chains,"
    );
    // Only the tag of `\add*` goes; its `*` stays in the text
    assert_eq!(
        verse("1:11"),
        "who * once was useless to you, but now is useful to you and to me."
    );
}

#[test]
fn every_verse_survives_a_reparse_unchanged() {
    let book = io::read_book(&fixture("58-PHM.usfm")).unwrap();

    for (reference, text) in book.verses() {
        let again = parse_usfm(&format!(
            "\\c {} \\v {} {text}",
            reference.chapter, reference.verse
        ));
        assert_eq!(
            again.verse(reference.chapter, reference.verse),
            Some(text),
            "reparse changed {reference}"
        );
    }
}

#[test]
fn csv_ground_truth_joins_onto_the_book() {
    let book = io::read_book(&fixture("58-PHM.usfm")).unwrap();
    let rows = io::read_rows(&fixture("philemon_face_ground_truth.csv")).unwrap();

    // Blank line is dropped, quoted newline stays inside its field
    assert_eq!(rows.len(), 5);
    assert_eq!(
        rows[2][3],
        "Paul waives his right to command,\nand appeals instead"
    );

    let analyses = AnalysisSet::from_csv_rows(&rows).unwrap();
    assert_eq!(analyses.len(), 4);

    let seven = analyses.get(1, 7).unwrap();
    assert_eq!(seven.face(), Some("Enhance Positive Face"));
    assert_eq!(
        seven.analysis(),
        Some("Praise of Philemon's love, \"refreshing\" the saints")
    );

    let annotated = annotate(&book, &analyses);
    assert_eq!(annotated.len(), 11);
    let with_analysis: Vec<String> = annotated
        .iter()
        .filter(|v| v.analysis.is_some())
        .map(|v| v.reference.to_string())
        .collect();
    assert_eq!(with_analysis, vec!["PHM 1:7", "PHM 1:8", "PHM 1:9"]);

    let unmatched = analyses.unmatched(&book);
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].verse, 30);
}

#[test]
fn json_chapter_analysis_merges_with_csv() {
    let mut analyses = io::read_analysis(&fixture("philemon_face_ground_truth.csv")).unwrap();
    analyses.extend(io::read_analysis(&fixture("philemon_chapter_1.json")).unwrap());

    assert_eq!(analyses.len(), 5);
    // The JSON record for 1:8 replaced the CSV one
    assert_eq!(analyses.get(1, 8).unwrap().field("score"), Some("8"));
    assert_eq!(
        analyses.get(1, 10).unwrap().analysis(),
        Some("Kinship language softens the request")
    );
}

#[test]
fn book_serializes_to_plain_json_mapping() {
    let book = parse_usfm("\\c 2 \\v 1 b \\c 1 \\v 2 a2 \\v 1 a1");
    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"1": {"1": "a1", "2": "a2"}, "2": {"1": "b"}})
    );
}
