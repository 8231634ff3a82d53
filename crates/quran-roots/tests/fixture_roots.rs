use std::path::PathBuf;

use quran_db::Corpus;
use quran_roots::RootIndex;
use quran_types::TextLocationInWord;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("quran-db")
        .join("tests")
        .join("fixtures")
        .join("mini")
}

fn corpus() -> Corpus {
    Corpus::load(fixture_dir()).expect("load fixtures")
}

#[test]
fn indexes_every_attached_root() {
    let corpus = corpus();
    let index = RootIndex::new(&corpus);
    let roots: Vec<_> = index.roots().collect();
    assert_eq!(
        roots,
        vec!["اله", "تقي", "حمد", "ربب", "رحم", "ريب", "سمو", "علم", "كتب", "هدي", "وقي"]
    );
    assert_eq!(index.words_for_root("رحم").len(), 6);
    assert_eq!(index.words_for_root("تقي"), index.words_for_root("وقي"));
}

#[test]
fn resolves_surface_forms_from_the_text() {
    let corpus = corpus();
    let index = RootIndex::new(&corpus);
    assert_eq!(index.best_root("ٱلرَّحِيمِ").as_deref(), Some("رحم"));
    assert_eq!(index.best_root("الرحيم").as_deref(), Some("رحم"));
    assert_eq!(index.best_root("والله").as_deref(), Some("اله"));
}

#[test]
fn related_verses_follow_document_order() {
    let corpus = corpus();
    let index = RootIndex::new(&corpus);
    let name = corpus.word(1).expect("second word");
    let addresses: Vec<_> = index
        .related_verses(&name)
        .iter()
        .map(|v| v.address())
        .collect();
    assert_eq!(addresses, vec!["1:1", "1:2", "2:1"]);

    let mercy: Vec<_> = index
        .related_verses_for_text("رحيم")
        .iter()
        .map(|v| v.address())
        .collect();
    assert_eq!(mercy, vec!["1:1", "1:3", "2:1"]);
}

#[test]
fn roots_matching_respects_the_verse_subset() {
    let corpus = corpus();
    let index = RootIndex::new(&corpus);
    let all: Vec<_> = corpus.verses().collect();
    let everywhere = index.roots_matching(&all, "ر", TextLocationInWord::AtStart);
    assert_eq!(everywhere.get("رحم"), Some(&6));
    assert_eq!(everywhere.get("ربب"), Some(&1));
    assert_eq!(everywhere.get("ريب"), Some(&1));

    let opening: Vec<_> = corpus
        .chapter_by_number(1)
        .expect("chapter 1")
        .verses()
        .collect();
    let in_opening = index.roots_matching(&opening, "ر", TextLocationInWord::AtStart);
    assert_eq!(in_opening.get("رحم"), Some(&4));
    assert_eq!(in_opening.get("ريب"), None);
}
