use std::path::PathBuf;

use quran_db::loader::{load_translations, parse_verses};
use quran_db::{Corpus, LoadMode, LoadOptions};
use quran_types::{InitializationType, PartitionKind, ProstrationType, Scope, Stopmark};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("mini")
}

#[test]
fn loads_fixture_with_either_backing() {
    for mode in [LoadMode::Mmap, LoadMode::Owned] {
        let options = LoadOptions {
            mode,
            ..LoadOptions::default()
        };
        let corpus = Corpus::load_with(fixture_dir(), &options).expect("load fixtures");
        assert_eq!(corpus.chapter_count(), 2);
        assert_eq!(corpus.verse_count(), 5);
        assert_eq!(corpus.word_count(), 22);
    }
}

#[test]
fn applies_metadata_sections() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    let cow = corpus.chapter_by_number(2).expect("chapter 2");
    assert_eq!(cow.english_name(), "The Cow");
    assert_eq!(cow.bowing_count(), 40);
    assert_eq!(
        cow.initialization_type(),
        InitializationType::PartiallyInitialized
    );
    assert_eq!(
        corpus.verse_at(2, 2).and_then(|v| v.prostration()),
        Some(ProstrationType::Recommended)
    );

    let quarters: Vec<_> = corpus
        .partitions(PartitionKind::Quarter)
        .map(|p| p.verse_range())
        .collect();
    assert_eq!(quarters, vec![0..2, 2..4, 4..5]);
    assert_eq!(corpus.partition_count(PartitionKind::Group), 1);
    let second_page = corpus.partition(PartitionKind::Page, 1).expect("page 2");
    assert_eq!(second_page.chapters(), vec![cow]);
}

#[test]
fn tokenizes_stopmarks_and_opening_formula() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    let opening: Vec<_> = corpus
        .verse_at(2, 1)
        .expect("2:1")
        .words()
        .map(|w| w.stopmark())
        .collect();
    assert_eq!(opening[3], Stopmark::CanStop);
    assert_eq!(opening[4], Stopmark::MustStop);

    let first: Vec<_> = corpus
        .verse_at(1, 1)
        .expect("1:1")
        .words()
        .map(|w| w.stopmark())
        .collect();
    assert_eq!(first[3], Stopmark::MustStop);
    assert!(first[..3].iter().all(|m| *m == Stopmark::None));

    let book = corpus.verse_at(2, 2).expect("2:2");
    assert_eq!(book.word_count(), 7);
    let marks: Vec<_> = book.words().map(|w| w.stopmark()).collect();
    assert_eq!(marks[3], Stopmark::CanStopAtEither);
    assert_eq!(marks[4], Stopmark::CanStopAtEither);
}

#[test]
fn attaches_roots_and_translations() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    assert_eq!(corpus.word(0).map(|w| w.best_root()), Some("سمو"));
    let last = corpus.words().last().expect("words");
    assert_eq!(last.roots(), ["وقي".to_string(), "تقي".to_string()]);
    assert_eq!(corpus.word(14).map(|w| w.best_root()), Some(""));

    assert_eq!(corpus.translation_ids().collect::<Vec<_>>(), vec!["en"]);
    assert_eq!(
        corpus.verse_at(1, 2).and_then(|v| v.translation("en")),
        Some("Praise be to God, Lord of the Worlds.")
    );
}

#[test]
fn counts_repeated_words_across_chapters() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    let gracious: Vec<_> = corpus
        .words()
        .filter(|w| w.simplified_text() == "الرحمن")
        .collect();
    assert_eq!(gracious.len(), 3);
    assert_eq!(gracious[2].tally(Scope::Book).occurrence, 3);
    assert_eq!(gracious[2].tally(Scope::Chapter).occurrence, 1);
    assert!(gracious.iter().all(|w| w.tally(Scope::Book).frequency == 3));
}

#[test]
fn selected_translations_only() {
    let options = LoadOptions {
        translations: Some(vec!["fr".to_string()]),
        ..LoadOptions::default()
    };
    let mut corpus = Corpus::load_with(fixture_dir(), &options).expect("load fixtures");
    assert_eq!(corpus.translation_ids().count(), 0);

    let loaded = load_translations(
        &mut corpus,
        fixture_dir().join("translations"),
        &["en".to_string(), "fr".to_string()],
        LoadMode::Owned,
    );
    assert_eq!(loaded, vec!["en".to_string()]);
}

#[test]
fn reports_the_offending_file() {
    let tempdir = tempfile::tempdir().unwrap();
    std::fs::copy(
        fixture_dir().join("quran.txt"),
        tempdir.path().join("quran.txt"),
    )
    .unwrap();
    let err = Corpus::load(tempdir.path()).unwrap_err();
    assert!(err.to_string().contains("missing required corpus file"));

    std::fs::write(
        tempdir.path().join("metadata.txt"),
        "Chapter\tVerses\n1\t5\n",
    )
    .unwrap();
    let err = Corpus::load(tempdir.path()).unwrap_err();
    assert!(err.to_string().contains("metadata.txt:1 malformed Chapter header"));

    std::fs::write(tempdir.path().join("metadata.txt"), "Page\tChapter\tVerse\n1\t1\n").unwrap();
    let err = Corpus::load(tempdir.path()).unwrap_err();
    assert!(err.to_string().contains("metadata.txt:2 expected 3 columns"));

    std::fs::copy(
        fixture_dir().join("metadata.txt"),
        tempdir.path().join("metadata.txt"),
    )
    .unwrap();
    std::fs::write(tempdir.path().join("quran.txt"), "only one verse\n").unwrap();
    let err = Corpus::load(tempdir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("5 verses but 1 verse records"));
}

#[test]
fn verse_lines_keep_markers_in_raw_text() {
    let verses = parse_verses("ab ۚ cd\n", "inline").unwrap();
    assert_eq!(verses[0].text, "ab ۚ cd");
}

#[test]
fn partitions_cover_every_verse_once() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    for kind in PartitionKind::ALL {
        let mut next = 0;
        for partition in corpus.partitions(kind) {
            let range = partition.verse_range();
            assert_eq!(range.start, next, "{kind:?} {}", partition.number());
            assert!(!range.is_empty(), "{kind:?} {}", partition.number());
            for verse in partition.verses() {
                assert_eq!(verse.partition(kind).index(), partition.index());
            }
            next = range.end;
        }
        assert_eq!(next, corpus.verse_count(), "{kind:?}");
    }
}

#[test]
fn numbers_increase_and_restart_per_parent() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    let verses: Vec<_> = corpus.verses().map(|v| v.number()).collect();
    let words: Vec<_> = corpus.words().map(|w| w.number()).collect();
    let letters: Vec<_> = corpus.letters().map(|l| l.number()).collect();
    for numbers in [&verses, &words, &letters] {
        assert_eq!(numbers.first(), Some(&1));
        assert!(numbers.windows(2).all(|pair| pair[0] < pair[1]));
    }

    for chapter in corpus.chapters() {
        let in_chapter: Vec<_> = chapter.verses().map(|v| v.number_in_chapter()).collect();
        assert_eq!(in_chapter, (1..=chapter.verse_count()).collect::<Vec<_>>());
        let in_chapter: Vec<_> = chapter.words().map(|w| w.number_in_chapter()).collect();
        assert_eq!(in_chapter, (1..=chapter.word_count()).collect::<Vec<_>>());
        let in_chapter: Vec<_> = chapter.letters().map(|l| l.number_in_chapter()).collect();
        assert_eq!(in_chapter, (1..=chapter.letter_count()).collect::<Vec<_>>());
    }
    for verse in corpus.verses() {
        let in_verse: Vec<_> = verse.words().map(|w| w.number_in_verse()).collect();
        assert_eq!(in_verse, (1..=verse.word_count()).collect::<Vec<_>>());
        let in_verse: Vec<_> = verse.letters().map(|l| l.number_in_verse()).collect();
        assert_eq!(in_verse, (1..=verse.letter_count()).collect::<Vec<_>>());
    }
    for word in corpus.words() {
        let in_word: Vec<_> = word.letters().map(|l| l.number_in_word()).collect();
        assert_eq!(in_word, (1..=word.letter_count()).collect::<Vec<_>>());
    }
}
