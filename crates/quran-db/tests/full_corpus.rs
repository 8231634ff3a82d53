use std::env;
use std::path::PathBuf;

use quran_db::{Corpus, LoadMode, LoadOptions};
use quran_types::PartitionKind;

fn data_dir() -> Option<PathBuf> {
    env::var("QURAN_DIR").ok().map(PathBuf::from)
}

#[test]
fn loads_the_complete_book() {
    let Some(dir) = data_dir() else {
        eprintln!("skipping: QURAN_DIR not set");
        return;
    };
    let options = LoadOptions {
        mode: LoadMode::Mmap,
        ..LoadOptions::default()
    };
    let corpus = Corpus::load_with(&dir, &options).expect("load complete corpus");

    assert_eq!(corpus.chapter_count(), 114);
    assert_eq!(corpus.verse_count(), 6236);
    assert_eq!(corpus.partition_count(PartitionKind::Part), 30);
    assert!(corpus.word_count() > 77_000, "words too few");
    let throne = corpus.verse_at(2, 255).expect("2:255");
    assert_eq!(throne.chapter().number(), 2);
}
