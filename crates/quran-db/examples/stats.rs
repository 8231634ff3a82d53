use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use quran_db::{Corpus, LoadMode, LoadOptions};
use quran_types::{PartitionKind, Scope};

fn main() -> Result<()> {
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p quran-db --example stats -- <path-to-quran-data>")?;

    let options = LoadOptions {
        mode: LoadMode::Mmap,
        ..LoadOptions::default()
    };
    let corpus = Corpus::load_with(&data_dir, &options)
        .with_context(|| format!("loading corpus from {}", data_dir.display()))?;

    println!("Data dir     : {}", data_dir.display());
    println!("Text mode    : {}", corpus.text_mode());
    println!("Chapters     : {}", corpus.chapter_count());
    println!("Verses       : {}", corpus.verse_count());
    println!("Words        : {}", corpus.word_count());
    println!("Letters      : {}", corpus.letter_count());
    println!("Unique letters: {}", corpus.unique_letters().len());
    for kind in PartitionKind::ALL {
        println!("{:<13}: {}", kind.name(), corpus.partition_count(kind));
    }

    let distinct_words = corpus
        .words()
        .filter(|w| {
            let tally = w.tally(Scope::Book);
            tally.occurrence == tally.frequency
        })
        .count();
    println!("Distinct words: {}", distinct_words);
    println!(
        "Translations : {}",
        corpus.translation_ids().collect::<Vec<_>>().join(", ")
    );

    Ok(())
}
