use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use quran_db::Corpus;
use quran_roots::RootIndex;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p quran-roots --example lookup -- <data-dir> <word>...")?;
    let words: Vec<String> = args.collect();
    if words.is_empty() {
        bail!("usage: cargo run -p quran-roots --example lookup -- <data-dir> <word>...");
    }

    let corpus = Corpus::load(&data_dir)
        .with_context(|| format!("loading corpus from {}", data_dir.display()))?;
    let index = RootIndex::new(&corpus);

    println!("Data dir: {}", data_dir.display());
    println!("Roots   : {}", index.root_count());

    for word in words {
        println!("\nSurface: {}", word);
        let Some(root) = index.best_root(&word) else {
            println!("  no root");
            continue;
        };
        let verses = index.related_verses_for_text(&word);
        println!("  root    : {}", root);
        println!("  words   : {}", index.words_for_root(&root).len());
        println!(
            "  verses  : {}",
            verses
                .iter()
                .take(10)
                .map(|v| v.address())
                .collect::<Vec<_>>()
                .join(" ")
        );
    }

    Ok(())
}
