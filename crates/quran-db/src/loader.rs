//! Read a corpus data directory from disk.
//!
//! Layout:
//! - `metadata.txt`: chapter and partition tables (see [`crate::metadata`])
//! - `quran.txt`: one verse per line, optionally `text<TAB>StopmarkName`
//! - `roots.txt` (optional): one `id<TAB>surface<TAB>root|root` row per word
//! - `translations/<id>.txt` (optional): one line per verse
//!
//! Files are either memory-mapped or read into owned buffers, chosen at
//! runtime via [`LoadMode`]. Buffers only live for the duration of a load;
//! the resulting [`Corpus`] owns its text.

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use memmap2::Mmap;
use quran_types::{SimplificationLevel, Stopmark, simplify};
use tracing::{debug, info, warn};

use crate::builder::CorpusBuilder;
use crate::corpus::Corpus;
use crate::metadata::load_metadata;
use crate::records::VerseRecord;

pub const METADATA_FILE: &str = "metadata.txt";
pub const VERSES_FILE: &str = "quran.txt";
pub const ROOTS_FILE: &str = "roots.txt";
pub const TRANSLATIONS_DIR: &str = "translations";

/// The single-letter conjunction; it takes itself as root and has no row in
/// the roots file.
const CONJUNCTION: &str = "و";

/// Strategy for loading data files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file (fast, zero-copy while parsing).
    #[default]
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadMode::Mmap => "mmap",
            LoadMode::Owned => "owned",
        })
    }
}

impl FromStr for LoadMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mmap" => Ok(LoadMode::Mmap),
            "owned" => Ok(LoadMode::Owned),
            other => anyhow::bail!("unknown load mode `{other}` (expected mmap or owned)"),
        }
    }
}

pub(crate) enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    pub(crate) fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

pub(crate) fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

pub(crate) fn load_text<T>(
    path: &Path,
    mode: LoadMode,
    parse: impl FnOnce(&str, &str) -> Result<T>,
) -> Result<T> {
    let buffer = load_file(path, mode)?;
    let text = std::str::from_utf8(buffer.as_slice())
        .with_context(|| format!("decode {}", path.display()))?;
    parse(text, &path.display().to_string())
}

/// Parse verse lines; blank lines are ignored and numbering follows line
/// order.
pub fn parse_verses(text: &str, source: &str) -> Result<Vec<VerseRecord>> {
    let mut verses = Vec::new();
    for (lineno, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let record = match line.split_once('\t') {
            Some((body, mark)) => {
                let stopmark: Stopmark = mark
                    .parse()
                    .with_context(|| format!("{source}:{} stopmark", lineno + 1))?;
                VerseRecord::new(verses.len() + 1, body.trim()).with_stopmark(stopmark)
            }
            None => VerseRecord::new(verses.len() + 1, line.trim()),
        };
        verses.push(record);
    }
    Ok(verses)
}

pub fn load_verses(path: impl AsRef<Path>, mode: LoadMode) -> Result<Vec<VerseRecord>> {
    load_text(path.as_ref(), mode, parse_verses)
}

/// Assign roots to every word in document order, replacing any roots
/// attached earlier. Returns the number of words that received roots.
pub fn attach_roots(corpus: &mut Corpus, text: &str, source: &str) -> Result<usize> {
    corpus.clear_roots();
    let conjunctions: Vec<bool> = corpus
        .words()
        .map(|w| simplify(w.text(), SimplificationLevel::Simplified28) == CONJUNCTION)
        .collect();
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let mut attached = 0;
    for (word, is_conjunction) in conjunctions.into_iter().enumerate() {
        if is_conjunction {
            corpus.attach_word_roots(word, vec![CONJUNCTION.to_string()]);
            attached += 1;
            continue;
        }
        let Some((lineno, line)) = rows.next() else {
            warn!(
                "{source}: ran out of rows at word {} of {}",
                word + 1,
                corpus.word_count()
            );
            break;
        };
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            anyhow::bail!("{source}:{lineno} expected 3 columns, found {}", fields.len());
        }
        let roots: Vec<String> = fields[2]
            .split('|')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        corpus.attach_word_roots(word, roots);
        attached += 1;
    }

    let extra = rows.count();
    if extra > 0 {
        warn!("{source}: {extra} rows past the last word ignored");
    }
    debug!("{source}: roots attached to {attached} words");
    Ok(attached)
}

pub fn load_roots(corpus: &mut Corpus, path: impl AsRef<Path>, mode: LoadMode) -> Result<usize> {
    load_text(path.as_ref(), mode, |text, source| {
        attach_roots(corpus, text, source)
    })
}

/// Identifiers of every `*.txt` file under `dir`, sorted.
pub fn available_translations(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("list {}", dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "txt")
            && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

/// Attach `<dir>/<id>.txt` for every id. Best effort: missing files are
/// skipped and failures are logged. Returns the ids that were attached.
pub fn load_translations(
    corpus: &mut Corpus,
    dir: impl AsRef<Path>,
    ids: &[String],
    mode: LoadMode,
) -> Vec<String> {
    let dir = dir.as_ref();
    let mut loaded = Vec::new();
    for id in ids {
        let path = dir.join(format!("{id}.txt"));
        if !path.exists() {
            debug!("translation {id} not found at {}", path.display());
            continue;
        }
        let result = load_text(&path, mode, |text, _| {
            Ok(corpus.attach_translation(id, text.lines().map(|l| l.trim_end_matches('\r'))))
        });
        match result {
            Ok(count) => {
                if count < corpus.verse_count() {
                    warn!(
                        "translation {id} covers {count} of {} verses",
                        corpus.verse_count()
                    );
                }
                loaded.push(id.clone());
            }
            Err(err) => warn!("skipping translation {id}: {err:#}"),
        }
    }
    loaded
}

/// Knobs for [`Corpus::load_with`].
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub mode: LoadMode,
    pub text_mode: SimplificationLevel,
    /// Translation ids to attach; `None` attaches every file found.
    pub translations: Option<Vec<String>>,
}

impl Corpus {
    /// Load a data directory with default options.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(dir, &LoadOptions::default())
    }

    pub fn load_with(dir: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let dir = dir.as_ref();
        for name in [METADATA_FILE, VERSES_FILE] {
            let path = dir.join(name);
            if !path.exists() {
                anyhow::bail!("missing required corpus file: {}", path.display());
            }
        }

        let metadata = load_metadata(dir.join(METADATA_FILE), options.mode)?;
        let verses = load_verses(dir.join(VERSES_FILE), options.mode)?;
        let mut corpus = CorpusBuilder::new(metadata)
            .text_mode(options.text_mode)
            .build(verses)
            .with_context(|| format!("build corpus from {}", dir.display()))?;

        let roots = dir.join(ROOTS_FILE);
        if roots.exists() {
            load_roots(&mut corpus, &roots, options.mode)?;
        } else {
            debug!("no roots file at {}", roots.display());
        }

        let translations: PathBuf = dir.join(TRANSLATIONS_DIR);
        if translations.is_dir() {
            let ids = match &options.translations {
                Some(ids) => ids.clone(),
                None => available_translations(&translations)?,
            };
            load_translations(&mut corpus, &translations, &ids, options.mode);
        }

        info!(
            "loaded {} ({} mode, {} translations)",
            dir.display(),
            options.mode,
            corpus.translation_ids().count()
        );
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Metadata, VerseRecord};

    #[test]
    fn parses_verse_lines_with_optional_stopmark() {
        let verses = parse_verses("ab cd\tCanStop\r\n\nef\n", "quran.txt").unwrap();
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].text, "ab cd");
        assert_eq!(verses[0].stopmark, Stopmark::CanStop);
        assert_eq!(verses[1].number, 2);
        assert_eq!(verses[1].stopmark, Stopmark::MustStop);

        let err = parse_verses("ab\tSometimes\n", "quran.txt").unwrap_err();
        assert!(err.to_string().starts_with("quran.txt:1"));
    }

    #[test]
    fn conjunction_takes_itself_as_root_without_a_row() {
        let mut corpus = CorpusBuilder::new(Metadata::from_verse_counts(&[1]))
            .build(vec![VerseRecord::new(1, "كتب وَ قال")])
            .unwrap();
        let rows = "1\tكتب\tكتب\n2\tقال\tقول|قيل\n";
        assert_eq!(attach_roots(&mut corpus, rows, "roots.txt").unwrap(), 3);
        let roots: Vec<_> = corpus.words().map(|w| w.roots().to_vec()).collect();
        assert_eq!(roots[1], vec!["و".to_string()]);
        assert_eq!(roots[2], vec!["قول".to_string(), "قيل".to_string()]);
        assert_eq!(corpus.word(2).unwrap().best_root(), "قول");
    }

    #[test]
    fn reattaching_drops_stale_roots() {
        let mut corpus = CorpusBuilder::new(Metadata::from_verse_counts(&[1]))
            .build(vec![VerseRecord::new(1, "كتب قال")])
            .unwrap();
        attach_roots(&mut corpus, "1\tكتب\tكتب\n2\tقال\tقول\n", "roots.txt").unwrap();
        assert_eq!(attach_roots(&mut corpus, "1\tكتب\tكتب\n", "short.txt").unwrap(), 1);
        assert_eq!(corpus.word(0).unwrap().roots().to_vec(), vec!["كتب".to_string()]);
        assert!(corpus.word(1).unwrap().roots().is_empty());
    }

    #[test]
    fn malformed_root_rows_are_fatal() {
        let mut corpus = CorpusBuilder::new(Metadata::from_verse_counts(&[1]))
            .build(vec![VerseRecord::new(1, "ab")])
            .unwrap();
        let err = attach_roots(&mut corpus, "1\tab\n", "roots.txt").unwrap_err();
        assert_eq!(err.to_string(), "roots.txt:1 expected 3 columns, found 2");
    }

    #[test]
    fn load_mode_parses_case_insensitively() {
        assert_eq!("MMAP".parse::<LoadMode>().unwrap(), LoadMode::Mmap);
        assert_eq!("owned".parse::<LoadMode>().unwrap(), LoadMode::Owned);
        assert!("disk".parse::<LoadMode>().is_err());
    }
}
