//! Parse the sectioned, tab-delimited metadata file.
//!
//! A section starts with a header row whose first column names it
//! (`Chapter`, one of the seven partition kinds, `Prostration`,
//! `Initialization`) and runs until the next blank line. The rest of a known
//! header must name the expected columns exactly. Rows of unknown sections
//! are skipped with a warning.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use quran_types::PartitionKind;
use tracing::{debug, warn};

use crate::loader::{LoadMode, load_text};
use crate::records::{
    ChapterRecord, InitializationRecord, Metadata, PartitionRecord, ProstrationRecord,
};

#[derive(Clone, Copy, Debug)]
enum Section {
    Chapter,
    Partition(PartitionKind),
    Prostration,
    Initialization,
    Unknown,
}

const CHAPTER_COLUMNS: &[&str] = &[
    "Verses",
    "FirstVerse",
    "Name",
    "TransliteratedName",
    "EnglishName",
    "RevelationPlace",
    "RevelationOrder",
    "Bowings",
];
const PARTITION_COLUMNS: &[&str] = &["Chapter", "Verse"];
const MARKER_COLUMNS: &[&str] = &["Chapter", "Verse", "Type"];

impl Section {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "Chapter" => Section::Chapter,
            "Prostration" => Section::Prostration,
            "Initialization" => Section::Initialization,
            other => other
                .parse::<PartitionKind>()
                .map(Section::Partition)
                .unwrap_or(Section::Unknown),
        }
    }

    /// Header columns after the section tag; `None` for unknown sections.
    fn header(self) -> Option<&'static [&'static str]> {
        match self {
            Section::Chapter => Some(CHAPTER_COLUMNS),
            Section::Partition(_) => Some(PARTITION_COLUMNS),
            Section::Prostration | Section::Initialization => Some(MARKER_COLUMNS),
            Section::Unknown => None,
        }
    }

    fn columns(self) -> usize {
        self.header().map_or(0, |rest| rest.len() + 1)
    }
}

/// Read and parse `metadata.txt`.
pub fn load_metadata(path: impl AsRef<Path>, mode: LoadMode) -> Result<Metadata> {
    load_text(path.as_ref(), mode, parse_metadata)
}

/// Parse metadata text; `source` names the input in error messages.
pub fn parse_metadata(text: &str, source: &str) -> Result<Metadata> {
    let mut metadata = Metadata::default();
    let mut section: Option<Section> = None;

    for (lineno, raw_line) in text.lines().enumerate() {
        let lineno = lineno + 1;
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            section = None;
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        let Some(current) = section else {
            let header = Section::from_tag(fields[0]);
            match header.header() {
                Some(expected) if fields[1..] != *expected => {
                    anyhow::bail!("{source}:{lineno} malformed {} header", fields[0]);
                }
                Some(_) => {}
                None => warn!("{source}:{lineno} skipping unknown section {:?}", fields[0]),
            }
            section = Some(header);
            continue;
        };

        if let Section::Unknown = current {
            continue;
        }
        if fields.len() != current.columns() {
            anyhow::bail!(
                "{source}:{lineno} expected {} columns, found {}",
                current.columns(),
                fields.len()
            );
        }

        match current {
            Section::Chapter => metadata.chapters.push(ChapterRecord {
                number: field(&fields, 0, "chapter", source, lineno)?,
                verse_count: field(&fields, 1, "verse count", source, lineno)?,
                first_verse: field(&fields, 2, "first verse", source, lineno)?,
                name: fields[3].to_string(),
                transliterated_name: fields[4].to_string(),
                english_name: fields[5].to_string(),
                revelation_place: field(&fields, 6, "revelation place", source, lineno)?,
                revelation_order: field(&fields, 7, "revelation order", source, lineno)?,
                bowing_count: field(&fields, 8, "bowing count", source, lineno)?,
            }),
            Section::Partition(kind) => {
                let number = field(&fields, 0, kind.name(), source, lineno)?;
                metadata.partitions_mut(kind).push(PartitionRecord {
                    number,
                    chapter: field(&fields, 1, "chapter", source, lineno)?,
                    verse: field(&fields, 2, "verse", source, lineno)?,
                });
            }
            Section::Prostration => metadata.prostrations.push(ProstrationRecord {
                number: field(&fields, 0, "prostration", source, lineno)?,
                chapter: field(&fields, 1, "chapter", source, lineno)?,
                verse: field(&fields, 2, "verse", source, lineno)?,
                kind: field(&fields, 3, "prostration type", source, lineno)?,
            }),
            Section::Initialization => metadata.initializations.push(InitializationRecord {
                number: field(&fields, 0, "initialization", source, lineno)?,
                chapter: field(&fields, 1, "chapter", source, lineno)?,
                verse: field(&fields, 2, "verse", source, lineno)?,
                kind: field(&fields, 3, "initialization type", source, lineno)?,
            }),
            Section::Unknown => {}
        }
    }

    debug!(
        "{source}: {} chapters, {} prostrations, {} initializations",
        metadata.chapters.len(),
        metadata.prostrations.len(),
        metadata.initializations.len()
    );
    Ok(metadata)
}

fn field<T>(fields: &[&str], index: usize, what: &str, source: &str, lineno: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fields[index]
        .parse()
        .with_context(|| format!("{source}:{lineno} {what} `{}`", fields[index]))
}
