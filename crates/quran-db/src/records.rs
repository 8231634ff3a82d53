//! Plain input records consumed by the builder.

use quran_types::{
    InitializationType, PartitionKind, ProstrationType, RevelationPlace, Stopmark,
};

/// One verse line: its global number, raw text, and terminal stopmark.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerseRecord {
    pub number: usize,
    pub text: String,
    pub stopmark: Stopmark,
}

impl VerseRecord {
    /// A verse ending in a full stop, the common case.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            stopmark: Stopmark::MustStop,
        }
    }

    pub fn with_stopmark(mut self, stopmark: Stopmark) -> Self {
        self.stopmark = stopmark;
        self
    }
}

/// Descriptor row of the chapter section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChapterRecord {
    pub number: usize,
    pub verse_count: usize,
    pub first_verse: usize,
    pub name: String,
    pub transliterated_name: String,
    pub english_name: String,
    pub revelation_place: RevelationPlace,
    pub revelation_order: usize,
    pub bowing_count: usize,
}

/// Start coordinate of one partition; it ends where the next one starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PartitionRecord {
    pub number: usize,
    pub chapter: usize,
    pub verse: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProstrationRecord {
    pub number: usize,
    pub chapter: usize,
    pub verse: usize,
    pub kind: ProstrationType,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InitializationRecord {
    pub number: usize,
    pub chapter: usize,
    pub verse: usize,
    pub kind: InitializationType,
}

/// Everything the builder needs besides the verse lines.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Metadata {
    pub chapters: Vec<ChapterRecord>,
    pub partitions: [Vec<PartitionRecord>; PartitionKind::COUNT],
    pub prostrations: Vec<ProstrationRecord>,
    pub initializations: Vec<InitializationRecord>,
}

impl Metadata {
    /// Chapters with the given verse counts and placeholder descriptors; no
    /// partition records, so every scheme collapses to one partition.
    pub fn from_verse_counts(counts: &[usize]) -> Self {
        let mut first_verse = 1;
        let chapters = counts
            .iter()
            .enumerate()
            .map(|(i, &verse_count)| {
                let record = ChapterRecord {
                    number: i + 1,
                    verse_count,
                    first_verse,
                    name: format!("{}", i + 1),
                    transliterated_name: format!("Chapter {}", i + 1),
                    english_name: format!("Chapter {}", i + 1),
                    revelation_place: RevelationPlace::Makkah,
                    revelation_order: i + 1,
                    bowing_count: 1,
                };
                first_verse += verse_count;
                record
            })
            .collect();
        Self {
            chapters,
            ..Self::default()
        }
    }

    pub fn partitions(&self, kind: PartitionKind) -> &[PartitionRecord] {
        &self.partitions[kind.index()]
    }

    pub fn partitions_mut(&mut self, kind: PartitionKind) -> &mut Vec<PartitionRecord> {
        &mut self.partitions[kind.index()]
    }

    pub fn total_verses(&self) -> usize {
        self.chapters.iter().map(|c| c.verse_count).sum()
    }
}
