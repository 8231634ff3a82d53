//! Assemble a [`Corpus`] from verse lines and partition metadata.
//!
//! Construction runs in a fixed order: chapter ranges, the seven partition
//! schemes, verse tokenization with numbering, prostration/initialization
//! markers, then the statistics pass. Any inconsistency in the inputs aborts
//! with a [`BuildError`]; no partially built corpus is ever returned.

use std::collections::BTreeSet;
use std::ops::Range;

use quran_types::{
    PartitionKind, SimplificationLevel, Stopmark, is_letter, is_marker_char, is_marker_token,
    normalize_diacritics, simplify,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::corpus::Corpus;
use crate::entities::{ChapterData, LetterData, PartitionData, VerseData, WordData};
use crate::memo::Memo;
use crate::records::{ChapterRecord, Metadata, PartitionRecord, VerseRecord};
use crate::statistics;

/// First word of the formula that opens most chapters.
const OPENING_FORMULA: &str = "بسم";
/// `(chapter, verse)` pairs where the opening formula rule does not apply.
const OPENING_FORMULA_EXCEPTIONS: [(usize, usize); 2] = [(1, 1), (9, 1)];
/// Word of the opening formula that always allows a pause.
const OPENING_FORMULA_PAUSE_WORD: usize = 4;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("metadata declares {declared} verses but {supplied} verse records were supplied")]
    VerseCountMismatch { declared: usize, supplied: usize },
    #[error("chapter {0} declares no verses")]
    EmptyChapter(usize),
    #[error("{section} {number} points at {chapter}:{verse}, which is not a verse of the book")]
    InvalidAddress {
        section: &'static str,
        number: usize,
        chapter: usize,
        verse: usize,
    },
    #[error("{kind} {number} at {chapter}:{verse} does not start after the previous {kind}")]
    UnorderedPartition {
        kind: PartitionKind,
        number: usize,
        chapter: usize,
        verse: usize,
    },
    #[error("first {kind} starts at {chapter}:{verse} instead of 1:1")]
    UncoveredStart {
        kind: PartitionKind,
        chapter: usize,
        verse: usize,
    },
}

/// Builder for [`Corpus`]; metadata is passed in explicitly so construction
/// is a pure function of its inputs.
#[derive(Clone, Debug)]
pub struct CorpusBuilder {
    metadata: Metadata,
    text_mode: SimplificationLevel,
}

impl CorpusBuilder {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            text_mode: SimplificationLevel::default(),
        }
    }

    /// Simplification level used to count and compare texts.
    pub fn text_mode(mut self, level: SimplificationLevel) -> Self {
        self.text_mode = level;
        self
    }

    pub fn build(self, verses: Vec<VerseRecord>) -> Result<Corpus, BuildError> {
        let Self {
            metadata,
            text_mode,
        } = self;

        let starts = chapter_starts(&metadata.chapters)?;
        let total = starts.last().copied().unwrap_or(0);
        if total != verses.len() {
            return Err(BuildError::VerseCountMismatch {
                declared: total,
                supplied: verses.len(),
            });
        }

        let mut chapters: Vec<ChapterData> = metadata
            .chapters
            .iter()
            .enumerate()
            .map(|(i, record)| chapter_data(record, starts[i]..starts[i + 1]))
            .collect();

        let partitions: [Vec<PartitionData>; PartitionKind::COUNT] =
            array_init::try_array_init(|i| {
                let kind = PartitionKind::ALL[i];
                build_scheme(kind, metadata.partitions(kind), &starts)
            })?;

        let mut verse_data: Vec<VerseData> = Vec::with_capacity(total);
        let mut words: Vec<WordData> = Vec::new();
        let mut letters: Vec<LetterData> = Vec::new();
        let mut records = verses.into_iter();

        for (chapter_index, chapter) in chapters.iter().enumerate() {
            let mut words_in_chapter = 0;
            let mut letters_in_chapter = 0;
            for verse_index in chapter.verses.clone() {
                let Some(record) = records.next() else {
                    break;
                };
                let number_in_chapter = verse_index - chapter.verses.start + 1;
                if record.number != verse_index + 1 {
                    debug!(
                        "verse record {} renumbered to {}",
                        record.number,
                        verse_index + 1
                    );
                }

                let mut tokens = tokenize(&record.text);
                apply_opening_formula(&mut tokens, chapter.number, number_in_chapter);
                if let Some(last) = tokens.last_mut()
                    && last.stopmark == Stopmark::None
                {
                    last.stopmark = record.stopmark;
                }

                let word_start = words.len();
                let mut letters_in_verse = 0;
                for (word_offset, token) in tokens.into_iter().enumerate() {
                    words_in_chapter += 1;
                    let letter_start = letters.len();
                    for (letter_offset, character) in
                        token.text.chars().filter(|c| is_letter(*c)).enumerate()
                    {
                        letters_in_chapter += 1;
                        letters_in_verse += 1;
                        letters.push(LetterData {
                            word: words.len(),
                            character,
                            number: letters.len() + 1,
                            number_in_chapter: letters_in_chapter,
                            number_in_verse: letters_in_verse,
                            number_in_word: letter_offset + 1,
                            tallies: Default::default(),
                        });
                    }
                    words.push(WordData {
                        verse: verse_index,
                        number: words.len() + 1,
                        number_in_chapter: words_in_chapter,
                        number_in_verse: word_offset + 1,
                        text: token.text,
                        position: token.position,
                        stopmark: token.stopmark,
                        roots: Vec::new(),
                        best_root: String::new(),
                        letters: letter_start..letters.len(),
                        tallies: Default::default(),
                        unique_letters: Memo::new(),
                    });
                }

                verse_data.push(VerseData {
                    number: verse_index + 1,
                    number_in_chapter,
                    chapter: chapter_index,
                    partitions: [0; PartitionKind::COUNT],
                    text: record.text,
                    stopmark: record.stopmark,
                    prostration: None,
                    words: word_start..words.len(),
                    translations: Default::default(),
                    tallies: Default::default(),
                    unique_letters: Memo::new(),
                });
            }
        }

        for scheme in &partitions {
            for (partition_index, partition) in scheme.iter().enumerate() {
                for verse in partition.verses.clone() {
                    verse_data[verse].partitions[partition.kind.index()] = partition_index;
                }
            }
        }

        for record in &metadata.prostrations {
            let index = verse_index(&starts, record.chapter, record.verse).ok_or(
                BuildError::InvalidAddress {
                    section: "Prostration",
                    number: record.number,
                    chapter: record.chapter,
                    verse: record.verse,
                },
            )?;
            verse_data[index].prostration = Some(record.kind);
        }

        for record in &metadata.initializations {
            let index = verse_index(&starts, record.chapter, record.verse).ok_or(
                BuildError::InvalidAddress {
                    section: "Initialization",
                    number: record.number,
                    chapter: record.chapter,
                    verse: record.verse,
                },
            )?;
            chapters[verse_data[index].chapter].initialization = record.kind;
        }

        let mut corpus = Corpus {
            text_mode,
            chapters,
            partitions,
            verses: verse_data,
            words,
            letters,
            translation_ids: BTreeSet::new(),
            unique_letters: Memo::new(),
        };
        statistics::compute(&mut corpus);

        info!(
            "built corpus: {} chapters, {} verses, {} words, {} letters ({})",
            corpus.chapter_count(),
            corpus.verse_count(),
            corpus.word_count(),
            corpus.letter_count(),
            text_mode
        );
        Ok(corpus)
    }
}

/// Prefix sums of chapter verse counts: `starts[i]` is the first verse index
/// of chapter `i`, and the last entry is the total.
fn chapter_starts(chapters: &[ChapterRecord]) -> Result<Vec<usize>, BuildError> {
    let mut starts = Vec::with_capacity(chapters.len() + 1);
    let mut next = 0;
    starts.push(next);
    for chapter in chapters {
        if chapter.verse_count == 0 {
            return Err(BuildError::EmptyChapter(chapter.number));
        }
        if chapter.first_verse != next + 1 {
            warn!(
                "chapter {} declares first verse {} but starts at {}",
                chapter.number,
                chapter.first_verse,
                next + 1
            );
        }
        next += chapter.verse_count;
        starts.push(next);
    }
    Ok(starts)
}

fn chapter_data(record: &ChapterRecord, verses: Range<usize>) -> ChapterData {
    ChapterData {
        number: record.number,
        name: record.name.clone(),
        transliterated_name: record.transliterated_name.clone(),
        english_name: record.english_name.clone(),
        revelation_place: record.revelation_place,
        revelation_order: record.revelation_order,
        bowing_count: record.bowing_count,
        initialization: Default::default(),
        verses,
        unique_letters: Memo::new(),
    }
}

/// Verse index of a 1-based `chapter:verse` coordinate.
fn verse_index(starts: &[usize], chapter: usize, verse: usize) -> Option<usize> {
    let chapter_index = chapter.checked_sub(1)?;
    let begin = *starts.get(chapter_index)?;
    let end = *starts.get(chapter_index + 1)?;
    let index = begin + verse.checked_sub(1)?;
    (index < end).then_some(index)
}

fn build_scheme(
    kind: PartitionKind,
    records: &[PartitionRecord],
    starts: &[usize],
) -> Result<Vec<PartitionData>, BuildError> {
    let total = starts.last().copied().unwrap_or(0);
    if total == 0 {
        return Ok(Vec::new());
    }
    if records.is_empty() {
        debug!("no {kind} records; one {kind} spans the book");
        return Ok(vec![PartitionData {
            kind,
            number: 1,
            verses: 0..total,
        }]);
    }

    let mut begins: Vec<usize> = Vec::with_capacity(records.len());
    for record in records {
        let begin = verse_index(starts, record.chapter, record.verse).ok_or(
            BuildError::InvalidAddress {
                section: kind.name(),
                number: record.number,
                chapter: record.chapter,
                verse: record.verse,
            },
        )?;
        match begins.last() {
            None if begin != 0 => {
                return Err(BuildError::UncoveredStart {
                    kind,
                    chapter: record.chapter,
                    verse: record.verse,
                });
            }
            Some(&previous) if begin <= previous => {
                return Err(BuildError::UnorderedPartition {
                    kind,
                    number: record.number,
                    chapter: record.chapter,
                    verse: record.verse,
                });
            }
            _ => begins.push(begin),
        }
    }

    Ok(begins
        .iter()
        .zip(records)
        .enumerate()
        .map(|(i, (&begin, record))| PartitionData {
            kind,
            number: record.number,
            verses: begin..begins.get(i + 1).copied().unwrap_or(total),
        })
        .collect())
}

/// A word cut out of a verse line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Token {
    pub(crate) text: String,
    /// Character index in the raw verse text.
    pub(crate) position: usize,
    pub(crate) stopmark: Stopmark,
}

/// Whitespace-separated tokens with their character positions.
fn raw_tokens(text: &str) -> Vec<(&str, usize)> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    for (char_pos, (byte_pos, c)) in text.char_indices().enumerate() {
        if c.is_whitespace() {
            if let Some((begin, position)) = start.take() {
                tokens.push((&text[begin..byte_pos], position));
            }
        } else if start.is_none() {
            start = Some((byte_pos, char_pos));
        }
    }
    if let Some((begin, position)) = start {
        tokens.push((&text[begin..], position));
    }
    tokens
}

/// Split a verse line into words, dropping tokens without a letter (marker
/// or stray diacritic) and resolving each word's stopmark from the token(s)
/// that follow it.
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let raw = raw_tokens(text);
    let mut words = Vec::with_capacity(raw.len());
    for (i, &(token, position)) in raw.iter().enumerate() {
        if is_marker_token(token) {
            continue;
        }
        if !token.chars().any(is_letter) {
            warn!("skipping token without letters at char {position}");
            continue;
        }
        let leading = token.chars().take_while(|c| is_marker_char(*c)).count();
        let body = token.trim_matches(is_marker_char);
        let mut stopmark = token
            .chars()
            .rev()
            .take_while(|c| is_marker_char(*c))
            .find_map(Stopmark::from_char)
            .unwrap_or_default();

        if let Some(&(next, _)) = raw.get(i + 1)
            && let Some(mark) = Stopmark::from_token(next)
        {
            stopmark = mark;
            // back-to-back marks: the second one governs
            if let Some(&(after, _)) = raw.get(i + 2)
                && let Some(second) = Stopmark::from_token(after)
            {
                stopmark = second;
            }
        }

        words.push(Token {
            text: normalize_diacritics(body),
            position: position + leading,
            stopmark,
        });
    }
    words
}

fn apply_opening_formula(tokens: &mut [Token], chapter: usize, verse: usize) {
    if verse != 1
        || OPENING_FORMULA_EXCEPTIONS.contains(&(chapter, verse))
        || tokens.len() <= OPENING_FORMULA_PAUSE_WORD
    {
        return;
    }
    if simplify(&tokens[0].text, SimplificationLevel::Simplified28) != OPENING_FORMULA {
        return;
    }
    tokens[OPENING_FORMULA_PAUSE_WORD - 1].stopmark = Stopmark::CanStop;
}
