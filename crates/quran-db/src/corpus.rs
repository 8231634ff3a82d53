use std::collections::BTreeSet;
use std::ops::Range;

use quran_types::{PartitionKind, SimplificationLevel};
use tracing::debug;

use crate::entities::{
    Chapter, ChapterData, Letter, LetterData, Partition, PartitionData, Verse, VerseData, Word,
    WordData, sorted_unique,
};
use crate::memo::Memo;

/// The whole book: chapters, seven parallel partition schemes, and the
/// verse/word/letter arenas they index into.
///
/// Built by [`CorpusBuilder`](crate::CorpusBuilder). After construction only
/// translations and roots can change, and both require `&mut self`.
#[derive(Debug)]
pub struct Corpus {
    pub(crate) text_mode: SimplificationLevel,
    pub(crate) chapters: Vec<ChapterData>,
    pub(crate) partitions: [Vec<PartitionData>; PartitionKind::COUNT],
    pub(crate) verses: Vec<VerseData>,
    pub(crate) words: Vec<WordData>,
    pub(crate) letters: Vec<LetterData>,
    pub(crate) translation_ids: BTreeSet<String>,
    pub(crate) unique_letters: Memo<Vec<char>>,
}

impl Corpus {
    /// Simplification level used for statistics and search comparisons.
    pub fn text_mode(&self) -> SimplificationLevel {
        self.text_mode
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn letter_count(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn chapter(&self, index: usize) -> Option<Chapter<'_>> {
        (index < self.chapters.len()).then(|| Chapter::new(self, index))
    }

    /// Chapter by its 1-based number.
    pub fn chapter_by_number(&self, number: usize) -> Option<Chapter<'_>> {
        number.checked_sub(1).and_then(|i| self.chapter(i))
    }

    pub fn chapters(&self) -> impl Iterator<Item = Chapter<'_>> + '_ {
        (0..self.chapters.len()).map(move |i| Chapter::new(self, i))
    }

    pub fn verse(&self, index: usize) -> Option<Verse<'_>> {
        (index < self.verses.len()).then(|| Verse::new(self, index))
    }

    pub fn verses(&self) -> impl Iterator<Item = Verse<'_>> + '_ {
        (0..self.verses.len()).map(move |i| Verse::new(self, i))
    }

    /// Verse by `chapter:verse` address, both 1-based.
    pub fn verse_at(&self, chapter: usize, verse: usize) -> Option<Verse<'_>> {
        let chapter = self.chapter_by_number(chapter)?;
        let range = chapter.verse_range();
        let index = range.start + verse.checked_sub(1)?;
        (index < range.end).then(|| Verse::new(self, index))
    }

    pub fn word(&self, index: usize) -> Option<Word<'_>> {
        (index < self.words.len()).then(|| Word::new(self, index))
    }

    pub fn words(&self) -> impl Iterator<Item = Word<'_>> + '_ {
        (0..self.words.len()).map(move |i| Word::new(self, i))
    }

    pub fn letter(&self, index: usize) -> Option<Letter<'_>> {
        (index < self.letters.len()).then(|| Letter::new(self, index))
    }

    pub fn letters(&self) -> impl Iterator<Item = Letter<'_>> + '_ {
        (0..self.letters.len()).map(move |i| Letter::new(self, i))
    }

    pub fn partition_count(&self, kind: PartitionKind) -> usize {
        self.partitions[kind.index()].len()
    }

    pub fn partition(&self, kind: PartitionKind, index: usize) -> Option<Partition<'_>> {
        (index < self.partition_count(kind)).then(|| Partition::new(self, kind, index))
    }

    pub fn partitions(&self, kind: PartitionKind) -> impl Iterator<Item = Partition<'_>> + '_ {
        (0..self.partition_count(kind)).map(move |i| Partition::new(self, kind, i))
    }

    /// Distinct letters of the whole book, sorted; computed on first read.
    pub fn unique_letters(&self) -> &[char] {
        self.unique_letters
            .get_or_compute(|| sorted_unique(self.letters.iter().map(|l| l.character)))
    }

    /// Identifiers of the translations currently attached.
    pub fn translation_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.translation_ids.iter().map(String::as_str)
    }

    /// Attach one translation line per verse, in document order. Extra lines
    /// are ignored; verses past the last line stay untranslated.
    pub fn attach_translation<I, S>(&mut self, id: &str, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut attached = 0;
        for (verse, line) in self.verses.iter_mut().zip(lines) {
            verse.translations.insert(id.to_string(), line.into());
            attached += 1;
        }
        self.translation_ids.insert(id.to_string());
        debug!("attached translation {id} to {attached} verses");
        attached
    }

    /// Remove a translation from every verse. Returns whether it was attached.
    pub fn detach_translation(&mut self, id: &str) -> bool {
        if !self.translation_ids.remove(id) {
            return false;
        }
        for verse in &mut self.verses {
            verse.translations.remove(id);
        }
        true
    }

    /// Replace the roots of one word. Out-of-range indices are ignored.
    pub fn attach_word_roots(&mut self, word: usize, roots: Vec<String>) -> bool {
        match self.words.get_mut(word) {
            Some(data) => {
                data.set_roots(roots);
                true
            }
            None => false,
        }
    }

    pub fn clear_roots(&mut self) {
        for word in &mut self.words {
            word.set_roots(Vec::new());
        }
    }

    pub(crate) fn word_span(&self, verses: Range<usize>) -> Range<usize> {
        if verses.is_empty() {
            return 0..0;
        }
        self.verses[verses.start].words.start..self.verses[verses.end - 1].words.end
    }

    pub(crate) fn letter_span(&self, words: Range<usize>) -> Range<usize> {
        if words.is_empty() {
            return 0..0;
        }
        self.words[words.start].letters.start..self.words[words.end - 1].letters.end
    }
}
