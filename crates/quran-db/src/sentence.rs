//! Running text between two pause points, possibly spanning verses.

use std::ops::Range;

use crate::entities::{Verse, Word, sorted_unique};

/// Words from `start_offset` in `first_verse` up to (excluding) `end_offset`
/// in `last_verse`. Offsets are 0-based word positions within their verse.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Sentence<'a> {
    first_verse: Verse<'a>,
    start_offset: usize,
    last_verse: Verse<'a>,
    end_offset: usize,
}

impl<'a> Sentence<'a> {
    /// `None` when the bounds are out of range or the span is empty.
    pub fn new(
        first_verse: Verse<'a>,
        start_offset: usize,
        last_verse: Verse<'a>,
        end_offset: usize,
    ) -> Option<Self> {
        if !std::ptr::eq(first_verse.corpus(), last_verse.corpus())
            || start_offset >= first_verse.word_count()
            || end_offset > last_verse.word_count()
        {
            return None;
        }
        let sentence = Self {
            first_verse,
            start_offset,
            last_verse,
            end_offset,
        };
        (!sentence.word_range().is_empty()).then_some(sentence)
    }

    pub fn first_verse(&self) -> Verse<'a> {
        self.first_verse
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn last_verse(&self) -> Verse<'a> {
        self.last_verse
    }

    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// Global word indices covered by the sentence.
    pub fn word_range(&self) -> Range<usize> {
        let start = self.first_verse.word_range().start + self.start_offset;
        let end = self.last_verse.word_range().start + self.end_offset;
        start..end.max(start)
    }

    pub fn words(&self) -> impl Iterator<Item = Word<'a>> + use<'a> {
        let corpus = self.first_verse.corpus();
        self.word_range().filter_map(move |i| corpus.word(i))
    }

    pub fn text(&self) -> String {
        self.words().map(|w| w.text()).collect::<Vec<_>>().join(" ")
    }

    pub fn word_count(&self) -> usize {
        self.word_range().len()
    }

    pub fn letter_count(&self) -> usize {
        self.words().map(|w| w.letter_count()).sum()
    }

    pub fn unique_letters(&self) -> Vec<char> {
        sorted_unique(self.words().flat_map(|w| w.letters()).map(|l| l.character()))
    }

    pub fn unique_letter_count(&self) -> usize {
        self.unique_letters().len()
    }

    /// Chapters touched, counting both ends.
    pub fn chapter_count(&self) -> usize {
        self.last_verse.chapter().index() - self.first_verse.chapter().index() + 1
    }

    /// Verses touched, counting both ends.
    pub fn verse_count(&self) -> usize {
        self.last_verse.index() - self.first_verse.index() + 1
    }
}

/// Cut the running text of `verses` at every word whose stopmark allows a
/// stop. A gap between non-consecutive verses also ends a sentence.
pub fn sentences<'a>(verses: &[Verse<'a>]) -> Vec<Sentence<'a>> {
    let mut out = Vec::new();
    let mut open: Option<(Verse<'a>, usize)> = None;
    let mut previous: Option<Verse<'a>> = None;

    for &verse in verses {
        if let (Some((first, start)), Some(prev)) = (open, previous)
            && prev.index() + 1 != verse.index()
        {
            out.extend(Sentence::new(first, start, prev, prev.word_count()));
            open = None;
        }
        for (offset, word) in verse.words().enumerate() {
            if open.is_none() {
                open = Some((verse, offset));
            }
            if word.stopmark().is_stop()
                && let Some((first, start)) = open.take()
            {
                out.extend(Sentence::new(first, start, verse, offset + 1));
            }
        }
        previous = Some(verse);
    }

    if let (Some((first, start)), Some(last)) = (open, previous) {
        out.extend(Sentence::new(first, start, last, last.word_count()));
    }
    out
}
