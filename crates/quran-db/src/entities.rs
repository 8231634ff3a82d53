//! Arena records and the borrowed handles that expose them.
//!
//! Records (`*Data`) live in flat vectors on [`Corpus`]; parents are stored as
//! arena indices and children as contiguous index ranges. Handles pair a
//! `&Corpus` with an index, are `Copy`, and compare equal when they point at
//! the same record of the same corpus.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;

use quran_types::{
    InitializationType, PartitionKind, ProstrationType, RevelationPlace, Scope, Stopmark,
    simplify,
};

use crate::Corpus;
use crate::memo::Memo;

/// Rank of one instance among identical texts, and the total count, in a scope.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Tally {
    pub occurrence: usize,
    pub frequency: usize,
}

pub(crate) type Tallies = [Tally; Scope::COUNT];

#[derive(Debug)]
pub(crate) struct ChapterData {
    pub(crate) number: usize,
    pub(crate) name: String,
    pub(crate) transliterated_name: String,
    pub(crate) english_name: String,
    pub(crate) revelation_place: RevelationPlace,
    pub(crate) revelation_order: usize,
    pub(crate) bowing_count: usize,
    pub(crate) initialization: InitializationType,
    pub(crate) verses: Range<usize>,
    pub(crate) unique_letters: Memo<Vec<char>>,
}

#[derive(Debug)]
pub(crate) struct PartitionData {
    pub(crate) kind: PartitionKind,
    pub(crate) number: usize,
    pub(crate) verses: Range<usize>,
}

#[derive(Debug)]
pub(crate) struct VerseData {
    pub(crate) number: usize,
    pub(crate) number_in_chapter: usize,
    pub(crate) chapter: usize,
    pub(crate) partitions: [usize; PartitionKind::COUNT],
    pub(crate) text: String,
    pub(crate) stopmark: Stopmark,
    pub(crate) prostration: Option<ProstrationType>,
    pub(crate) words: Range<usize>,
    pub(crate) translations: HashMap<String, String>,
    pub(crate) tallies: Tallies,
    pub(crate) unique_letters: Memo<Vec<char>>,
}

#[derive(Debug)]
pub(crate) struct WordData {
    pub(crate) verse: usize,
    pub(crate) number: usize,
    pub(crate) number_in_chapter: usize,
    pub(crate) number_in_verse: usize,
    pub(crate) text: String,
    pub(crate) position: usize,
    pub(crate) stopmark: Stopmark,
    pub(crate) roots: Vec<String>,
    pub(crate) best_root: String,
    pub(crate) letters: Range<usize>,
    pub(crate) tallies: Tallies,
    pub(crate) unique_letters: Memo<Vec<char>>,
}

#[derive(Debug)]
pub(crate) struct LetterData {
    pub(crate) word: usize,
    pub(crate) character: char,
    pub(crate) number: usize,
    pub(crate) number_in_chapter: usize,
    pub(crate) number_in_verse: usize,
    pub(crate) number_in_word: usize,
    pub(crate) tallies: Tallies,
}

impl WordData {
    pub(crate) fn set_roots(&mut self, roots: Vec<String>) {
        self.best_root = longest(&roots).to_string();
        self.roots = roots;
    }
}

/// First of the longest strings, or `""` when there are none.
pub(crate) fn longest(items: &[String]) -> &str {
    items
        .iter()
        .fold(None::<&String>, |best, item| match best {
            Some(b) if b.chars().count() >= item.chars().count() => Some(b),
            _ => Some(item),
        })
        .map(String::as_str)
        .unwrap_or("")
}

pub(crate) fn sorted_unique(chars: impl Iterator<Item = char>) -> Vec<char> {
    chars.collect::<BTreeSet<_>>().into_iter().collect()
}

macro_rules! handle {
    ($name:ident, $data:ident, $arena:ident) => {
        #[derive(Clone, Copy)]
        pub struct $name<'a> {
            corpus: &'a Corpus,
            index: usize,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(corpus: &'a Corpus, index: usize) -> Self {
                Self { corpus, index }
            }

            fn data(&self) -> &'a $data {
                &self.corpus.$arena[self.index]
            }

            /// 0-based position in the corpus arena.
            pub fn index(&self) -> usize {
                self.index
            }

            pub fn corpus(&self) -> &'a Corpus {
                self.corpus
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.corpus, other.corpus) && self.index == other.index
            }
        }

        impl Eq for $name<'_> {}

        impl std::hash::Hash for $name<'_> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.index.hash(state);
            }
        }
    };
}

handle!(Chapter, ChapterData, chapters);
handle!(Verse, VerseData, verses);
handle!(Word, WordData, words);
handle!(Letter, LetterData, letters);

/// One partition of one of the seven parallel schemes.
#[derive(Clone, Copy)]
pub struct Partition<'a> {
    corpus: &'a Corpus,
    kind: PartitionKind,
    index: usize,
}

impl<'a> Chapter<'a> {
    pub fn number(&self) -> usize {
        self.data().number
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn transliterated_name(&self) -> &'a str {
        &self.data().transliterated_name
    }

    pub fn english_name(&self) -> &'a str {
        &self.data().english_name
    }

    pub fn revelation_place(&self) -> RevelationPlace {
        self.data().revelation_place
    }

    pub fn revelation_order(&self) -> usize {
        self.data().revelation_order
    }

    /// Canonical number of bowings (ruku) in the chapter.
    pub fn bowing_count(&self) -> usize {
        self.data().bowing_count
    }

    pub fn initialization_type(&self) -> InitializationType {
        self.data().initialization
    }

    pub fn verse_range(&self) -> Range<usize> {
        self.data().verses.clone()
    }

    pub fn verses(&self) -> impl Iterator<Item = Verse<'a>> + use<'a> {
        let corpus = self.corpus;
        self.verse_range().map(move |i| Verse::new(corpus, i))
    }

    pub fn verse_count(&self) -> usize {
        self.data().verses.len()
    }

    pub fn word_range(&self) -> Range<usize> {
        self.corpus.word_span(self.verse_range())
    }

    pub fn words(&self) -> impl Iterator<Item = Word<'a>> + use<'a> {
        let corpus = self.corpus;
        self.word_range().map(move |i| Word::new(corpus, i))
    }

    pub fn word_count(&self) -> usize {
        self.word_range().len()
    }

    pub fn letter_range(&self) -> Range<usize> {
        self.corpus.letter_span(self.word_range())
    }

    pub fn letters(&self) -> impl Iterator<Item = Letter<'a>> + use<'a> {
        let corpus = self.corpus;
        self.letter_range().map(move |i| Letter::new(corpus, i))
    }

    pub fn letter_count(&self) -> usize {
        self.letter_range().len()
    }

    /// Distinct letters of the chapter, sorted; computed on first read.
    pub fn unique_letters(&self) -> &'a [char] {
        let corpus = self.corpus;
        let range = self.letter_range();
        self.data()
            .unique_letters
            .get_or_compute(|| sorted_unique(corpus.letters[range].iter().map(|l| l.character)))
    }
}

impl fmt::Debug for Chapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chapter({} {})", self.number(), self.transliterated_name())
    }
}

impl<'a> Verse<'a> {
    /// 1-based position in the whole book.
    pub fn number(&self) -> usize {
        self.data().number
    }

    pub fn number_in_chapter(&self) -> usize {
        self.data().number_in_chapter
    }

    /// `chapter:verse` address, e.g. `2:255`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.chapter().number(), self.number_in_chapter())
    }

    /// Raw verse text as supplied to the builder, markers and diacritics kept.
    pub fn text(&self) -> &'a str {
        &self.data().text
    }

    /// Words joined by single spaces and simplified at the corpus text mode.
    pub fn simplified_text(&self) -> String {
        let joined = self.words().map(|w| w.text()).collect::<Vec<_>>().join(" ");
        simplify(&joined, self.corpus.text_mode()).trim().to_string()
    }

    pub fn stopmark(&self) -> Stopmark {
        self.data().stopmark
    }

    pub fn prostration(&self) -> Option<ProstrationType> {
        self.data().prostration
    }

    pub fn chapter(&self) -> Chapter<'a> {
        Chapter::new(self.corpus, self.data().chapter)
    }

    pub fn partition(&self, kind: PartitionKind) -> Partition<'a> {
        Partition::new(self.corpus, kind, self.data().partitions[kind.index()])
    }

    pub fn word_range(&self) -> Range<usize> {
        self.data().words.clone()
    }

    pub fn words(&self) -> impl Iterator<Item = Word<'a>> + use<'a> {
        let corpus = self.corpus;
        self.word_range().map(move |i| Word::new(corpus, i))
    }

    pub fn word_count(&self) -> usize {
        self.data().words.len()
    }

    pub fn letter_range(&self) -> Range<usize> {
        self.corpus.letter_span(self.word_range())
    }

    pub fn letters(&self) -> impl Iterator<Item = Letter<'a>> + use<'a> {
        let corpus = self.corpus;
        self.letter_range().map(move |i| Letter::new(corpus, i))
    }

    pub fn letter_count(&self) -> usize {
        self.letter_range().len()
    }

    pub fn unique_letters(&self) -> &'a [char] {
        let corpus = self.corpus;
        let range = self.letter_range();
        self.data()
            .unique_letters
            .get_or_compute(|| sorted_unique(corpus.letters[range].iter().map(|l| l.character)))
    }

    pub fn translation(&self, id: &str) -> Option<&'a str> {
        self.data().translations.get(id).map(String::as_str)
    }

    /// Occurrence/frequency of the verse text in `scope` (chapter or book).
    pub fn tally(&self, scope: Scope) -> Tally {
        self.data().tallies[scope.index()]
    }

    pub fn next(&self) -> Option<Verse<'a>> {
        self.corpus.verse(self.index + 1)
    }

    pub fn previous(&self) -> Option<Verse<'a>> {
        self.index.checked_sub(1).and_then(|i| self.corpus.verse(i))
    }
}

impl fmt::Debug for Verse<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Verse({})", self.address())
    }
}

impl<'a> Word<'a> {
    pub fn number(&self) -> usize {
        self.data().number
    }

    pub fn number_in_chapter(&self) -> usize {
        self.data().number_in_chapter
    }

    pub fn number_in_verse(&self) -> usize {
        self.data().number_in_verse
    }

    /// `chapter:verse:word` address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.verse().address(), self.number_in_verse())
    }

    /// Word text with diacritics, marker characters removed.
    pub fn text(&self) -> &'a str {
        &self.data().text
    }

    pub fn simplified_text(&self) -> String {
        simplify(self.text(), self.corpus.text_mode()).trim().to_string()
    }

    /// Character index of the word's first character in the verse text.
    pub fn position(&self) -> usize {
        self.data().position
    }

    pub fn stopmark(&self) -> Stopmark {
        self.data().stopmark
    }

    pub fn roots(&self) -> &'a [String] {
        &self.data().roots
    }

    /// Longest of [`Word::roots`], or `""` when the word has none.
    pub fn best_root(&self) -> &'a str {
        &self.data().best_root
    }

    pub fn verse(&self) -> Verse<'a> {
        Verse::new(self.corpus, self.data().verse)
    }

    pub fn chapter(&self) -> Chapter<'a> {
        self.verse().chapter()
    }

    pub fn letter_range(&self) -> Range<usize> {
        self.data().letters.clone()
    }

    pub fn letters(&self) -> impl Iterator<Item = Letter<'a>> + use<'a> {
        let corpus = self.corpus;
        self.letter_range().map(move |i| Letter::new(corpus, i))
    }

    pub fn letter_count(&self) -> usize {
        self.data().letters.len()
    }

    pub fn unique_letters(&self) -> &'a [char] {
        let corpus = self.corpus;
        let range = self.letter_range();
        self.data()
            .unique_letters
            .get_or_compute(|| sorted_unique(corpus.letters[range].iter().map(|l| l.character)))
    }

    /// Occurrence/frequency of the word text in `scope` (verse, chapter or book).
    pub fn tally(&self, scope: Scope) -> Tally {
        self.data().tallies[scope.index()]
    }
}

impl fmt::Debug for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({} {})", self.address(), self.text())
    }
}

impl<'a> Letter<'a> {
    pub fn character(&self) -> char {
        self.data().character
    }

    pub fn number(&self) -> usize {
        self.data().number
    }

    pub fn number_in_chapter(&self) -> usize {
        self.data().number_in_chapter
    }

    pub fn number_in_verse(&self) -> usize {
        self.data().number_in_verse
    }

    pub fn number_in_word(&self) -> usize {
        self.data().number_in_word
    }

    pub fn word(&self) -> Word<'a> {
        Word::new(self.corpus, self.data().word)
    }

    pub fn verse(&self) -> Verse<'a> {
        self.word().verse()
    }

    pub fn chapter(&self) -> Chapter<'a> {
        self.verse().chapter()
    }

    pub fn tally(&self, scope: Scope) -> Tally {
        self.data().tallies[scope.index()]
    }
}

impl fmt::Debug for Letter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Letter({} {})", self.number(), self.character())
    }
}

impl<'a> Partition<'a> {
    pub(crate) fn new(corpus: &'a Corpus, kind: PartitionKind, index: usize) -> Self {
        Self {
            corpus,
            kind,
            index,
        }
    }

    fn data(&self) -> &'a PartitionData {
        &self.corpus.partitions[self.kind.index()][self.index]
    }

    pub fn kind(&self) -> PartitionKind {
        self.data().kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn number(&self) -> usize {
        self.data().number
    }

    pub fn verse_range(&self) -> Range<usize> {
        self.data().verses.clone()
    }

    pub fn verses(&self) -> impl Iterator<Item = Verse<'a>> + use<'a> {
        let corpus = self.corpus;
        self.verse_range().map(move |i| Verse::new(corpus, i))
    }

    pub fn verse_count(&self) -> usize {
        self.data().verses.len()
    }

    pub fn word_count(&self) -> usize {
        self.corpus.word_span(self.verse_range()).len()
    }

    pub fn letter_count(&self) -> usize {
        let words = self.corpus.word_span(self.verse_range());
        self.corpus.letter_span(words).len()
    }

    /// Chapters the partition touches, in order.
    pub fn chapters(&self) -> Vec<Chapter<'a>> {
        let mut out: Vec<Chapter<'a>> = Vec::new();
        for verse in self.verses() {
            let chapter = verse.chapter();
            if out.last() != Some(&chapter) {
                out.push(chapter);
            }
        }
        out
    }
}

impl PartialEq for Partition<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.corpus, other.corpus)
            && self.kind == other.kind
            && self.index == other.index
    }
}

impl Eq for Partition<'_> {}

impl fmt::Debug for Partition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefers_first_of_equal_length() {
        let roots = vec!["ab".to_string(), "xyz".to_string(), "uvw".to_string()];
        assert_eq!(longest(&roots), "xyz");
        assert_eq!(longest(&[]), "");
    }

    #[test]
    fn unique_letters_are_sorted_and_deduplicated() {
        assert_eq!(sorted_unique("banana".chars()), vec!['a', 'b', 'n']);
    }
}
