//! Explicit sort orders for words and letters.

use std::cmp::Ordering;

use quran_types::Scope;

use crate::entities::{Letter, Word};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum WordOrder {
    /// Document order.
    #[default]
    Number,
    Text,
    /// Letter count.
    Length,
    Frequency(Scope),
    Occurrence(Scope),
}

impl WordOrder {
    pub fn compare(self, a: &Word<'_>, b: &Word<'_>) -> Ordering {
        match self {
            WordOrder::Number => a.number().cmp(&b.number()),
            WordOrder::Text => a.text().cmp(b.text()),
            WordOrder::Length => a.letter_count().cmp(&b.letter_count()),
            WordOrder::Frequency(scope) => a.tally(scope).frequency.cmp(&b.tally(scope).frequency),
            WordOrder::Occurrence(scope) => {
                a.tally(scope).occurrence.cmp(&b.tally(scope).occurrence)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum LetterOrder {
    #[default]
    Number,
    Character,
    Frequency(Scope),
    Occurrence(Scope),
}

impl LetterOrder {
    pub fn compare(self, a: &Letter<'_>, b: &Letter<'_>) -> Ordering {
        match self {
            LetterOrder::Number => a.number().cmp(&b.number()),
            LetterOrder::Character => a.character().cmp(&b.character()),
            LetterOrder::Frequency(scope) => {
                a.tally(scope).frequency.cmp(&b.tally(scope).frequency)
            }
            LetterOrder::Occurrence(scope) => {
                a.tally(scope).occurrence.cmp(&b.tally(scope).occurrence)
            }
        }
    }
}

/// Stable sort; ties keep document order regardless of direction.
pub fn sort_words(words: &mut [Word<'_>], order: WordOrder, direction: SortDirection) {
    words.sort_by(|a, b| {
        direction
            .apply(order.compare(a, b))
            .then_with(|| a.number().cmp(&b.number()))
    });
}

pub fn sort_letters(letters: &mut [Letter<'_>], order: LetterOrder, direction: SortDirection) {
    letters.sort_by(|a, b| {
        direction
            .apply(order.compare(a, b))
            .then_with(|| a.number().cmp(&b.number()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CorpusBuilder, Metadata, VerseRecord};

    #[test]
    fn sorts_words_by_frequency_then_document_order() {
        let corpus = CorpusBuilder::new(Metadata::from_verse_counts(&[2]))
            .build(vec![
                VerseRecord::new(1, "ba abc ba"),
                VerseRecord::new(2, "d abc ba"),
            ])
            .unwrap();
        let mut words: Vec<_> = corpus.words().collect();
        sort_words(
            &mut words,
            WordOrder::Frequency(Scope::Book),
            SortDirection::Descending,
        );
        let texts: Vec<_> = words.iter().map(|w| w.text()).collect();
        assert_eq!(texts, vec!["ba", "ba", "ba", "abc", "abc", "d"]);
        assert_eq!(words[0].number(), 1);

        sort_words(&mut words, WordOrder::Length, SortDirection::Ascending);
        assert_eq!(words[0].text(), "d");
        assert_eq!(words[5].text(), "abc");
    }

    #[test]
    fn sorts_letters_by_character() {
        let corpus = CorpusBuilder::new(Metadata::from_verse_counts(&[1]))
            .build(vec![VerseRecord::new(1, "cab")])
            .unwrap();
        let mut letters: Vec<_> = corpus.letters().collect();
        sort_letters(&mut letters, LetterOrder::Character, SortDirection::Descending);
        let chars: Vec<_> = letters.iter().map(|l| l.character()).collect();
        assert_eq!(chars, vec!['c', 'b', 'a']);
        sort_letters(&mut letters, LetterOrder::default(), SortDirection::Ascending);
        assert_eq!(letters[0].character(), 'c');
    }
}
