//! Resolve global ordinals to entities.
//!
//! Ordinals wrap around the book: with `N` verses, verse `N + 1` is verse 1
//! again. Zero, negative ordinals and an empty corpus resolve to nothing.

use crate::corpus::Corpus;
use crate::entities::{Letter, Verse, Word};

/// Map a 1-based ordinal onto `0..count`, wrapping past the end.
fn wrap(ordinal: i64, count: usize) -> Option<usize> {
    if ordinal <= 0 || count == 0 {
        return None;
    }
    let count = count as u64;
    let mut n = ordinal as u64 % count;
    if n == 0 {
        n = count;
    }
    Some((n - 1) as usize)
}

impl Corpus {
    pub fn verse_by_number(&self, number: i64) -> Option<Verse<'_>> {
        let index = wrap(number, self.verse_count())?;
        self.chapters()
            .find(|chapter| chapter.verse_range().contains(&index))
            .and_then(|chapter| chapter.verses().nth(index - chapter.verse_range().start))
    }

    pub fn word_by_number(&self, number: i64) -> Option<Word<'_>> {
        let index = wrap(number, self.word_count())?;
        self.verses()
            .find(|verse| verse.word_range().contains(&index))
            .and_then(|verse| verse.words().nth(index - verse.word_range().start))
    }

    pub fn letter_by_number(&self, number: i64) -> Option<Letter<'_>> {
        let index = wrap(number, self.letter_count())?;
        self.words()
            .find(|word| word.letter_range().contains(&index))
            .and_then(|word| word.letters().nth(index - word.letter_range().start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CorpusBuilder, Metadata, VerseRecord};

    fn corpus() -> Corpus {
        CorpusBuilder::new(Metadata::from_verse_counts(&[2, 1]))
            .build(vec![
                VerseRecord::new(1, "ab c"),
                VerseRecord::new(2, "de"),
                VerseRecord::new(3, "fgh ij"),
            ])
            .unwrap()
    }

    #[test]
    fn wraps_ordinals() {
        assert_eq!(wrap(1, 3), Some(0));
        assert_eq!(wrap(3, 3), Some(2));
        assert_eq!(wrap(4, 3), Some(0));
        assert_eq!(wrap(6, 3), Some(2));
        assert_eq!(wrap(0, 3), None);
        assert_eq!(wrap(-2, 3), None);
        assert_eq!(wrap(1, 0), None);
    }

    #[test]
    fn resolves_verses_with_wraparound() {
        let corpus = corpus();
        let n = corpus.verse_count() as i64;
        assert_eq!(corpus.verse_by_number(n + 1), corpus.verse_by_number(1));
        assert_eq!(corpus.verse_by_number(3).map(|v| v.address()), Some("2:1".into()));
        assert!(corpus.verse_by_number(0).is_none());
    }

    #[test]
    fn resolves_words_and_letters() {
        let corpus = corpus();
        assert_eq!(corpus.word_by_number(4).map(|w| w.text()), Some("fgh"));
        assert_eq!(corpus.word_by_number(6).map(|w| w.text()), Some("ab"));
        assert_eq!(corpus.letter_by_number(6).map(|l| l.character()), Some('f'));
        assert_eq!(corpus.letter_by_number(10).map(|l| l.character()), Some('j'));
        assert_eq!(corpus.letter_by_number(11).map(|l| l.character()), Some('a'));
        assert!(corpus.letter_by_number(-1).is_none());
    }

    #[test]
    fn empty_corpus_resolves_nothing() {
        let corpus = CorpusBuilder::new(Metadata::default())
            .build(Vec::new())
            .unwrap();
        assert!(corpus.verse_by_number(1).is_none());
        assert!(corpus.word_by_number(1).is_none());
        assert!(corpus.letter_by_number(1).is_none());
    }
}
