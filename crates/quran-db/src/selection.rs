//! A lazily materialised subset of the book.

use quran_types::PartitionKind;

use crate::corpus::Corpus;
use crate::entities::{Chapter, Verse};
use crate::memo::Memo;

/// Which kind of unit a [`Selection`]'s indices refer to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SelectionScope {
    Book,
    Chapter,
    Verse,
    Partition(PartitionKind),
}

/// Units of one scope picked by 0-based index. Verse and chapter lists are
/// derived on first access and cached; indices outside the scope are skipped.
#[derive(Debug)]
pub struct Selection<'a> {
    corpus: &'a Corpus,
    scope: SelectionScope,
    indexes: Vec<usize>,
    verses: Memo<Vec<usize>>,
    chapters: Memo<Vec<usize>>,
}

impl<'a> Selection<'a> {
    pub fn new(corpus: &'a Corpus, scope: SelectionScope, indexes: Vec<usize>) -> Self {
        Self {
            corpus,
            scope,
            indexes,
            verses: Memo::new(),
            chapters: Memo::new(),
        }
    }

    /// The whole book.
    pub fn book(corpus: &'a Corpus) -> Self {
        Self::new(corpus, SelectionScope::Book, Vec::new())
    }

    pub fn scope(&self) -> SelectionScope {
        self.scope
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    fn verse_indexes(&self) -> &[usize] {
        self.verses.get_or_compute(|| {
            let corpus = self.corpus;
            let mut out: Vec<usize> = match self.scope {
                SelectionScope::Book => (0..corpus.verse_count()).collect(),
                SelectionScope::Chapter => self
                    .indexes
                    .iter()
                    .filter_map(|&i| corpus.chapter(i))
                    .flat_map(|c| c.verse_range())
                    .collect(),
                SelectionScope::Verse => self
                    .indexes
                    .iter()
                    .copied()
                    .filter(|&i| i < corpus.verse_count())
                    .collect(),
                SelectionScope::Partition(kind) => self
                    .indexes
                    .iter()
                    .filter_map(|&i| corpus.partition(kind, i))
                    .flat_map(|p| p.verse_range())
                    .collect(),
            };
            out.sort_unstable();
            out.dedup();
            out
        })
    }

    pub fn verses(&self) -> Vec<Verse<'a>> {
        let corpus = self.corpus;
        self.verse_indexes()
            .iter()
            .filter_map(|&i| corpus.verse(i))
            .collect()
    }

    pub fn chapters(&self) -> Vec<Chapter<'a>> {
        let corpus = self.corpus;
        let indexes = self.chapters.get_or_compute(|| {
            let mut out: Vec<usize> = Vec::new();
            for &v in self.verse_indexes() {
                let chapter = corpus.verses[v].chapter;
                if out.last() != Some(&chapter) {
                    out.push(chapter);
                }
            }
            out
        });
        indexes.iter().filter_map(|&i| corpus.chapter(i)).collect()
    }

    pub fn verse_count(&self) -> usize {
        self.verse_indexes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.verse_indexes().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.verses().iter().map(|v| v.word_count()).sum()
    }

    pub fn letter_count(&self) -> usize {
        self.verses().iter().map(|v| v.letter_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CorpusBuilder, Metadata, PartitionRecord, VerseRecord};

    fn corpus() -> Corpus {
        let mut metadata = Metadata::from_verse_counts(&[2, 2]);
        *metadata.partitions_mut(PartitionKind::Quarter) = vec![
            PartitionRecord {
                number: 1,
                chapter: 1,
                verse: 1,
            },
            PartitionRecord {
                number: 2,
                chapter: 1,
                verse: 2,
            },
        ];
        CorpusBuilder::new(metadata)
            .build(vec![
                VerseRecord::new(1, "a b"),
                VerseRecord::new(2, "c"),
                VerseRecord::new(3, "d e f"),
                VerseRecord::new(4, "g"),
            ])
            .unwrap()
    }

    #[test]
    fn selects_chapters_and_skips_bad_indexes() {
        let corpus = corpus();
        let selection = Selection::new(&corpus, SelectionScope::Chapter, vec![1, 7]);
        let numbers: Vec<_> = selection.verses().iter().map(|v| v.number()).collect();
        assert_eq!(numbers, vec![3, 4]);
        assert_eq!(selection.word_count(), 4);
        assert_eq!(selection.chapters().len(), 1);
    }

    #[test]
    fn partition_selection_spans_chapters() {
        let corpus = corpus();
        let selection = Selection::new(
            &corpus,
            SelectionScope::Partition(PartitionKind::Quarter),
            vec![1],
        );
        assert_eq!(selection.verse_count(), 3);
        let chapters: Vec<_> = selection.chapters().iter().map(|c| c.number()).collect();
        assert_eq!(chapters, vec![1, 2]);
    }

    #[test]
    fn derived_lists_are_cached() {
        let corpus = corpus();
        let selection = Selection::new(&corpus, SelectionScope::Verse, vec![3, 0, 3]);
        assert_eq!(selection.verses(), selection.verses());
        assert_eq!(selection.verse_count(), 2);
        assert_eq!(selection.verses.computations(), 1);
        assert!(Selection::book(&corpus).letter_count() == corpus.letter_count());
    }
}
