//! Which parents a subset of children covers completely.
//!
//! Membership is tracked in bitsets over arena indices. The subset is sorted
//! first, so a complete parent's children form one contiguous run and the
//! scan can jump past it in a single step.

use std::ops::Range;

use bitvec::prelude::*;
use quran_db::{Chapter, Letter, Verse, Word};

type BitSet = BitVec<usize, Lsb0>;

/// Words whose every letter is in `letters`, in corpus order.
pub fn complete_words<'a>(letters: &[Letter<'a>]) -> Vec<Word<'a>> {
    let Some(corpus) = letters.first().map(|l| l.corpus()) else {
        return Vec::new();
    };
    complete_parents(
        letters.iter().map(|l| l.index()),
        corpus.letter_count(),
        corpus.word_count(),
        |i| corpus.letter(i).map(|l| l.word().index()),
        |p| corpus.word(p).map(|w| w.letter_range()),
    )
    .into_iter()
    .filter_map(|p| corpus.word(p))
    .collect()
}

/// Verses whose every word is in `words`, in corpus order.
pub fn complete_verses<'a>(words: &[Word<'a>]) -> Vec<Verse<'a>> {
    let Some(corpus) = words.first().map(|w| w.corpus()) else {
        return Vec::new();
    };
    complete_parents(
        words.iter().map(|w| w.index()),
        corpus.word_count(),
        corpus.verse_count(),
        |i| corpus.word(i).map(|w| w.verse().index()),
        |p| corpus.verse(p).map(|v| v.word_range()),
    )
    .into_iter()
    .filter_map(|p| corpus.verse(p))
    .collect()
}

/// Chapters whose every verse is in `verses`, in corpus order.
pub fn complete_chapters<'a>(verses: &[Verse<'a>]) -> Vec<Chapter<'a>> {
    let Some(corpus) = verses.first().map(|v| v.corpus()) else {
        return Vec::new();
    };
    complete_parents(
        verses.iter().map(|v| v.index()),
        corpus.verse_count(),
        corpus.chapter_count(),
        |i| corpus.verse(i).map(|v| v.chapter().index()),
        |p| corpus.chapter(p).map(|c| c.verse_range()),
    )
    .into_iter()
    .filter_map(|p| corpus.chapter(p))
    .collect()
}

fn complete_parents(
    children: impl Iterator<Item = usize>,
    child_total: usize,
    parent_total: usize,
    parent_of: impl Fn(usize) -> Option<usize>,
    children_of: impl Fn(usize) -> Option<Range<usize>>,
) -> Vec<usize> {
    let mut members: BitSet = bitvec![usize, Lsb0; 0; child_total];
    for child in children.filter(|&c| c < child_total) {
        members.set(child, true);
    }
    let sorted: Vec<usize> = members.iter_ones().collect();

    let mut seen: BitSet = bitvec![usize, Lsb0; 0; parent_total];
    let mut out = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let Some(parent) = parent_of(sorted[i]).filter(|&p| p < parent_total) else {
            i += 1;
            continue;
        };
        if seen[parent] {
            i += 1;
            continue;
        }
        seen.set(parent, true);

        let range = children_of(parent).unwrap_or(0..0);
        if !range.is_empty() && members[range.clone()].all() {
            out.push(parent);
            i += range.len();
        } else {
            i += 1;
        }
    }
    out
}
