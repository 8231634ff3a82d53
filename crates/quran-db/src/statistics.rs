//! Occurrence and frequency of letters, words and verses in nested scopes.
//!
//! One pass in document order keeps a running-count table per open scope
//! instance (word, verse, chapter, book). An instance's occurrence is the
//! count right after it is recorded; when a scope instance closes, every
//! unit inside it receives the final count of its text as frequency.

use std::collections::HashMap;

use quran_types::{Scope, SimplificationLevel, simplify};

use crate::corpus::Corpus;
use crate::entities::Tallies;

type Counts<'k> = HashMap<&'k str, usize>;

fn key(text: &str, mode: SimplificationLevel) -> String {
    simplify(text, mode).trim().to_string()
}

/// Record one instance; returns its occurrence. Empty keys are not counted.
fn bump<'k>(counts: &mut Counts<'k>, key: &'k str) -> usize {
    if key.is_empty() {
        return 0;
    }
    let count = counts.entry(key).or_insert(0);
    *count += 1;
    *count
}

fn settle(tallies: &mut Tallies, scope: Scope, counts: &Counts<'_>, key: &str) {
    tallies[scope.index()].frequency = counts.get(key).copied().unwrap_or(0);
}

pub(crate) fn compute(corpus: &mut Corpus) {
    let mode = corpus.text_mode;
    let letter_keys: Vec<String> = corpus
        .letters
        .iter()
        .map(|l| key(l.character.encode_utf8(&mut [0; 4]), mode))
        .collect();
    let word_keys: Vec<String> = corpus.words.iter().map(|w| key(&w.text, mode)).collect();
    let verse_keys: Vec<String> = corpus
        .verses
        .iter()
        .map(|v| {
            let joined = corpus.words[v.words.clone()]
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            key(&joined, mode)
        })
        .collect();

    let mut book_letters = Counts::new();
    let mut book_words = Counts::new();
    let mut book_verses = Counts::new();

    for c in 0..corpus.chapters.len() {
        let chapter_verses = corpus.chapters[c].verses.clone();
        let chapter_words = corpus.word_span(chapter_verses.clone());
        let chapter_letters = corpus.letter_span(chapter_words.clone());
        let mut in_chapter_letters = Counts::new();
        let mut in_chapter_words = Counts::new();
        let mut in_chapter_verses = Counts::new();

        for v in chapter_verses.clone() {
            let k = verse_keys[v].as_str();
            let tallies = &mut corpus.verses[v].tallies;
            tallies[Scope::Chapter.index()].occurrence = bump(&mut in_chapter_verses, k);
            tallies[Scope::Book.index()].occurrence = bump(&mut book_verses, k);

            let verse_words = corpus.verses[v].words.clone();
            let verse_letters = corpus.letter_span(verse_words.clone());
            let mut in_verse_letters = Counts::new();
            let mut in_verse_words = Counts::new();

            for w in verse_words.clone() {
                let k = word_keys[w].as_str();
                let tallies = &mut corpus.words[w].tallies;
                tallies[Scope::Verse.index()].occurrence = bump(&mut in_verse_words, k);
                tallies[Scope::Chapter.index()].occurrence = bump(&mut in_chapter_words, k);
                tallies[Scope::Book.index()].occurrence = bump(&mut book_words, k);

                let word_letters = corpus.words[w].letters.clone();
                let mut in_word_letters = Counts::new();
                for l in word_letters.clone() {
                    let k = letter_keys[l].as_str();
                    let tallies = &mut corpus.letters[l].tallies;
                    tallies[Scope::Word.index()].occurrence = bump(&mut in_word_letters, k);
                    tallies[Scope::Verse.index()].occurrence = bump(&mut in_verse_letters, k);
                    tallies[Scope::Chapter.index()].occurrence =
                        bump(&mut in_chapter_letters, k);
                    tallies[Scope::Book.index()].occurrence = bump(&mut book_letters, k);
                }
                for l in word_letters {
                    settle(
                        &mut corpus.letters[l].tallies,
                        Scope::Word,
                        &in_word_letters,
                        &letter_keys[l],
                    );
                }
            }

            for w in verse_words {
                settle(
                    &mut corpus.words[w].tallies,
                    Scope::Verse,
                    &in_verse_words,
                    &word_keys[w],
                );
            }
            for l in verse_letters {
                settle(
                    &mut corpus.letters[l].tallies,
                    Scope::Verse,
                    &in_verse_letters,
                    &letter_keys[l],
                );
            }
        }

        for v in chapter_verses {
            settle(
                &mut corpus.verses[v].tallies,
                Scope::Chapter,
                &in_chapter_verses,
                &verse_keys[v],
            );
        }
        for w in chapter_words {
            settle(
                &mut corpus.words[w].tallies,
                Scope::Chapter,
                &in_chapter_words,
                &word_keys[w],
            );
        }
        for l in chapter_letters {
            settle(
                &mut corpus.letters[l].tallies,
                Scope::Chapter,
                &in_chapter_letters,
                &letter_keys[l],
            );
        }
    }

    for (v, verse) in corpus.verses.iter_mut().enumerate() {
        settle(&mut verse.tallies, Scope::Book, &book_verses, &verse_keys[v]);
    }
    for (w, word) in corpus.words.iter_mut().enumerate() {
        settle(&mut word.tallies, Scope::Book, &book_words, &word_keys[w]);
    }
    for (l, letter) in corpus.letters.iter_mut().enumerate() {
        settle(&mut letter.tallies, Scope::Book, &book_letters, &letter_keys[l]);
    }
}
