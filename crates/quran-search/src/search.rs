//! Token-level search over verse text.
//!
//! Verse and pattern text are simplified at the corpus text mode and split
//! on whitespace. Marker tokens (stopmarks and Quran marks) are dropped from
//! verses unless the pattern itself contains a marker character, so phrases
//! match across pause signs.

use std::collections::BTreeMap;

use quran_db::Verse;
use quran_types::{
    SimplificationLevel, TextLocationInVerse, TextLocationInWord, TextWordness,
    is_marker_char, located, simplify,
};
use tracing::debug;

/// Surface form to occurrence count, ordered by surface form.
pub type WordCounts = BTreeMap<String, usize>;

#[derive(Debug)]
struct Pattern {
    tokens: Vec<String>,
    keep_markers: bool,
}

impl Pattern {
    fn parse(text: &str, mode: SimplificationLevel) -> Self {
        let keep_markers = text.chars().any(is_marker_char);
        let tokens = tokenize(&simplify(text, mode), keep_markers);
        Self {
            tokens,
            keep_markers,
        }
    }
}

fn tokenize(text: &str, keep_markers: bool) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|token| {
            if keep_markers {
                return Some(token.to_string());
            }
            let bare = token.trim_matches(is_marker_char);
            (!bare.is_empty()).then(|| bare.to_string())
        })
        .collect()
}

fn verse_tokens(verse: &Verse<'_>, mode: SimplificationLevel, keep_markers: bool) -> Vec<String> {
    tokenize(&simplify(verse.text(), mode), keep_markers)
}

/// Mode of the corpus the verses come from, or `None` for an empty slice.
fn text_mode(verses: &[Verse<'_>]) -> Option<SimplificationLevel> {
    verses.first().map(|v| v.corpus().text_mode())
}

/// Whether `pattern` sits on `tokens` starting at `start`: the first token
/// must end its verse token, placed there as `location` allows, and each
/// following one must start the next verse token.
fn phrase_at(
    tokens: &[String],
    start: usize,
    pattern: &[String],
    location: TextLocationInWord,
) -> bool {
    let Some(window) = tokens.get(start..start + pattern.len()) else {
        return false;
    };
    let [first, rest @ ..] = pattern else {
        return false;
    };
    window[0].ends_with(first.as_str())
        && located(&window[0], first, location)
        && window[1..]
            .iter()
            .zip(rest)
            .all(|(token, p)| token.starts_with(p.as_str()))
}

/// Verse tokens matching a single-token pattern, counted per surface form.
///
/// `verse_location` restricts which token positions are considered;
/// `wordness` decides whether the token must equal the pattern, strictly
/// contain it at `word_location`, or either. Multi-token patterns match
/// nothing.
pub fn words_containing(
    verses: &[Verse<'_>],
    pattern: &str,
    verse_location: TextLocationInVerse,
    word_location: TextLocationInWord,
    wordness: TextWordness,
) -> WordCounts {
    let mut counts = WordCounts::new();
    let Some(mode) = text_mode(verses) else {
        return counts;
    };
    let pattern = Pattern::parse(pattern, mode);
    let [needle] = pattern.tokens.as_slice() else {
        debug!(tokens = pattern.tokens.len(), "words_containing needs exactly one token");
        return counts;
    };

    for verse in verses {
        let tokens = verse_tokens(verse, mode, pattern.keep_markers);
        for (i, token) in tokens.iter().enumerate() {
            if !verse_location.admits(i, tokens.len()) {
                continue;
            }
            let matched = match wordness {
                TextWordness::WholeWord => token == needle,
                TextWordness::PartOfWord => token != needle && located(token, needle, word_location),
                TextWordness::Any => located(token, needle, word_location),
            };
            if matched {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Candidates for the word being typed: the verse token under the last
/// pattern token, when the tokens before it match the preceding verse
/// tokens by prefix.
///
/// For a single `AtMiddle` token every inner occurrence counts, overlapping
/// ones included, so a word holding the pattern twice away from its edges
/// counts twice.
pub fn current_words(verses: &[Verse<'_>], pattern: &str, word_location: TextLocationInWord) -> WordCounts {
    let mut counts = WordCounts::new();
    let Some(mode) = text_mode(verses) else {
        return counts;
    };
    let pattern = Pattern::parse(pattern, mode);
    let Some((last, preceding)) = pattern.tokens.split_last() else {
        return counts;
    };

    for verse in verses {
        let tokens = verse_tokens(verse, mode, pattern.keep_markers);
        if preceding.is_empty() {
            for token in &tokens {
                let n = placed_count(token, last, word_location);
                if n > 0 {
                    *counts.entry(token.clone()).or_insert(0) += n;
                }
            }
            continue;
        }

        let k = pattern.tokens.len();
        let mut i = k - 1;
        while i < tokens.len() {
            let start = i + 1 - k;
            let matched = located(&tokens[i], last, word_location)
                && tokens[start..i]
                    .iter()
                    .zip(preceding)
                    .all(|(token, p)| token.starts_with(p.as_str()));
            if matched {
                *counts.entry(tokens[i].clone()).or_insert(0) += 1;
                i += k;
            } else {
                i += 1;
            }
        }
    }
    counts
}

fn placed_count(token: &str, needle: &str, location: TextLocationInWord) -> usize {
    match location {
        TextLocationInWord::AtMiddle => token
            .char_indices()
            .filter(|&(i, _)| {
                i > 0 && token[i..].starts_with(needle) && i + needle.len() < token.len()
            })
            .count(),
        _ => usize::from(located(token, needle, location)),
    }
}

/// Verse tokens that directly follow an occurrence of the phrase, counted
/// per surface form. Matches never span two verses; overlapping matches
/// are all found.
pub fn next_words(verses: &[Verse<'_>], pattern: &str, word_location: TextLocationInWord) -> WordCounts {
    let mut counts = WordCounts::new();
    let Some(mode) = text_mode(verses) else {
        return counts;
    };
    let pattern = Pattern::parse(pattern, mode);
    let k = pattern.tokens.len();
    if k == 0 {
        return counts;
    }

    for verse in verses {
        let tokens = verse_tokens(verse, mode, pattern.keep_markers);
        let mut i = 0;
        while i + k < tokens.len() {
            if phrase_at(&tokens, i, &pattern.tokens, word_location) {
                *counts.entry(tokens[i + k].clone()).or_insert(0) += 1;
                i += (k - 1).max(1);
            } else {
                i += 1;
            }
        }
    }
    counts
}

/// Verses holding the phrase anywhere, in input order. A single-token
/// pattern only needs to sit inside some verse token at `word_location`.
pub fn verses_containing<'a>(
    verses: &[Verse<'a>],
    pattern: &str,
    word_location: TextLocationInWord,
) -> Vec<Verse<'a>> {
    let Some(mode) = text_mode(verses) else {
        return Vec::new();
    };
    let pattern = Pattern::parse(pattern, mode);
    if pattern.tokens.is_empty() {
        return Vec::new();
    }
    verses
        .iter()
        .filter(|verse| {
            let tokens = verse_tokens(verse, mode, pattern.keep_markers);
            match pattern.tokens.as_slice() {
                [only] => tokens.iter().any(|t| located(t, only, word_location)),
                phrase => (0..tokens.len()).any(|i| phrase_at(&tokens, i, phrase, word_location)),
            }
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quran_db::{Corpus, CorpusBuilder, Metadata, VerseRecord};

    fn corpus(lines: &[&str]) -> Corpus {
        let records = lines
            .iter()
            .enumerate()
            .map(|(i, line)| VerseRecord::new(i + 1, *line))
            .collect();
        CorpusBuilder::new(Metadata::from_verse_counts(&[lines.len()]))
            .build(records)
            .unwrap()
    }

    fn counts(pairs: &[(&str, usize)]) -> WordCounts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn round_trip_on_a_three_word_verse() {
        let corpus = corpus(&["A B C"]);
        let verses: Vec<_> = corpus.verses().collect();

        let whole = words_containing(
            &verses,
            "B",
            TextLocationInVerse::Any,
            TextLocationInWord::Any,
            TextWordness::WholeWord,
        );
        assert_eq!(whole, counts(&[("B", 1)]));
        assert!(current_words(&verses, "A B", TextLocationInWord::Any).contains_key("B"));
        assert_eq!(next_words(&verses, "A", TextLocationInWord::Any), counts(&[("B", 1)]));
    }

    #[test]
    fn wordness_splits_whole_from_partial_matches() {
        let corpus = corpus(&["ab abc cab ab"]);
        let verses: Vec<_> = corpus.verses().collect();
        let run = |wordness| {
            words_containing(
                &verses,
                "ab",
                TextLocationInVerse::Any,
                TextLocationInWord::Any,
                wordness,
            )
        };
        assert_eq!(run(TextWordness::WholeWord), counts(&[("ab", 2)]));
        assert_eq!(run(TextWordness::PartOfWord), counts(&[("abc", 1), ("cab", 1)]));
        assert_eq!(run(TextWordness::Any), counts(&[("ab", 2), ("abc", 1), ("cab", 1)]));
    }

    #[test]
    fn verse_location_limits_token_positions() {
        let corpus = corpus(&["xa xb xc", "xd"]);
        let verses: Vec<_> = corpus.verses().collect();
        let at = |location| {
            words_containing(
                &verses,
                "x",
                location,
                TextLocationInWord::AtStart,
                TextWordness::Any,
            )
        };
        assert_eq!(at(TextLocationInVerse::AtStart), counts(&[("xa", 1), ("xd", 1)]));
        assert_eq!(at(TextLocationInVerse::AtMiddle), counts(&[("xb", 1)]));
        assert_eq!(at(TextLocationInVerse::AtEnd), counts(&[("xc", 1), ("xd", 1)]));
    }

    #[test]
    fn multi_token_patterns_are_not_words() {
        let corpus = corpus(&["A B C"]);
        let verses: Vec<_> = corpus.verses().collect();
        let found = words_containing(
            &verses,
            "A B",
            TextLocationInVerse::Any,
            TextLocationInWord::Any,
            TextWordness::Any,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn middle_placement_counts_inner_occurrences() {
        let corpus = corpus(&["xaax aa axa"]);
        let verses: Vec<_> = corpus.verses().collect();
        let found = current_words(&verses, "a", TextLocationInWord::AtMiddle);
        assert_eq!(found, counts(&[("xaax", 2)]));

        let corpus = self::corpus(&["aaaa xaaax"]);
        let verses: Vec<_> = corpus.verses().collect();
        let found = current_words(&verses, "aa", TextLocationInWord::AtMiddle);
        assert_eq!(found, counts(&[("aaaa", 1), ("xaaax", 2)]));
    }

    #[test]
    fn current_words_anchor_on_the_last_token() {
        let corpus = corpus(&["one two three one twice"]);
        let verses: Vec<_> = corpus.verses().collect();
        let found = current_words(&verses, "on tw", TextLocationInWord::AtStart);
        assert_eq!(found, counts(&[("twice", 1), ("two", 1)]));
    }

    #[test]
    fn next_words_find_overlapping_matches() {
        let corpus = corpus(&["A A A B"]);
        let verses: Vec<_> = corpus.verses().collect();
        let found = next_words(&verses, "A A", TextLocationInWord::Any);
        assert_eq!(found, counts(&[("A", 1), ("B", 1)]));
    }

    #[test]
    fn next_words_need_the_pattern_to_end_a_token() {
        let corpus = corpus(&["bAc D", "xA E"]);
        let verses: Vec<_> = corpus.verses().collect();
        assert_eq!(next_words(&verses, "A", TextLocationInWord::Any), counts(&[("E", 1)]));
        assert!(next_words(&verses, "A", TextLocationInWord::AtStart).is_empty());
        assert_eq!(
            next_words(&verses, "c D", TextLocationInWord::Any),
            WordCounts::new()
        );
        assert_eq!(next_words(&verses, "bAc", TextLocationInWord::AtStart), counts(&[("D", 1)]));
    }

    #[test]
    fn next_words_stop_at_verse_end() {
        let corpus = corpus(&["A B", "C D"]);
        let verses: Vec<_> = corpus.verses().collect();
        assert!(next_words(&verses, "B", TextLocationInWord::Any).is_empty());
        assert_eq!(
            next_words(&verses, "A B", TextLocationInWord::Any),
            WordCounts::new()
        );
    }

    #[test]
    fn markers_are_skipped_unless_asked_for() {
        let corpus = corpus(&["A ۚ B"]);
        let verses: Vec<_> = corpus.verses().collect();
        assert_eq!(next_words(&verses, "A", TextLocationInWord::Any), counts(&[("B", 1)]));
        assert_eq!(next_words(&verses, "A ۚ", TextLocationInWord::Any), counts(&[("B", 1)]));
        assert_eq!(
            next_words(&verses, "ۚ", TextLocationInWord::Any),
            counts(&[("B", 1)])
        );
    }

    #[test]
    fn verses_containing_matches_phrases() {
        let corpus = corpus(&["the cat sat", "a cat ran", "sat cat"]);
        let verses: Vec<_> = corpus.verses().collect();
        let found: Vec<_> = verses_containing(&verses, "cat s", TextLocationInWord::Any)
            .iter()
            .map(|v| v.number())
            .collect();
        assert_eq!(found, vec![1]);
        let single: Vec<_> = verses_containing(&verses, "ran", TextLocationInWord::AtEnd)
            .iter()
            .map(|v| v.number())
            .collect();
        assert_eq!(single, vec![2]);
    }

    #[test]
    fn empty_inputs_find_nothing() {
        let corpus = corpus(&["A B"]);
        let verses: Vec<_> = corpus.verses().collect();
        assert!(next_words(&verses, "   ", TextLocationInWord::Any).is_empty());
        assert!(current_words(&[], "A", TextLocationInWord::Any).is_empty());
        assert!(verses_containing(&verses, "", TextLocationInWord::Any).is_empty());
    }
}
