//! Query parsing and JSON reports for the `quran` binary.

use std::collections::BTreeMap;

use quran_db::selection::{Selection, SelectionScope};
use quran_db::sentence::sentences;
use quran_db::{Corpus, Verse, Word};
use quran_roots::RootIndex;
use quran_types::{ParseEnumError, PartitionKind, TextLocationInVerse, TextLocationInWord, TextWordness};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::search::{current_words, next_words, verses_containing, words_containing};

pub const COMMANDS: &str = "stats, words, current, next, find, roots, root, related, verse, sentences";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no command given (expected one of: {})", COMMANDS)]
    MissingCommand,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("--{option}: {source}")]
    InvalidOption {
        option: &'static str,
        #[source]
        source: ParseEnumError,
    },
    #[error("invalid scope `{0}` (expected chapter:N or <partition>:N)")]
    InvalidScope(String),
    #[error("no verse at `{0}`")]
    UnknownVerse(String),
    #[error("failed to render result")]
    Render(#[from] serde_json::Error),
}

/// What to run, with its arguments already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stats,
    Words {
        pattern: String,
        verse_location: TextLocationInVerse,
        word_location: TextLocationInWord,
        wordness: TextWordness,
    },
    Current {
        pattern: String,
        word_location: TextLocationInWord,
    },
    Next {
        pattern: String,
        word_location: TextLocationInWord,
    },
    Find {
        pattern: String,
        word_location: TextLocationInWord,
    },
    Roots {
        pattern: String,
        word_location: TextLocationInWord,
    },
    Root {
        text: String,
    },
    Related {
        text: String,
    },
    Verse {
        address: String,
    },
    Sentences,
}

/// Restriction of a query to one chapter or partition, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Within {
    pub scope: SelectionScope,
    pub number: usize,
}

impl Within {
    fn parse(raw: &str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidScope(raw.to_string());
        let (kind, number) = raw.split_once(':').ok_or_else(invalid)?;
        let number: usize = number.trim().parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }
        let scope = if kind.trim().eq_ignore_ascii_case("chapter") {
            SelectionScope::Chapter
        } else {
            SelectionScope::Partition(kind.parse::<PartitionKind>().map_err(|_| invalid())?)
        };
        Ok(Self { scope, number })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub command: Command,
    pub within: Option<Within>,
}

impl Query {
    /// Parse `<command> [--option=value]... [text]...`. Free arguments after
    /// the command are joined with single spaces.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, QueryError> {
        let mut name: Option<&str> = None;
        let mut words: Vec<&str> = Vec::new();
        let mut options: BTreeMap<&str, &str> = BTreeMap::new();
        for arg in args.iter().map(AsRef::as_ref) {
            if let Some(option) = arg.strip_prefix("--") {
                let (key, value) = option.split_once('=').unwrap_or((option, ""));
                options.insert(key, value);
            } else if name.is_none() {
                name = Some(arg);
            } else {
                words.push(arg);
            }
        }
        let name = name.ok_or(QueryError::MissingCommand)?;
        let text = words.join(" ");

        let mut take = |key: &'static str| options.remove(key);
        let within = take("within").map(Within::parse).transpose()?;
        let word_location = parse_option::<TextLocationInWord>(take("word-location"), "word-location")?;

        let needs = |command: &'static str, what: &'static str| -> Result<String, QueryError> {
            if text.trim().is_empty() {
                Err(QueryError::MissingArgument { command, what })
            } else {
                Ok(text.clone())
            }
        };
        let command = match name {
            "stats" => Command::Stats,
            "words" => Command::Words {
                pattern: needs("words", "a pattern")?,
                verse_location: parse_option(take("verse-location"), "verse-location")?,
                word_location,
                wordness: parse_option(take("wordness"), "wordness")?,
            },
            "current" => Command::Current {
                pattern: needs("current", "a pattern")?,
                word_location,
            },
            "next" => Command::Next {
                pattern: needs("next", "a pattern")?,
                word_location,
            },
            "find" => Command::Find {
                pattern: needs("find", "a pattern")?,
                word_location,
            },
            "roots" => Command::Roots {
                pattern: text.clone(),
                word_location,
            },
            "root" => Command::Root {
                text: needs("root", "a word")?,
            },
            "related" => Command::Related {
                text: needs("related", "a word")?,
            },
            "verse" => Command::Verse {
                address: needs("verse", "an address like 2:255")?,
            },
            "sentences" => Command::Sentences,
            other => return Err(QueryError::UnknownCommand(other.to_string())),
        };

        if let Some(key) = options.keys().next() {
            return Err(QueryError::UnknownOption(format!("--{key}")));
        }
        Ok(Self { command, within })
    }
}

fn parse_option<T>(raw: Option<&str>, option: &'static str) -> Result<T, QueryError>
where
    T: std::str::FromStr<Err = ParseEnumError> + Default,
{
    match raw {
        None => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|source| QueryError::InvalidOption { option, source }),
    }
}

#[derive(Serialize)]
struct StatsReport {
    text_mode: String,
    chapters: usize,
    verses: usize,
    words: usize,
    letters: usize,
    unique_letters: usize,
    partitions: BTreeMap<&'static str, usize>,
    translations: Vec<String>,
}

#[derive(Serialize)]
struct WordReport {
    address: String,
    text: String,
    stopmark: String,
    roots: Vec<String>,
}

#[derive(Serialize)]
struct VerseReport {
    address: String,
    text: String,
    words: Vec<WordReport>,
    translations: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct SentenceReport {
    start: String,
    end: String,
    words: usize,
    text: String,
}

fn word_report(word: &Word<'_>) -> WordReport {
    WordReport {
        address: word.address(),
        text: word.text().to_string(),
        stopmark: word.stopmark().to_string(),
        roots: word.roots().to_vec(),
    }
}

fn verse_report(verse: &Verse<'_>) -> VerseReport {
    let translations = verse
        .corpus()
        .translation_ids()
        .filter_map(|id| Some((id.to_string(), verse.translation(id)?.to_string())))
        .collect();
    VerseReport {
        address: verse.address(),
        text: verse.text().to_string(),
        words: verse.words().map(|w| word_report(&w)).collect(),
        translations,
    }
}

fn addresses(verses: &[Verse<'_>]) -> Vec<String> {
    verses.iter().map(Verse::address).collect()
}

/// Run `query` against `corpus` and render the result as JSON.
pub fn run(corpus: &Corpus, query: &Query) -> Result<Value, QueryError> {
    let selection = match query.within {
        Some(within) => Selection::new(corpus, within.scope, vec![within.number - 1]),
        None => Selection::book(corpus),
    };
    let verses = selection.verses();

    let value = match &query.command {
        Command::Stats => {
            let partitions = PartitionKind::ALL
                .into_iter()
                .map(|kind| (kind.name(), corpus.partition_count(kind)))
                .collect();
            serde_json::to_value(StatsReport {
                text_mode: corpus.text_mode().to_string(),
                chapters: corpus.chapter_count(),
                verses: corpus.verse_count(),
                words: corpus.word_count(),
                letters: corpus.letter_count(),
                unique_letters: corpus.unique_letters().len(),
                partitions,
                translations: corpus.translation_ids().map(str::to_string).collect(),
            })?
        }
        Command::Words {
            pattern,
            verse_location,
            word_location,
            wordness,
        } => serde_json::to_value(words_containing(
            &verses,
            pattern,
            *verse_location,
            *word_location,
            *wordness,
        ))?,
        Command::Current {
            pattern,
            word_location,
        } => serde_json::to_value(current_words(&verses, pattern, *word_location))?,
        Command::Next {
            pattern,
            word_location,
        } => serde_json::to_value(next_words(&verses, pattern, *word_location))?,
        Command::Find {
            pattern,
            word_location,
        } => serde_json::to_value(addresses(&verses_containing(
            &verses,
            pattern,
            *word_location,
        )))?,
        Command::Roots {
            pattern,
            word_location,
        } => serde_json::to_value(RootIndex::new(corpus).roots_matching(
            &verses,
            pattern,
            *word_location,
        ))?,
        Command::Root { text } => {
            json!({ "text": text, "root": RootIndex::new(corpus).best_root(text) })
        }
        Command::Related { text } => {
            let index = RootIndex::new(corpus);
            let root = index.best_root(text);
            let related = index.related_verses_for_text(text);
            let within: Vec<_> = related
                .into_iter()
                .filter(|v| verses.contains(v))
                .collect();
            json!({ "text": text, "root": root, "verses": addresses(&within) })
        }
        Command::Verse { address } => {
            let verse = parse_address(address)
                .and_then(|(c, v)| corpus.verse_at(c, v))
                .ok_or_else(|| QueryError::UnknownVerse(address.clone()))?;
            serde_json::to_value(verse_report(&verse))?
        }
        Command::Sentences => {
            let reports: Vec<_> = sentences(&verses)
                .iter()
                .map(|s| SentenceReport {
                    start: s.first_verse().address(),
                    end: s.last_verse().address(),
                    words: s.word_count(),
                    text: s.text(),
                })
                .collect();
            serde_json::to_value(reports)?
        }
    };
    Ok(value)
}

fn parse_address(raw: &str) -> Option<(usize, usize)> {
    let (chapter, verse) = raw.trim().split_once(':')?;
    Some((chapter.parse().ok()?, verse.parse().ok()?))
}
