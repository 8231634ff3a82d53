//! Shared types for the Quran corpus model.
//!
//! Every enum here mirrors a literal found in the corpus source files
//! (metadata sections, verse end marks) or a search/statistics option that
//! several crates need to agree on. Parsing from text goes through
//! [`std::str::FromStr`] and reports a [`ParseEnumError`] naming the offending
//! literal, so loaders can surface it as a fatal construction error.
//!
//! The [`text`] module holds the normaliser used for comparison-insensitive
//! matching ([`simplify`]) and the character classes that tell letters,
//! diacritics and corpus markers apart.
//!
//! ```rust
//! use quran_types::{PartitionKind, SimplificationLevel, Stopmark, simplify};
//!
//! assert_eq!(Stopmark::from_char('ۚ'), Some(Stopmark::CanStop));
//! assert_eq!("Page".parse::<PartitionKind>().unwrap(), PartitionKind::Page);
//! assert_eq!(simplify("ٱلْحَمْدُ", SimplificationLevel::Simplified31), "الحمد");
//! ```

use std::fmt;
use std::str::FromStr;

pub mod text;

pub use text::{
    SimplificationLevel, is_diacritic, is_letter, is_marker_char,
    is_marker_token, is_quranmark_char, is_stopmark_char, located, normalize_diacritics,
    simplify,
};

/// Error returned when a textual literal does not name a known variant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} literal `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// How strongly recitation must pause after a word or at the end of a verse.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Stopmark {
    #[default]
    None,
    MustContinue,
    ShouldContinue,
    CanStop,
    CanStopAtEither,
    ShouldStop,
    MustPause,
    MustStop,
}

impl Stopmark {
    pub const ALL: [Stopmark; 8] = [
        Stopmark::None,
        Stopmark::MustContinue,
        Stopmark::ShouldContinue,
        Stopmark::CanStop,
        Stopmark::CanStopAtEither,
        Stopmark::ShouldStop,
        Stopmark::MustPause,
        Stopmark::MustStop,
    ];

    /// Map an annotation character found in the verse text to its stopmark.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\u{06D9}' => Some(Stopmark::MustContinue),
            '\u{06D6}' => Some(Stopmark::ShouldContinue),
            '\u{06DA}' => Some(Stopmark::CanStop),
            '\u{06DB}' => Some(Stopmark::CanStopAtEither),
            '\u{06D7}' => Some(Stopmark::ShouldStop),
            '\u{06DC}' => Some(Stopmark::MustPause),
            '\u{06D8}' => Some(Stopmark::MustStop),
            _ => None,
        }
    }

    /// Parse a whole token consisting of exactly one stopmark character.
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let first = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(first)
    }

    /// Whether a reader may end a sentence at this mark.
    pub fn is_stop(self) -> bool {
        matches!(
            self,
            Stopmark::CanStop | Stopmark::ShouldStop | Stopmark::MustStop
        )
    }

    fn name(self) -> &'static str {
        match self {
            Stopmark::None => "None",
            Stopmark::MustContinue => "MustContinue",
            Stopmark::ShouldContinue => "ShouldContinue",
            Stopmark::CanStop => "CanStop",
            Stopmark::CanStopAtEither => "CanStopAtEither",
            Stopmark::ShouldStop => "ShouldStop",
            Stopmark::MustPause => "MustPause",
            Stopmark::MustStop => "MustStop",
        }
    }
}

impl fmt::Display for Stopmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stopmark {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Stopmark::ALL
            .into_iter()
            .find(|mark| mark.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| Stopmark::from_token(trimmed))
            .ok_or_else(|| ParseEnumError::new("stopmark", s))
    }
}

/// The seven verse-range partition schemes that run in parallel to chapters.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum PartitionKind {
    Station,
    Part,
    Group,
    Half,
    Quarter,
    Bowing,
    Page,
}

impl PartitionKind {
    pub const COUNT: usize = 7;

    pub const ALL: [PartitionKind; PartitionKind::COUNT] = [
        PartitionKind::Station,
        PartitionKind::Part,
        PartitionKind::Group,
        PartitionKind::Half,
        PartitionKind::Quarter,
        PartitionKind::Bowing,
        PartitionKind::Page,
    ];

    /// Position of this scheme in per-scheme arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name used as the section tag in the metadata file.
    pub fn name(self) -> &'static str {
        match self {
            PartitionKind::Station => "Station",
            PartitionKind::Part => "Part",
            PartitionKind::Group => "Group",
            PartitionKind::Half => "Half",
            PartitionKind::Quarter => "Quarter",
            PartitionKind::Bowing => "Bowing",
            PartitionKind::Page => "Page",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PartitionKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartitionKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("partition kind", s))
    }
}

/// Where a chapter was revealed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RevelationPlace {
    Makkah,
    Medina,
}

impl fmt::Display for RevelationPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RevelationPlace::Makkah => "Makkah",
            RevelationPlace::Medina => "Medina",
        })
    }
}

impl FromStr for RevelationPlace {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "makkah" | "mecca" | "makki" => Ok(RevelationPlace::Makkah),
            "medina" | "madinah" | "madani" => Ok(RevelationPlace::Medina),
            _ => Err(ParseEnumError::new("revelation place", s)),
        }
    }
}

/// Prostration cue attached to a verse.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProstrationType {
    Obligatory,
    Recommended,
}

impl fmt::Display for ProstrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProstrationType::Obligatory => "Obligatory",
            ProstrationType::Recommended => "Recommended",
        })
    }
}

impl FromStr for ProstrationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "obligatory" => Ok(ProstrationType::Obligatory),
            "recommended" => Ok(ProstrationType::Recommended),
            _ => Err(ParseEnumError::new("prostration type", s)),
        }
    }
}

/// Classification of a chapter by its opening initial letters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum InitializationType {
    Key,
    PartialKey,
    FullyInitialized,
    PartiallyInitialized,
    #[default]
    NonInitialized,
}

impl fmt::Display for InitializationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InitializationType::Key => "Key",
            InitializationType::PartialKey => "PartialKey",
            InitializationType::FullyInitialized => "FullyInitialized",
            InitializationType::PartiallyInitialized => "PartiallyInitialized",
            InitializationType::NonInitialized => "NonInitialized",
        })
    }
}

impl FromStr for InitializationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "key" => Ok(InitializationType::Key),
            "partialkey" => Ok(InitializationType::PartialKey),
            "fullyinitialized" => Ok(InitializationType::FullyInitialized),
            "partiallyinitialized" => Ok(InitializationType::PartiallyInitialized),
            "noninitialized" => Ok(InitializationType::NonInitialized),
            _ => Err(ParseEnumError::new("initialization type", s)),
        }
    }
}

/// Nested scope in which occurrences and frequencies are counted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Word,
    Verse,
    Chapter,
    Book,
}

impl Scope {
    pub const COUNT: usize = 4;

    pub const ALL: [Scope; Scope::COUNT] = [Scope::Word, Scope::Verse, Scope::Chapter, Scope::Book];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which token positions of a verse a search may match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TextLocationInVerse {
    #[default]
    Any,
    AtStart,
    AtMiddle,
    AtEnd,
}

impl TextLocationInVerse {
    /// Whether token `index` of a verse with `len` tokens is admitted.
    pub fn admits(self, index: usize, len: usize) -> bool {
        match self {
            TextLocationInVerse::Any => index < len,
            TextLocationInVerse::AtStart => index == 0 && len > 0,
            TextLocationInVerse::AtMiddle => index > 0 && index + 1 < len,
            TextLocationInVerse::AtEnd => len > 0 && index + 1 == len,
        }
    }
}

/// Where a pattern must sit inside a word (or root) string.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TextLocationInWord {
    #[default]
    Any,
    AtStart,
    AtMiddle,
    AtEnd,
}

/// Whether a match must cover the whole word, only part of it, or either.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TextWordness {
    WholeWord,
    PartOfWord,
    #[default]
    Any,
}

macro_rules! location_from_str {
    ($ty:ident, $kind:literal) => {
        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    "any" | "anywhere" => Ok($ty::Any),
                    "start" | "atstart" => Ok($ty::AtStart),
                    "middle" | "atmiddle" => Ok($ty::AtMiddle),
                    "end" | "atend" => Ok($ty::AtEnd),
                    _ => Err(ParseEnumError::new($kind, s)),
                }
            }
        }
    };
}

location_from_str!(TextLocationInVerse, "verse location");
location_from_str!(TextLocationInWord, "word location");

impl FromStr for TextWordness {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" | "wholeword" => Ok(TextWordness::WholeWord),
            "part" | "partofword" => Ok(TextWordness::PartOfWord),
            "any" => Ok(TextWordness::Any),
            _ => Err(ParseEnumError::new("wordness", s)),
        }
    }
}
