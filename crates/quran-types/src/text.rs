//! Text simplification and character classes.
//!
//! Verse text carries diacritics, variant letterforms and two families of
//! non-linguistic markers: stopmarks (recitation pauses) and quranmarks
//! (section and prostration cues). Comparison across the corpus happens on a
//! [`simplify`]-ed form whose strictness is chosen by [`SimplificationLevel`].

use std::fmt;
use std::str::FromStr;

use crate::{ParseEnumError, Stopmark};

/// Strictness of [`simplify`]. Levels are ordered: each one strips everything
/// the previous level strips and folds more letter variants together.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum SimplificationLevel {
    /// Text as written.
    Original,
    /// Diacritics and tatweel removed; every letterform kept.
    Simplified36,
    /// Alef wasla folded into bare alef.
    Simplified31,
    /// Hamza-carrying alefs folded into bare alef.
    Simplified30,
    /// Hamza on waw/yeh and alef maksura folded into their base letters.
    #[default]
    Simplified29,
    /// Ta marbuta folded into heh and standalone hamza into alef.
    Simplified28,
}

impl SimplificationLevel {
    pub const ALL: [SimplificationLevel; 6] = [
        SimplificationLevel::Original,
        SimplificationLevel::Simplified36,
        SimplificationLevel::Simplified31,
        SimplificationLevel::Simplified30,
        SimplificationLevel::Simplified29,
        SimplificationLevel::Simplified28,
    ];

    /// Every level stricter than `Original`, least strict first.
    pub const FOLDING_CHAIN: [SimplificationLevel; 5] = [
        SimplificationLevel::Simplified36,
        SimplificationLevel::Simplified31,
        SimplificationLevel::Simplified30,
        SimplificationLevel::Simplified29,
        SimplificationLevel::Simplified28,
    ];

    fn name(self) -> &'static str {
        match self {
            SimplificationLevel::Original => "Original",
            SimplificationLevel::Simplified36 => "Simplified36",
            SimplificationLevel::Simplified31 => "Simplified31",
            SimplificationLevel::Simplified30 => "Simplified30",
            SimplificationLevel::Simplified29 => "Simplified29",
            SimplificationLevel::Simplified28 => "Simplified28",
        }
    }
}

impl fmt::Display for SimplificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimplificationLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimplificationLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("simplification level", s))
    }
}

/// Harakat, tanween, shadda, sukun, superscript alef, Quranic small letters
/// and tatweel.
pub fn is_diacritic(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}'
            | '\u{0640}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0670}'
            | '\u{06DF}'..='\u{06E8}'
            | '\u{06EA}'..='\u{06ED}'
    )
}

pub fn is_stopmark_char(c: char) -> bool {
    Stopmark::from_char(c).is_some()
}

/// End-of-verse, section (rub el hizb) and prostration signs.
pub fn is_quranmark_char(c: char) -> bool {
    matches!(c, '\u{06DD}' | '\u{06DE}' | '\u{06E9}')
}

pub fn is_marker_char(c: char) -> bool {
    is_stopmark_char(c) || is_quranmark_char(c)
}

/// A non-empty token made only of stopmark/quranmark characters.
pub fn is_marker_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_marker_char)
}

/// Characters that become letters of a word.
pub fn is_letter(c: char) -> bool {
    !c.is_whitespace() && !is_diacritic(c) && !is_marker_char(c)
}

/// Replace variant diacritic codepoints with their canonical equivalents.
pub fn normalize_diacritics(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            // small high dotless head of khah is written for sukun
            '\u{06E1}' => '\u{0652}',
            '\u{0672}' => '\u{0623}',
            other => other,
        })
        .collect()
}

/// Normalise `text` to the given strictness. Markers and whitespace survive
/// every level so callers can still tokenize and strip them.
pub fn simplify(text: &str, level: SimplificationLevel) -> String {
    if level == SimplificationLevel::Original {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_diacritic(c) {
            continue;
        }
        out.push(fold_letter(c, level));
    }
    out
}

fn fold_letter(c: char, level: SimplificationLevel) -> char {
    use SimplificationLevel::*;
    match c {
        '\u{0671}' if level >= Simplified31 => '\u{0627}',
        '\u{0622}' | '\u{0623}' | '\u{0625}' if level >= Simplified30 => '\u{0627}',
        '\u{0624}' if level >= Simplified29 => '\u{0648}',
        '\u{0626}' | '\u{0649}' if level >= Simplified29 => '\u{064A}',
        '\u{0629}' if level >= Simplified28 => '\u{0647}',
        '\u{0621}' if level >= Simplified28 => '\u{0627}',
        other => other,
    }
}

/// Whether `pattern` sits at `location` inside `text`.
///
/// `AtMiddle` requires an occurrence that neither starts nor ends `text`.
pub fn located(text: &str, pattern: &str, location: crate::TextLocationInWord) -> bool {
    use crate::TextLocationInWord::*;
    match location {
        Any => text.contains(pattern),
        AtStart => text.starts_with(pattern),
        AtEnd => text.ends_with(pattern),
        AtMiddle => {
            if pattern.is_empty() {
                return text.chars().count() > 1;
            }
            text.char_indices().any(|(i, _)| {
                i > 0 && text[i..].starts_with(pattern) && i + pattern.len() < text.len()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextLocationInWord;

    #[test]
    fn strips_diacritics_but_keeps_markers() {
        let raw = "بِسْمِ ٱللَّهِ ۚ";
        assert_eq!(simplify(raw, SimplificationLevel::Simplified36), "بسم ٱلله ۚ");
        assert_eq!(simplify(raw, SimplificationLevel::Original), raw);
    }

    #[test]
    fn levels_fold_progressively() {
        let raw = "ٱ أ ؤ ة";
        assert_eq!(simplify(raw, SimplificationLevel::Simplified36), "ٱ أ ؤ ة");
        assert_eq!(simplify(raw, SimplificationLevel::Simplified31), "ا أ ؤ ة");
        assert_eq!(simplify(raw, SimplificationLevel::Simplified30), "ا ا ؤ ة");
        assert_eq!(simplify(raw, SimplificationLevel::Simplified29), "ا ا و ة");
        assert_eq!(simplify(raw, SimplificationLevel::Simplified28), "ا ا و ه");
    }

    #[test]
    fn classifies_marker_tokens() {
        assert!(is_marker_token("ۚ"));
        assert!(is_marker_token("۞"));
        assert!(!is_marker_token("بۚ"));
        assert!(!is_marker_token(""));
        assert!(!is_letter('\u{064E}'));
        assert!(is_letter('ب'));
    }

    #[test]
    fn locates_patterns_inside_words() {
        assert!(located("abcab", "ab", TextLocationInWord::AtStart));
        assert!(located("abcab", "ab", TextLocationInWord::AtEnd));
        assert!(!located("abcab", "ab", TextLocationInWord::AtMiddle));
        assert!(located("abcabx", "ab", TextLocationInWord::AtMiddle));
        assert!(located("abcab", "c", TextLocationInWord::Any));
    }

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(
            "simplified29".parse::<SimplificationLevel>(),
            Ok(SimplificationLevel::Simplified29)
        );
        assert!("Simplified99".parse::<SimplificationLevel>().is_err());
    }
}
