//! Morphological-root retrieval over a [`Corpus`].
//!
//! [`RootIndex`] borrows a corpus whose words already carry roots (see
//! `quran_db::loader::attach_roots`) and builds, on first use, a sorted map
//! from each root to the words carrying it. A word with several roots
//! appears under each of them.
//!
//! # Resolving a surface form
//! [`RootIndex::best_root`] tries, in order:
//! 1. a word whose text is exactly the query;
//! 2. the same comparison after simplifying both sides at each level of
//!    [`SimplificationLevel::FOLDING_CHAIN`];
//! 3. a fixed list of irregular forms that belong to one root;
//! 4. roots within one letter of the query's length that have a word
//!    spelled like the query once markers and diacritics are dropped;
//! 5. the root with the highest Levenshtein similarity to the query.
//!
//! # Example
//! ```no_run
//! use quran_db::Corpus;
//! use quran_roots::RootIndex;
//!
//! # fn main() -> anyhow::Result<()> {
//! let corpus = Corpus::load("/path/to/quran-data")?;
//! let roots = RootIndex::new(&corpus);
//! if let Some(root) = roots.best_root("يكتبون") {
//!     println!("{root}: {} words", roots.words_for_root(&root).len());
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p quran-roots --example lookup -- <dir> <word>`.

use std::collections::{BTreeMap, HashMap};

use quran_db::{Corpus, Memo, Verse, Word};
use quran_types::{SimplificationLevel, TextLocationInWord, is_letter, located, simplify};
use tracing::info;

mod similarity;

use similarity::similarity;

/// Root shared by the irregular spellings of the divine name.
const DIVINE_NAME_ROOT: &str = "اله";
/// Surface forms (simplified, letters only) that resolve to [`DIVINE_NAME_ROOT`].
const DIVINE_NAME_FORMS: [&str; 9] = [
    "الله", "لله", "بالله", "تالله", "والله", "فالله", "اللهم", "ولله", "فلله",
];

/// Levels tried after an exact match fails, in the order they are tried.
const LOOKUP_LEVELS: [SimplificationLevel; 6] = [
    SimplificationLevel::Original,
    SimplificationLevel::FOLDING_CHAIN[0],
    SimplificationLevel::FOLDING_CHAIN[1],
    SimplificationLevel::FOLDING_CHAIN[2],
    SimplificationLevel::FOLDING_CHAIN[3],
    SimplificationLevel::FOLDING_CHAIN[4],
];

type Entries = BTreeMap<String, Vec<usize>>;

/// Lazily built root → words index over one corpus.
#[derive(Debug)]
pub struct RootIndex<'a> {
    corpus: &'a Corpus,
    entries: Memo<Entries>,
    /// Per entry of [`LOOKUP_LEVELS`]: simplified surface → first word with roots.
    surfaces: Memo<Vec<HashMap<String, usize>>>,
}

impl<'a> RootIndex<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self {
            corpus,
            entries: Memo::new(),
            surfaces: Memo::new(),
        }
    }

    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    fn entries(&self) -> &Entries {
        self.entries.get_or_compute(|| {
            let mut entries = Entries::new();
            for word in self.corpus.words() {
                for root in word.roots() {
                    let words = entries.entry(root.clone()).or_default();
                    if words.last() != Some(&word.index()) {
                        words.push(word.index());
                    }
                }
            }
            info!(
                "built root index: {} roots over {} words",
                entries.len(),
                self.corpus.word_count()
            );
            entries
        })
    }

    fn surfaces(&self) -> &[HashMap<String, usize>] {
        self.surfaces.get_or_compute(|| {
            LOOKUP_LEVELS
                .iter()
                .map(|&level| {
                    let mut map = HashMap::new();
                    for word in self.corpus.words().filter(|w| !w.roots().is_empty()) {
                        map.entry(surface_key(word.text(), level))
                            .or_insert(word.index());
                    }
                    map
                })
                .collect()
        })
    }

    /// Whether the root map has been built.
    pub fn is_built(&self) -> bool {
        self.entries.is_computed()
    }

    /// Times the root map was built; stays at 1 however often it is read.
    pub fn build_count(&self) -> usize {
        self.entries.computations()
    }

    pub fn root_count(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Every root, sorted.
    pub fn roots(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries().keys().map(String::as_str)
    }

    pub fn words_for_root(&self, root: &str) -> Vec<Word<'a>> {
        let corpus = self.corpus;
        self.entries()
            .get(root)
            .map(|indexes| indexes.iter().filter_map(|&i| corpus.word(i)).collect())
            .unwrap_or_default()
    }

    /// Roots placed as `location` requires relative to `pattern`, with the
    /// number of their words that fall inside `verses`. Roots with no word in
    /// `verses` are left out; an empty pattern matches every root.
    pub fn roots_matching(
        &self,
        verses: &[Verse<'_>],
        pattern: &str,
        location: TextLocationInWord,
    ) -> BTreeMap<String, usize> {
        let mode = self.corpus.text_mode();
        let pattern = simplify(pattern, mode).trim().to_string();
        let mut selected = vec![false; self.corpus.verse_count()];
        for verse in verses {
            if let Some(slot) = selected.get_mut(verse.index()) {
                *slot = true;
            }
        }

        let mut out = BTreeMap::new();
        for (root, words) in self.entries() {
            let matches = pattern.is_empty() || located(&simplify(root, mode), &pattern, location);
            if !matches {
                continue;
            }
            let count = words
                .iter()
                .filter_map(|&i| self.corpus.word(i))
                .filter(|w| selected[w.verse().index()])
                .count();
            if count > 0 {
                out.insert(root.clone(), count);
            }
        }
        out
    }

    /// Most likely root of a surface form; `None` when no word has roots or
    /// the query has no letters.
    pub fn best_root(&self, text: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let text = text.trim();

        for (level, surfaces) in LOOKUP_LEVELS.iter().zip(self.surfaces()) {
            if let Some(&index) = surfaces.get(&surface_key(text, *level))
                && let Some(word) = self.corpus.word(index)
            {
                return Some(word.best_root().to_string());
            }
        }

        let query = letters_only(text);
        if query.is_empty() {
            return None;
        }
        self.irregular_root(&query)
            .or_else(|| self.root_of_same_spelling(&query))
            .or_else(|| self.most_similar_root(&query))
    }

    fn irregular_root(&self, query: &str) -> Option<String> {
        (DIVINE_NAME_FORMS.contains(&query) && self.entries().contains_key(DIVINE_NAME_ROOT))
            .then(|| DIVINE_NAME_ROOT.to_string())
    }

    fn root_of_same_spelling(&self, query: &str) -> Option<String> {
        let length = query.chars().count();
        self.entries()
            .iter()
            .filter(|(root, _)| root.chars().count().abs_diff(length) <= 1)
            .find(|(_, words)| {
                words
                    .iter()
                    .filter_map(|&i| self.corpus.word(i))
                    .any(|w| letters_only(w.text()) == query)
            })
            .map(|(root, _)| root.clone())
    }

    fn most_similar_root(&self, query: &str) -> Option<String> {
        let mut best: Option<(&String, f64)> = None;
        for root in self.entries().keys() {
            let score = similarity(query, root);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((root, score));
            }
        }
        best.map(|(root, _)| root.clone())
    }

    /// Words sharing any root with `word`, in document order, `word` included.
    pub fn related_words(&self, word: &Word<'_>) -> Vec<Word<'a>> {
        let mut indexes: Vec<usize> = word
            .roots()
            .iter()
            .filter_map(|root| self.entries().get(root))
            .flatten()
            .copied()
            .collect();
        indexes.sort_unstable();
        indexes.dedup();
        indexes
            .into_iter()
            .filter_map(|i| self.corpus.word(i))
            .collect()
    }

    /// Words under the [`best_root`](Self::best_root) of `text`.
    pub fn related_words_for_text(&self, text: &str) -> Vec<Word<'a>> {
        self.best_root(text)
            .map(|root| self.words_for_root(&root))
            .unwrap_or_default()
    }

    pub fn related_verses(&self, word: &Word<'_>) -> Vec<Verse<'a>> {
        verses_of(self.related_words(word))
    }

    pub fn related_verses_for_text(&self, text: &str) -> Vec<Verse<'a>> {
        verses_of(self.related_words_for_text(text))
    }
}

fn surface_key(text: &str, level: SimplificationLevel) -> String {
    simplify(text.trim(), level).trim().to_string()
}

fn letters_only(text: &str) -> String {
    simplify(text, SimplificationLevel::Simplified28)
        .chars()
        .filter(|c| is_letter(*c))
        .collect()
}

/// Owning verses of words given in document order, deduplicated.
fn verses_of(words: Vec<Word<'_>>) -> Vec<Verse<'_>> {
    let mut verses: Vec<Verse<'_>> = Vec::new();
    for word in words {
        let verse = word.verse();
        if verses.last() != Some(&verse) {
            verses.push(verse);
        }
    }
    verses
}

#[cfg(test)]
mod tests {
    use super::*;
    use quran_db::{CorpusBuilder, Metadata, VerseRecord};

    fn corpus() -> Corpus {
        let mut corpus = CorpusBuilder::new(Metadata::from_verse_counts(&[2, 1]))
            .build(vec![
                VerseRecord::new(1, "كَتَبَ ٱلْكِتَٰبَ"),
                VerseRecord::new(2, "قَالَ ٱللَّهُ ۚ"),
                VerseRecord::new(3, "يَكْتُبُونَ مَكْتُوبٌ"),
            ])
            .unwrap();
        let roots = [
            vec!["كتب"],
            vec!["كتب"],
            vec!["قول", "قيل"],
            vec!["اله"],
            vec!["كتب"],
            vec!["كتب"],
        ];
        for (i, word_roots) in roots.into_iter().enumerate() {
            corpus.attach_word_roots(i, word_roots.into_iter().map(String::from).collect());
        }
        corpus
    }

    #[test]
    fn index_is_built_once() {
        let corpus = corpus();
        let index = RootIndex::new(&corpus);
        assert!(!index.is_built());
        assert_eq!(index.root_count(), 4);
        let first: Vec<_> = index.roots().map(str::to_string).collect();
        let second: Vec<_> = index.roots().map(str::to_string).collect();
        assert_eq!(first, second);
        assert_eq!(index.build_count(), 1);
    }

    #[test]
    fn homographs_appear_under_every_root() {
        let corpus = corpus();
        let index = RootIndex::new(&corpus);
        assert_eq!(index.words_for_root("قول").len(), 1);
        assert_eq!(index.words_for_root("قيل"), index.words_for_root("قول"));
        assert!(index.words_for_root("missing").is_empty());
    }

    #[test]
    fn related_words_are_symmetric() {
        let corpus = corpus();
        let index = RootIndex::new(&corpus);
        for a in corpus.words() {
            for b in index.related_words(&a) {
                assert!(index.related_words(&b).contains(&a), "{a:?} / {b:?}");
            }
        }
        let writes = corpus.word(0).unwrap();
        let verses: Vec<_> = index
            .related_verses(&writes)
            .iter()
            .map(|v| v.number())
            .collect();
        assert_eq!(verses, vec![1, 3]);
    }

    #[test]
    fn roots_matching_counts_within_subset() {
        let corpus = corpus();
        let index = RootIndex::new(&corpus);
        let all: Vec<_> = corpus.verses().collect();
        let found = index.roots_matching(&all, "ك", TextLocationInWord::AtStart);
        assert_eq!(found.get("كتب"), Some(&4));
        assert_eq!(found.len(), 1);

        let last = [corpus.verse(2).unwrap()];
        let found = index.roots_matching(&last, "ت", TextLocationInWord::AtMiddle);
        assert_eq!(found.get("كتب"), Some(&2));

        let found = index.roots_matching(&all, "", TextLocationInWord::Any);
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn best_root_walks_the_lookup_chain() {
        let corpus = corpus();
        let index = RootIndex::new(&corpus);
        assert_eq!(index.best_root("كَتَبَ").as_deref(), Some("كتب"));
        assert_eq!(index.best_root("قال").as_deref(), Some("قول"));
        assert_eq!(index.best_root("الكتاب").as_deref(), Some("كتب"));
        assert_eq!(index.best_root("بالله").as_deref(), Some("اله"));
        assert_eq!(index.best_root("قالۚ").as_deref(), Some("قول"));
        assert_eq!(index.best_root("كتبوا").as_deref(), Some("كتب"));
        assert_eq!(index.best_root("ۚ"), None);
    }

    #[test]
    fn empty_index_resolves_nothing() {
        let corpus = CorpusBuilder::new(Metadata::from_verse_counts(&[1]))
            .build(vec![VerseRecord::new(1, "كتب")])
            .unwrap();
        let index = RootIndex::new(&corpus);
        assert!(index.is_empty());
        assert_eq!(index.best_root("كتب"), None);
        assert!(index.related_words_for_text("كتب").is_empty());
    }
}
