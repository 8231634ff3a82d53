//! Search and completeness queries over a [`quran_db::Corpus`].
//!
//! The search functions take any slice of verses, usually a
//! [`quran_db::selection::Selection`], and work on verse text simplified at
//! the corpus text mode. Results are ordered maps from surface form to count.
//!
//! ```no_run
//! use quran_db::Corpus;
//! use quran_search::next_words;
//! use quran_types::TextLocationInWord;
//!
//! # fn main() -> anyhow::Result<()> {
//! let corpus = Corpus::load("/path/to/quran-data")?;
//! let verses: Vec<_> = corpus.verses().collect();
//! for (word, count) in next_words(&verses, "بسم الله", TextLocationInWord::Any) {
//!     println!("{word} x{count}");
//! }
//! # Ok(()) }
//! ```

pub mod command;
pub mod completeness;
pub mod search;

pub use command::{Command, Query, QueryError, run};
pub use completeness::{complete_chapters, complete_verses, complete_words};
pub use search::{WordCounts, current_words, next_words, verses_containing, words_containing};
