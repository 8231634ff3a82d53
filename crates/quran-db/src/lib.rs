//! In-memory structural model of the Quran corpus.
//!
//! A [`Corpus`] holds chapters, seven parallel partition schemes (stations,
//! parts, groups, halves, quarters, bowings, pages), and flat arenas of
//! verses, words and letters. Every entity knows its global number and its
//! number inside each enclosing unit, and carries occurrence/frequency
//! [`Tally`] values for the scopes that contain it.
//!
//! Entities are reached through borrowed handles ([`Chapter`], [`Verse`],
//! [`Word`], [`Letter`], [`Partition`]) that pair a `&Corpus` with an arena
//! index. The corpus is immutable once built except for translations and
//! roots, which need `&mut Corpus`.
//!
//! # Features
//! - Construction from plain records via [`CorpusBuilder`], with typed
//!   [`BuildError`]s for inconsistent metadata.
//! - Disk loading of a data directory with mmap or owned buffers
//!   ([`loader::LoadMode`]).
//! - Lazy, memoised unique-letter sets and [`selection::Selection`] views.
//! - Wraparound ordinal lookups (`verse_by_number`, `word_by_number`,
//!   `letter_by_number`).
//!
//! # Example
//! ```no_run
//! use quran_db::Corpus;
//! use quran_types::Scope;
//!
//! # fn main() -> anyhow::Result<()> {
//! let corpus = Corpus::load("/path/to/quran-data")?;
//! let verse = corpus.verse_at(2, 255).expect("2:255 exists");
//! for word in verse.words() {
//!     println!("{} x{}", word.text(), word.tally(Scope::Book).frequency);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p quran-db --example stats -- <dir>`.

mod address;
mod builder;
mod corpus;
mod entities;
pub mod loader;
pub mod memo;
pub mod metadata;
pub mod order;
mod records;
pub mod selection;
pub mod sentence;
mod statistics;

pub use builder::{BuildError, CorpusBuilder};
pub use corpus::Corpus;
pub use entities::{Chapter, Letter, Partition, Tally, Verse, Word};
pub use loader::{LoadMode, LoadOptions};
pub use memo::Memo;
pub use records::{
    ChapterRecord, InitializationRecord, Metadata, PartitionRecord, ProstrationRecord,
    VerseRecord,
};
