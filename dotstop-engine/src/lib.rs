//! Abbreviation-aware sentence break filtering
//!
//! This crate wraps any sentence boundary detector implementing
//! [`BreakIterator`] and suppresses the breaks it proposes right after known
//! abbreviations such as "Mr." or "Ph.D.". Exceptions are compiled into a
//! pair of compact tries from `dotstop-trie`.
//!
//! # Example
//!
//! ```rust
//! use dotstop_engine::{BreakIterator, FilterBuilder, TerminatorBreakIterator};
//!
//! let builder = FilterBuilder::for_language("en")?;
//! let detector = Box::new(TerminatorBreakIterator::new("Dr. Smith arrived. He sat."));
//! let mut filter = builder.wrap_iterator_with_filter(detector)?;
//!
//! let mut boundaries = vec![filter.first()];
//! while let Some(offset) = filter.next() {
//!     boundaries.push(offset);
//! }
//! assert_eq!(boundaries, vec![0, 19, 26]);
//! # Ok::<(), dotstop_engine::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod detector;
pub mod error;
pub mod filter;
mod text_cursor;

// Re-export key types
pub use builder::FilterBuilder;
pub use config::{get_exception_config, list_available_languages, ExceptionConfig};
pub use detector::{BoundaryList, BreakIterator, TerminatorBreakIterator};
pub use error::{EngineError, Result};
pub use filter::{ExceptionFilter, ExceptionTries, MATCH, PARTIAL};

// Re-export the trie types that appear in this crate's API
pub use dotstop_trie::{BuildMode, TrieError, UnitTrie};
