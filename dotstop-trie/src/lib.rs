//! Compact serialized tries over 16-bit code units
//!
//! This crate maps symbol sequences (UTF-16 strings or raw units) to `i32`
//! values in a single read-only array of units. Identical sub-tries can be
//! shared, values and jumps use the shortest encoding that fits, and the
//! builder fills its buffer backward so children always precede parents in
//! write order.
//!
//! # Components
//!
//! - [`TrieBuilder`]: collects unique entries and serializes them
//! - [`UnitTrie`]: the immutable serialized form
//! - [`TrieCursor`]: incremental matcher reporting a [`MatchResult`] per unit
//! - [`Entries`]: enumerates what a trie stores
//!
//! # Example
//!
//! ```rust
//! use dotstop_trie::{BuildMode, MatchResult, TrieBuilder};
//!
//! let mut builder = TrieBuilder::new();
//! builder.add(".rM", 2)?.add(".D.", 1)?;
//! let reverse = builder.build(BuildMode::Small)?;
//!
//! let mut cursor = reverse.cursor();
//! for ch in "Mr.".chars().rev() {
//!     if !cursor.next_for_code_point(ch).has_next() {
//!         break;
//!     }
//! }
//! assert_eq!(cursor.current(), MatchResult::FinalValue);
//! assert_eq!(cursor.value(), Some(2));
//! # Ok::<(), dotstop_trie::TrieError>(())
//! ```
//!
//! # Features
//!
//! - `std` (default): implements `std::error::Error` for [`TrieError`]
//! - `alloc`: required; the crate works on `no_std` targets with an allocator
//! - `serde`: (de)serializes [`UnitTrie`] as its unit array

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod buffer;
mod builder;
mod cursor;
mod encoding;
mod entries;
mod error;
mod node;
mod trie;

pub use builder::{BuildMode, TrieBuilder, MAX_SEQUENCE_LENGTH};
pub use cursor::{MatchResult, TrieCursor, TrieState};
pub use entries::Entries;
pub use error::{Result, TrieError};
pub use trie::UnitTrie;
