//! Trie error types (deterministic only)

use core::fmt;

/// Builder and decoding errors (no I/O, no external failures)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// The sequence was already added to the builder
    DuplicateSequence,
    /// The sequence exceeds the 0xffff unit limit
    SequenceTooLong {
        /// Length of the rejected sequence in units
        len: usize,
    },
    /// `add` after `build` without an intervening `clear`
    AlreadyBuilt,
    /// `build` with no sequences added
    Empty,
    /// Raw units that cannot be a serialized trie
    InvalidUnits,
}

impl fmt::Display for TrieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrieError::DuplicateSequence => write!(f, "duplicate sequence"),
            TrieError::SequenceTooLong { len } => {
                write!(f, "sequence of {len} units exceeds the maximum of 65535")
            }
            TrieError::AlreadyBuilt => write!(f, "cannot add sequences after build()"),
            TrieError::Empty => write!(f, "no sequences were added"),
            TrieError::InvalidUnits => write!(f, "serialized trie must not be empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TrieError {}

/// Result type for trie operations
pub type Result<T> = core::result::Result<T, TrieError>;
