//! Trie builder
//!
//! Collects unique (sequence, value) pairs and serializes them into a
//! [`UnitTrie`]. Sequences are kept sorted, so insertion order never changes
//! the output.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::buffer::BackwardBuffer;
use crate::error::{Result, TrieError};
use crate::node::NodeGraph;
use crate::trie::UnitTrie;

/// Longest sequence the builder accepts, in units.
pub const MAX_SEQUENCE_LENGTH: usize = 0xffff;

const MIN_BUFFER_CAPACITY: usize = 1024;

/// Serialization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    /// Build quickly; only identical final values are shared
    #[default]
    Fast,
    /// Share every identical sub-trie for the smallest output
    Small,
}

/// Builder for [`UnitTrie`]
///
/// ```
/// use dotstop_trie::{BuildMode, MatchResult, TrieBuilder};
///
/// let mut builder = TrieBuilder::new();
/// builder.add("Mr.", 2)?.add("Mrs.", 2)?;
/// let trie = builder.build(BuildMode::Fast)?;
///
/// let mut cursor = trie.cursor();
/// assert_eq!(cursor.next_str("Mr."), MatchResult::FinalValue);
/// assert_eq!(cursor.value(), Some(2));
/// # Ok::<(), dotstop_trie::TrieError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrieBuilder {
    entries: BTreeMap<Vec<u16>, i32>,
    built: Option<UnitTrie>,
}

impl TrieBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string, stored as its UTF-16 units
    pub fn add(&mut self, sequence: &str, value: i32) -> Result<&mut Self> {
        let units: Vec<u16> = sequence.encode_utf16().collect();
        self.insert(units, value)
    }

    /// Add a raw unit sequence
    pub fn add_units(&mut self, sequence: &[u16], value: i32) -> Result<&mut Self> {
        self.insert(sequence.to_vec(), value)
    }

    fn insert(&mut self, units: Vec<u16>, value: i32) -> Result<&mut Self> {
        if self.built.is_some() {
            return Err(TrieError::AlreadyBuilt);
        }
        if units.len() > MAX_SEQUENCE_LENGTH {
            return Err(TrieError::SequenceTooLong { len: units.len() });
        }
        if self.entries.contains_key(&units) {
            return Err(TrieError::DuplicateSequence);
        }
        self.entries.insert(units, value);
        Ok(self)
    }

    /// Number of sequences added since the last `clear`
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was added since the last `clear`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize everything added so far.
    ///
    /// After the first successful call the builder is frozen: further calls
    /// return the same trie regardless of `mode`, and `add` fails until
    /// [`clear`](Self::clear).
    pub fn build(&mut self, mode: BuildMode) -> Result<UnitTrie> {
        if let Some(trie) = &self.built {
            return Ok(trie.clone());
        }
        if self.entries.is_empty() {
            return Err(TrieError::Empty);
        }
        let entries: Vec<(&[u16], i32)> = self
            .entries
            .iter()
            .map(|(units, value)| (units.as_slice(), *value))
            .collect();
        let total_units: usize = entries.iter().map(|(units, _)| units.len()).sum();

        let mut graph = NodeGraph::new(&entries, mode);
        let root = graph.build();
        let mut buffer = BackwardBuffer::with_capacity(total_units.max(MIN_BUFFER_CAPACITY));
        graph.write(root, &mut buffer);

        let trie = UnitTrie::from_built(buffer.occupied());
        self.built = Some(trie.clone());
        Ok(trie)
    }

    /// Build and return a copy of the serialized units.
    pub fn build_units(&mut self, mode: BuildMode) -> Result<Vec<u16>> {
        Ok(self.build(mode)?.units().to_vec())
    }

    /// Remove all sequences so the builder can be reused.
    ///
    /// Tries returned earlier stay valid; they own their units.
    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self.built = None;
        self
    }
}
