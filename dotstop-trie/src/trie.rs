//! Serialized trie

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::cursor::{MatchResult, TrieCursor};
use crate::entries::Entries;
use crate::error::{Result, TrieError};

/// Immutable serialized trie
///
/// Owns its units behind an [`Arc`], so clones and cursors are cheap and the
/// trie can be shared read-only across threads. The root node is the first
/// unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitTrie {
    units: Arc<[u16]>,
}

impl UnitTrie {
    pub(crate) fn from_built(units: &[u16]) -> Self {
        Self {
            units: Arc::from(units),
        }
    }

    /// Wrap units previously produced by [`TrieBuilder`](crate::TrieBuilder).
    ///
    /// Only emptiness is checked; units that were not produced by a builder
    /// make lookups panic or return arbitrary results.
    pub fn from_units(units: impl Into<Arc<[u16]>>) -> Result<Self> {
        let units = units.into();
        if units.is_empty() {
            return Err(TrieError::InvalidUnits);
        }
        Ok(Self { units })
    }

    /// Serialized units, root first
    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Serialized size in units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false for a built trie
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// New cursor at the root
    pub fn cursor(&self) -> TrieCursor {
        TrieCursor::with_root(Arc::clone(&self.units), 0)
    }

    /// Value stored for exactly `key`, if any
    pub fn get(&self, key: &str) -> Option<i32> {
        let units: Vec<u16> = key.encode_utf16().collect();
        self.get_units(&units)
    }

    /// Value stored for exactly `key`, if any
    pub fn get_units(&self, key: &[u16]) -> Option<i32> {
        let mut cursor = self.cursor();
        let result = cursor.next_units(key);
        if result.has_value() {
            cursor.value()
        } else {
            None
        }
    }

    /// All stored (sequence, value) pairs in ascending unit order
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(&self.units)
    }

    /// Result for the empty sequence, i.e. what the root node holds
    pub fn root_result(&self) -> MatchResult {
        self.cursor().current()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UnitTrie {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.units.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UnitTrie {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let units = Vec::<u16>::deserialize(deserializer)?;
        UnitTrie::from_units(units).map_err(serde::de::Error::custom)
    }
}
