//! Incremental matching over a serialized trie

use alloc::sync::Arc;

use crate::encoding::{
    jump_by_delta, read_node_value, read_value, skip_delta, skip_node_value, skip_value,
    skip_value_at, MAX_BRANCH_LINEAR_SUB_NODE_LENGTH, MIN_LINEAR_MATCH, MIN_VALUE_LEAD,
    NODE_TYPE_MASK, VALUE_IS_FINAL,
};

/// Outcome of feeding one unit to a [`TrieCursor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    /// The input so far is not a prefix of any stored sequence
    NoMatch,
    /// The input is a proper prefix of a stored sequence, no value here
    NoValue,
    /// The input is a stored sequence and nothing longer continues it
    FinalValue,
    /// The input is a stored sequence and a longer one continues it
    HasValue,
}

impl MatchResult {
    /// Anything but `NoMatch`
    #[inline]
    pub fn matches(self) -> bool {
        self != MatchResult::NoMatch
    }

    /// `FinalValue` or `HasValue`
    #[inline]
    pub fn has_value(self) -> bool {
        matches!(self, MatchResult::FinalValue | MatchResult::HasValue)
    }

    /// `NoValue` or `HasValue`: feeding more input can still match
    #[inline]
    pub fn has_next(self) -> bool {
        matches!(self, MatchResult::NoValue | MatchResult::HasValue)
    }

    #[inline]
    fn for_value_lead(lead: u16) -> Self {
        if lead & VALUE_IS_FINAL != 0 {
            MatchResult::FinalValue
        } else {
            MatchResult::HasValue
        }
    }

    #[inline]
    fn at_node(lead: u16) -> Self {
        if lead >= MIN_VALUE_LEAD {
            Self::for_value_lead(lead)
        } else {
            MatchResult::NoValue
        }
    }
}

/// Saved cursor position, see [`TrieCursor::save_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieState {
    root: usize,
    pos: Option<usize>,
    remaining_match_length: i32,
}

/// Stateful matcher over a serialized trie
///
/// Holds a shared handle to the units plus a position; independent cursors
/// over the same trie need no coordination.
#[derive(Debug, Clone)]
pub struct TrieCursor {
    units: Arc<[u16]>,
    root: usize,
    /// `None` once the input stopped matching
    pos: Option<usize>,
    /// Remaining length of the current linear match minus one, -1 outside one
    remaining_match_length: i32,
}

impl TrieCursor {
    /// Cursor over `units` whose root node starts at `root`
    pub fn with_root(units: Arc<[u16]>, root: usize) -> Self {
        Self {
            units,
            root,
            pos: Some(root),
            remaining_match_length: -1,
        }
    }

    /// Go back to the root
    pub fn reset(&mut self) -> &mut Self {
        self.pos = Some(self.root);
        self.remaining_match_length = -1;
        self
    }

    /// Snapshot of the current position
    pub fn save_state(&self) -> TrieState {
        TrieState {
            root: self.root,
            pos: self.pos,
            remaining_match_length: self.remaining_match_length,
        }
    }

    /// Restore a snapshot taken from a cursor over the same trie
    pub fn reset_to_state(&mut self, state: TrieState) -> &mut Self {
        debug_assert_eq!(state.root, self.root, "state from a different trie");
        self.pos = state.pos;
        self.remaining_match_length = state.remaining_match_length;
        self
    }

    /// Result for the input consumed so far, without consuming anything
    pub fn current(&self) -> MatchResult {
        match self.pos {
            None => MatchResult::NoMatch,
            Some(_) if self.remaining_match_length >= 0 => MatchResult::NoValue,
            Some(pos) => MatchResult::at_node(self.units[pos]),
        }
    }

    /// `reset` then `next`
    pub fn first(&mut self, unit: u16) -> MatchResult {
        self.reset();
        self.next(unit)
    }

    /// `reset` then `next_for_code_point`
    pub fn first_for_code_point(&mut self, ch: char) -> MatchResult {
        self.reset();
        self.next_for_code_point(ch)
    }

    /// Feed a code point; supplementary code points go in as a surrogate pair.
    pub fn next_for_code_point(&mut self, ch: char) -> MatchResult {
        if let Ok(unit) = u16::try_from(u32::from(ch)) {
            return self.next(unit);
        }
        let mut pair = [0u16; 2];
        ch.encode_utf16(&mut pair);
        if self.next(pair[0]).has_next() {
            self.next(pair[1])
        } else {
            MatchResult::NoMatch
        }
    }

    /// Feed a sequence; stops early once it no longer matches.
    ///
    /// An empty sequence returns [`current`](Self::current).
    pub fn next_units(&mut self, units: &[u16]) -> MatchResult {
        let mut result = self.current();
        for &unit in units {
            if !result.has_next() {
                return MatchResult::NoMatch;
            }
            result = self.next(unit);
        }
        result
    }

    /// Feed the UTF-16 units of `s`.
    pub fn next_str(&mut self, s: &str) -> MatchResult {
        let mut result = self.current();
        for unit in s.encode_utf16() {
            if !result.has_next() {
                return MatchResult::NoMatch;
            }
            result = self.next(unit);
        }
        result
    }

    /// Feed one unit.
    ///
    /// Must not be called after `NoMatch` without a `reset` in between.
    pub fn next(&mut self, unit: u16) -> MatchResult {
        debug_assert!(self.pos.is_some(), "next() on a cursor that stopped matching; reset() first");
        let Some(mut pos) = self.pos else {
            return MatchResult::NoMatch;
        };
        let length = self.remaining_match_length;
        if length >= 0 {
            // Inside a linear-match node.
            if unit == self.units[pos] {
                pos += 1;
                return self.after_linear_unit(pos, length - 1);
            }
            return self.stop();
        }
        self.next_at_node(pos, unit)
    }

    /// Value of the sequence consumed so far.
    ///
    /// Meaningful right after `HasValue` or `FinalValue`; `None` elsewhere.
    pub fn value(&self) -> Option<i32> {
        let pos = self.pos?;
        if self.remaining_match_length >= 0 {
            return None;
        }
        let lead = self.units[pos];
        if lead < MIN_VALUE_LEAD {
            None
        } else if lead & VALUE_IS_FINAL != 0 {
            Some(read_value(&self.units, pos + 1, lead & !VALUE_IS_FINAL))
        } else {
            Some(read_node_value(&self.units, pos + 1, lead))
        }
    }

    fn stop(&mut self) -> MatchResult {
        self.pos = None;
        MatchResult::NoMatch
    }

    fn after_linear_unit(&mut self, pos: usize, remaining: i32) -> MatchResult {
        self.remaining_match_length = remaining;
        self.pos = Some(pos);
        if remaining < 0 {
            MatchResult::at_node(self.units[pos])
        } else {
            MatchResult::NoValue
        }
    }

    fn next_at_node(&mut self, mut pos: usize, unit: u16) -> MatchResult {
        let mut node = self.units[pos];
        pos += 1;
        loop {
            if node < MIN_LINEAR_MATCH {
                return self.branch_next(pos, node, unit);
            } else if node < MIN_VALUE_LEAD {
                // First unit of a linear match of (node - MIN_LINEAR_MATCH + 1) units.
                if unit == self.units[pos] {
                    let remaining = i32::from(node - MIN_LINEAR_MATCH) - 1;
                    return self.after_linear_unit(pos + 1, remaining);
                }
                return self.stop();
            } else if node & VALUE_IS_FINAL != 0 {
                // Nothing continues past a final value.
                return self.stop();
            } else {
                pos = skip_node_value(pos, node);
                node &= NODE_TYPE_MASK;
            }
        }
    }

    fn branch_next(&mut self, mut pos: usize, node: u16, unit: u16) -> MatchResult {
        let units: &[u16] = &self.units;
        let mut length = if node == 0 {
            pos += 1;
            usize::from(units[pos - 1])
        } else {
            usize::from(node)
        } + 1;
        // Binary search down to a short list.
        while length > MAX_BRANCH_LINEAR_SUB_NODE_LENGTH {
            let middle = units[pos];
            pos += 1;
            if unit < middle {
                length >>= 1;
                pos = jump_by_delta(units, pos);
            } else {
                length -= length >> 1;
                pos = skip_delta(units, pos);
            }
        }
        // Linear scan; each entry but the last carries a final value or a jump.
        while length > 1 {
            let candidate = units[pos];
            pos += 1;
            if unit == candidate {
                let lead = units[pos];
                let result = if lead & VALUE_IS_FINAL != 0 {
                    MatchResult::FinalValue
                } else {
                    let delta = read_value(units, pos + 1, lead) as u32 as usize;
                    pos = skip_value(pos + 1, lead) + delta;
                    MatchResult::at_node(units[pos])
                };
                self.pos = Some(pos);
                return result;
            }
            length -= 1;
            pos = skip_value_at(units, pos);
        }
        // The last unit's node follows it directly.
        if unit == units[pos] {
            pos += 1;
            self.pos = Some(pos);
            MatchResult::at_node(units[pos])
        } else {
            self.stop()
        }
    }
}
