//! Enumeration of the entries stored in a serialized trie

use alloc::vec;
use alloc::vec::Vec;

use crate::encoding::{
    jump_by_delta, read_node_value, read_value, skip_delta, skip_node_value, skip_value,
    skip_value_at, MAX_BRANCH_LINEAR_SUB_NODE_LENGTH, MIN_LINEAR_MATCH, MIN_VALUE_LEAD,
    NODE_TYPE_MASK, VALUE_IS_FINAL,
};

enum Pending {
    /// Node whose lead unit is at `pos`
    Node { pos: usize, key_len: usize },
    /// Node of type `node` whose lead unit (and value) was already consumed
    Typed { pos: usize, node: u16, key_len: usize },
    /// Branch sub-list of `length` units starting at `pos`
    Branch { pos: usize, length: usize, key_len: usize },
    /// Branch unit followed by the node at `pos`
    Edge { unit: u16, pos: usize, key_len: usize },
    /// Branch unit ending a sequence
    FinalEdge { unit: u16, value: i32, key_len: usize },
}

/// Iterator over the (sequence, value) pairs of a trie, ascending by units
///
/// Created by [`UnitTrie::entries`](crate::UnitTrie::entries).
pub struct Entries<'a> {
    units: &'a [u16],
    key: Vec<u16>,
    stack: Vec<Pending>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(units: &'a [u16]) -> Self {
        Self {
            units,
            key: Vec::new(),
            stack: vec![Pending::Node { pos: 0, key_len: 0 }],
        }
    }

    /// Follow a chain of nodes until it yields a value or fans out.
    fn walk(&mut self, mut pos: usize, mut node: u16, key_len: usize) -> Option<(Vec<u16>, i32)> {
        let units = self.units;
        self.key.truncate(key_len);
        loop {
            if node < MIN_LINEAR_MATCH {
                let mut length = usize::from(node);
                if node == 0 {
                    length = usize::from(units[pos]);
                    pos += 1;
                }
                self.expand_branch(pos, length + 1);
                return None;
            } else if node < MIN_VALUE_LEAD {
                let length = usize::from(node - MIN_LINEAR_MATCH) + 1;
                self.key.extend_from_slice(&units[pos..pos + length]);
                pos += length;
                node = units[pos];
                pos += 1;
            } else if node & VALUE_IS_FINAL != 0 {
                let value = read_value(units, pos, node & !VALUE_IS_FINAL);
                return Some((self.key.clone(), value));
            } else {
                let value = read_node_value(units, pos, node);
                self.stack.push(Pending::Typed {
                    pos: skip_node_value(pos, node),
                    node: node & NODE_TYPE_MASK,
                    key_len: self.key.len(),
                });
                return Some((self.key.clone(), value));
            }
        }
    }

    fn expand_branch(&mut self, mut pos: usize, mut length: usize) {
        let units = self.units;
        let key_len = self.key.len();
        if length > MAX_BRANCH_LINEAR_SUB_NODE_LENGTH {
            // Skip the middle unit; the lower half sits behind the jump.
            pos += 1;
            self.stack.push(Pending::Branch {
                pos: skip_delta(units, pos),
                length: length - (length >> 1),
                key_len,
            });
            self.stack.push(Pending::Branch {
                pos: jump_by_delta(units, pos),
                length: length >> 1,
                key_len,
            });
            return;
        }
        let start = self.stack.len();
        while length > 1 {
            let unit = units[pos];
            pos += 1;
            let lead = units[pos];
            if lead & VALUE_IS_FINAL != 0 {
                let value = read_value(units, pos + 1, lead & !VALUE_IS_FINAL);
                self.stack.push(Pending::FinalEdge { unit, value, key_len });
            } else {
                let delta = read_value(units, pos + 1, lead) as u32 as usize;
                let target = skip_value(pos + 1, lead) + delta;
                self.stack.push(Pending::Edge { unit, pos: target, key_len });
            }
            pos = skip_value_at(units, pos);
            length -= 1;
        }
        self.stack.push(Pending::Edge {
            unit: units[pos],
            pos: pos + 1,
            key_len,
        });
        // Lowest unit on top.
        self.stack[start..].reverse();
    }
}

impl Iterator for Entries<'_> {
    type Item = (Vec<u16>, i32);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pending) = self.stack.pop() {
            let (pos, node, key_len) = match pending {
                Pending::Node { pos, key_len } => (pos + 1, self.units[pos], key_len),
                Pending::Typed { pos, node, key_len } => (pos, node, key_len),
                Pending::Branch { pos, length, key_len } => {
                    self.key.truncate(key_len);
                    self.expand_branch(pos, length);
                    continue;
                }
                Pending::Edge { unit, pos, key_len } => {
                    self.key.truncate(key_len);
                    self.key.push(unit);
                    (pos + 1, self.units[pos], key_len + 1)
                }
                Pending::FinalEdge { unit, value, key_len } => {
                    self.key.truncate(key_len);
                    self.key.push(unit);
                    return Some((self.key.clone(), value));
                }
            };
            if let Some(entry) = self.walk(pos, node, key_len) {
                return Some(entry);
            }
        }
        None
    }
}
