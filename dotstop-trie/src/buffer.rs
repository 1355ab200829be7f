//! Backward-growing unit buffer
//!
//! Nodes are serialized children first, so the buffer is filled from its end
//! toward its start. Lengths returned by the write methods are measured from
//! the end of the buffer and stay valid when the buffer grows.

use alloc::vec;
use alloc::vec::Vec;

use crate::encoding::{
    MAX_ONE_UNIT_DELTA, MAX_ONE_UNIT_NODE_VALUE, MAX_ONE_UNIT_VALUE, MAX_TWO_UNIT_DELTA,
    MAX_TWO_UNIT_NODE_VALUE, MAX_TWO_UNIT_VALUE, MIN_TWO_UNIT_DELTA_LEAD,
    MIN_TWO_UNIT_NODE_VALUE_LEAD, MIN_TWO_UNIT_VALUE_LEAD, THREE_UNIT_DELTA_LEAD,
    THREE_UNIT_NODE_VALUE_LEAD, THREE_UNIT_VALUE_LEAD, VALUE_IS_FINAL,
};

pub(crate) struct BackwardBuffer {
    units: Vec<u16>,
    /// Occupied units, counted from the end of `units`
    len: usize,
}

impl BackwardBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            units: vec![0; capacity.max(1)],
            len: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The written units, root first.
    pub(crate) fn occupied(&self) -> &[u16] {
        &self.units[self.units.len() - self.len..]
    }

    fn ensure_capacity(&mut self, length: usize) {
        if length <= self.units.len() {
            return;
        }
        let mut capacity = self.units.len();
        while capacity <= length {
            capacity *= 2;
        }
        let mut grown = vec![0; capacity];
        grown[capacity - self.len..].copy_from_slice(self.occupied());
        self.units = grown;
    }

    pub(crate) fn write(&mut self, unit: u16) -> usize {
        let len = self.len + 1;
        self.ensure_capacity(len);
        self.len = len;
        let at = self.units.len() - len;
        self.units[at] = unit;
        len
    }

    pub(crate) fn write_all(&mut self, units: &[u16]) -> usize {
        let len = self.len + units.len();
        self.ensure_capacity(len);
        self.len = len;
        let at = self.units.len() - len;
        self.units[at..at + units.len()].copy_from_slice(units);
        len
    }

    /// Write a final value, or a branch-list value/jump when `is_final` is false.
    pub(crate) fn write_value_and_final(&mut self, value: i32, is_final: bool) -> usize {
        let final_bit = if is_final { VALUE_IS_FINAL } else { 0 };
        if (0..=MAX_ONE_UNIT_VALUE).contains(&value) {
            return self.write(value as u16 | final_bit);
        }
        let mut units = [0u16; 3];
        let length = if !(0..=MAX_TWO_UNIT_VALUE).contains(&value) {
            units[0] = THREE_UNIT_VALUE_LEAD;
            units[1] = ((value as u32) >> 16) as u16;
            units[2] = value as u16;
            3
        } else {
            units[0] = MIN_TWO_UNIT_VALUE_LEAD + (value >> 16) as u16;
            units[1] = value as u16;
            2
        };
        units[0] |= final_bit;
        self.write_all(&units[..length])
    }

    /// Write the lead unit of a continuing node: its optional value plus the
    /// type of the node that follows.
    pub(crate) fn write_value_and_type(&mut self, value: Option<i32>, node: u16) -> usize {
        let Some(value) = value else {
            return self.write(node);
        };
        let mut units = [0u16; 3];
        let length = if !(0..=MAX_TWO_UNIT_NODE_VALUE).contains(&value) {
            units[0] = THREE_UNIT_NODE_VALUE_LEAD;
            units[1] = ((value as u32) >> 16) as u16;
            units[2] = value as u16;
            3
        } else if value <= MAX_ONE_UNIT_NODE_VALUE {
            units[0] = ((value + 1) << 6) as u16;
            1
        } else {
            units[0] = MIN_TWO_UNIT_NODE_VALUE_LEAD + ((value >> 10) as u16 & 0x7fc0);
            units[1] = value as u16;
            2
        };
        units[0] |= node;
        self.write_all(&units[..length])
    }

    /// Write a jump from the current position to the node written when the
    /// buffer length was `jump_target`.
    pub(crate) fn write_delta_to(&mut self, jump_target: usize) -> usize {
        debug_assert!(jump_target <= self.len);
        let delta = self.len - jump_target;
        if delta <= MAX_ONE_UNIT_DELTA {
            return self.write(delta as u16);
        }
        let mut units = [0u16; 3];
        let length = if delta <= MAX_TWO_UNIT_DELTA {
            units[0] = MIN_TWO_UNIT_DELTA_LEAD + (delta >> 16) as u16;
            units[1] = delta as u16;
            2
        } else {
            units[0] = THREE_UNIT_DELTA_LEAD;
            units[1] = (delta >> 16) as u16;
            units[2] = delta as u16;
            3
        };
        self.write_all(&units[..length])
    }
}
