//! Unit layout shared by the builder and the reader
//!
//! A serialized trie is a sequence of 16-bit units. The lead unit of every
//! node tells its kind by range:
//!
//! | lead unit         | node                                                   |
//! |-------------------|--------------------------------------------------------|
//! | `0x0000..=0x002f` | branch with `lead + 1` units (`0`: count follows)      |
//! | `0x0030..=0x003f` | linear match of `lead - 0x30 + 1` literal units        |
//! | `0x0040..=0x7fff` | value, low 6 bits hold the type of the following node  |
//! | `0x8000..=0xffff` | final value                                            |

/// Longest branch list that is scanned linearly; longer lists split in half.
pub(crate) const MAX_BRANCH_LINEAR_SUB_NODE_LENGTH: usize = 5;

pub(crate) const MIN_LINEAR_MATCH: u16 = 0x30;
pub(crate) const MAX_LINEAR_MATCH_LENGTH: usize = 0x10;

pub(crate) const MIN_VALUE_LEAD: u16 = MIN_LINEAR_MATCH + MAX_LINEAR_MATCH_LENGTH as u16;
pub(crate) const NODE_TYPE_MASK: u16 = MIN_VALUE_LEAD - 1;

pub(crate) const VALUE_IS_FINAL: u16 = 0x8000;

// Final values and branch-list values.
pub(crate) const MAX_ONE_UNIT_VALUE: i32 = 0x3fff;
pub(crate) const MIN_TWO_UNIT_VALUE_LEAD: u16 = 0x4000;
pub(crate) const THREE_UNIT_VALUE_LEAD: u16 = 0x7fff;
pub(crate) const MAX_TWO_UNIT_VALUE: i32 =
    (((THREE_UNIT_VALUE_LEAD - MIN_TWO_UNIT_VALUE_LEAD) as i32) << 16) - 1;

// Values carried on a node that continues.
pub(crate) const MAX_ONE_UNIT_NODE_VALUE: i32 = 0xff;
pub(crate) const MIN_TWO_UNIT_NODE_VALUE_LEAD: u16 =
    MIN_VALUE_LEAD + ((MAX_ONE_UNIT_NODE_VALUE as u16 + 1) << 6);
pub(crate) const THREE_UNIT_NODE_VALUE_LEAD: u16 = 0x7fc0;
pub(crate) const MAX_TWO_UNIT_NODE_VALUE: i32 =
    (((THREE_UNIT_NODE_VALUE_LEAD - MIN_TWO_UNIT_NODE_VALUE_LEAD) as i32) << 10) - 1;

// Jump deltas.
pub(crate) const MAX_ONE_UNIT_DELTA: usize = 0xfbff;
pub(crate) const MIN_TWO_UNIT_DELTA_LEAD: u16 = 0xfc00;
pub(crate) const THREE_UNIT_DELTA_LEAD: u16 = 0xffff;
pub(crate) const MAX_TWO_UNIT_DELTA: usize =
    (((THREE_UNIT_DELTA_LEAD - MIN_TWO_UNIT_DELTA_LEAD) as usize) << 16) - 1;

/// Decode a final or branch-list value. `lead` has the final bit cleared and
/// `pos` points just after the lead unit.
#[inline]
pub(crate) fn read_value(units: &[u16], pos: usize, lead: u16) -> i32 {
    if lead < MIN_TWO_UNIT_VALUE_LEAD {
        i32::from(lead)
    } else if lead < THREE_UNIT_VALUE_LEAD {
        (i32::from(lead - MIN_TWO_UNIT_VALUE_LEAD) << 16) | i32::from(units[pos])
    } else {
        ((u32::from(units[pos]) << 16) | u32::from(units[pos + 1])) as i32
    }
}

/// Position after a value whose lead unit (final bit cleared) was already read.
#[inline]
pub(crate) fn skip_value(pos: usize, lead: u16) -> usize {
    if lead < MIN_TWO_UNIT_VALUE_LEAD {
        pos
    } else if lead < THREE_UNIT_VALUE_LEAD {
        pos + 1
    } else {
        pos + 2
    }
}

/// Position after the value starting at `pos`, lead unit included.
#[inline]
pub(crate) fn skip_value_at(units: &[u16], pos: usize) -> usize {
    skip_value(pos + 1, units[pos] & !VALUE_IS_FINAL)
}

/// Decode the value carried on a continuing node.
#[inline]
pub(crate) fn read_node_value(units: &[u16], pos: usize, lead: u16) -> i32 {
    debug_assert!((MIN_VALUE_LEAD..VALUE_IS_FINAL).contains(&lead));
    if lead < MIN_TWO_UNIT_NODE_VALUE_LEAD {
        i32::from(lead >> 6) - 1
    } else if lead < THREE_UNIT_NODE_VALUE_LEAD {
        (i32::from((lead & 0x7fc0) - MIN_TWO_UNIT_NODE_VALUE_LEAD) << 10) | i32::from(units[pos])
    } else {
        ((u32::from(units[pos]) << 16) | u32::from(units[pos + 1])) as i32
    }
}

#[inline]
pub(crate) fn skip_node_value(pos: usize, lead: u16) -> usize {
    debug_assert!((MIN_VALUE_LEAD..VALUE_IS_FINAL).contains(&lead));
    if lead < MIN_TWO_UNIT_NODE_VALUE_LEAD {
        pos
    } else if lead < THREE_UNIT_NODE_VALUE_LEAD {
        pos + 1
    } else {
        pos + 2
    }
}

/// Follow the jump delta starting at `pos`.
#[inline]
pub(crate) fn jump_by_delta(units: &[u16], pos: usize) -> usize {
    let lead = units[pos];
    let pos = pos + 1;
    if lead < MIN_TWO_UNIT_DELTA_LEAD {
        pos + usize::from(lead)
    } else if lead == THREE_UNIT_DELTA_LEAD {
        let delta = (usize::from(units[pos]) << 16) | usize::from(units[pos + 1]);
        pos + 2 + delta
    } else {
        let delta = (usize::from(lead - MIN_TWO_UNIT_DELTA_LEAD) << 16) | usize::from(units[pos]);
        pos + 1 + delta
    }
}

/// Position after the jump delta starting at `pos`.
#[inline]
pub(crate) fn skip_delta(units: &[u16], pos: usize) -> usize {
    let lead = units[pos];
    if lead < MIN_TWO_UNIT_DELTA_LEAD {
        pos + 1
    } else if lead == THREE_UNIT_DELTA_LEAD {
        pos + 3
    } else {
        pos + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(MIN_VALUE_LEAD, 0x40);
        assert_eq!(NODE_TYPE_MASK, 0x3f);
        assert_eq!(MAX_TWO_UNIT_VALUE, 0x3ffe_ffff);
        assert_eq!(MIN_TWO_UNIT_NODE_VALUE_LEAD, 0x4040);
        assert_eq!(MAX_TWO_UNIT_NODE_VALUE, 0x00fd_ffff);
        assert_eq!(MAX_TWO_UNIT_DELTA, 0x03fe_ffff);
    }

    #[test]
    fn test_read_value_widths() {
        assert_eq!(read_value(&[], 0, 0x1234), 0x1234);
        assert_eq!(read_value(&[0xbeef], 0, 0x4001), 0x0001_beef);
        assert_eq!(read_value(&[0xffff, 0xfffe], 0, 0x7fff), -2);
        assert_eq!(skip_value(10, 0x1234), 10);
        assert_eq!(skip_value(10, 0x4001), 11);
        assert_eq!(skip_value(10, 0x7fff), 12);
    }

    #[test]
    fn test_read_node_value_widths() {
        // One unit: (value + 1) << 6, low bits carry the node type.
        assert_eq!(read_node_value(&[], 0, (8 << 6) | 0x31), 7);
        assert_eq!(read_node_value(&[0x0203], 0, 0x4040 + 0x40), 0x01_0203);
        assert_eq!(read_node_value(&[0x8000, 0x0000], 0, 0x7fc0), i32::MIN);
    }

    #[test]
    fn test_delta_widths() {
        let units = [5u16, 0xfc01, 0x0002, 0xffff, 0x0004, 0x0000];
        assert_eq!(jump_by_delta(&units, 0), 6);
        assert_eq!(skip_delta(&units, 0), 1);
        assert_eq!(jump_by_delta(&units, 1), 3 + 0x1_0002);
        assert_eq!(skip_delta(&units, 1), 3);
        assert_eq!(jump_by_delta(&units, 3), 6 + 0x4_0000);
        assert_eq!(skip_delta(&units, 3), 6);
    }
}
