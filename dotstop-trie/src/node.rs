//! In-memory node graph built from the sorted entries before serialization
//!
//! Nodes live in an arena and refer to their children by index. A child is
//! always registered before its parent, so a node's value (including child
//! ids) identifies its whole sub-trie and can key the dedup map.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::BackwardBuffer;
use crate::encoding::{MAX_BRANCH_LINEAR_SUB_NODE_LENGTH, MAX_LINEAR_MATCH_LENGTH, MIN_LINEAR_MATCH};
use crate::BuildMode;

pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Edge {
    /// The only sequence through this unit ends right after it
    Final(i32),
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Node {
    FinalValue(i32),
    LinearMatch {
        units: Vec<u16>,
        next: NodeId,
        value: Option<i32>,
    },
    ListBranch {
        units: Vec<u16>,
        edges: Vec<Edge>,
    },
    SplitBranch {
        unit: u16,
        less_than: NodeId,
        greater_or_equal: NodeId,
    },
    BranchHead {
        length: usize,
        next: NodeId,
        value: Option<i32>,
    },
}

/// Pending step of graph construction.
///
/// Results land in `slots`; a step that needs child nodes is pushed below
/// the steps producing them and reads their slots once they ran.
enum Step {
    /// Node for entries `[start, limit)` from `unit_index` on
    Node {
        start: usize,
        limit: usize,
        unit_index: usize,
        slot: usize,
    },
    /// Units `[unit_index, last_unit_index)` of `start` in front of `next`
    Linear {
        start: usize,
        unit_index: usize,
        last_unit_index: usize,
        value: Option<i32>,
        next: usize,
        slot: usize,
    },
    Head {
        length: usize,
        value: Option<i32>,
        next: usize,
        slot: usize,
    },
    /// Branch over `length` distinct units at `unit_index`
    SubNode {
        start: usize,
        limit: usize,
        unit_index: usize,
        length: usize,
        slot: usize,
    },
    /// Edges refer to slots until the list is registered
    List {
        middle_units: Vec<u16>,
        less_than: Vec<usize>,
        units: Vec<u16>,
        edges: Vec<Edge>,
        slot: usize,
    },
}

/// Node graph over entries sorted by their units.
pub(crate) struct NodeGraph<'a> {
    entries: &'a [(&'a [u16], i32)],
    mode: BuildMode,
    nodes: Vec<Node>,
    registry: BTreeMap<Node, NodeId>,
}

impl<'a> NodeGraph<'a> {
    pub(crate) fn new(entries: &'a [(&'a [u16], i32)], mode: BuildMode) -> Self {
        Self {
            entries,
            mode,
            nodes: Vec::with_capacity(entries.len() * 2),
            registry: BTreeMap::new(),
        }
    }

    /// Build the graph for all entries and return the root.
    pub(crate) fn build(&mut self) -> NodeId {
        debug_assert!(!self.entries.is_empty());
        let mut slots: Vec<NodeId> = vec![0];
        let mut steps = vec![Step::Node {
            start: 0,
            limit: self.entries.len(),
            unit_index: 0,
            slot: 0,
        }];
        while let Some(step) = steps.pop() {
            match step {
                Step::Node {
                    start,
                    limit,
                    unit_index,
                    slot,
                } => self.make_node(start, limit, unit_index, slot, &mut slots, &mut steps),
                Step::Linear {
                    start,
                    unit_index,
                    mut last_unit_index,
                    value,
                    next,
                    slot,
                } => {
                    let units = self.units_of(start);
                    let mut next = slots[next];
                    let mut length = last_unit_index - unit_index;
                    while length > MAX_LINEAR_MATCH_LENGTH {
                        last_unit_index -= MAX_LINEAR_MATCH_LENGTH;
                        length -= MAX_LINEAR_MATCH_LENGTH;
                        next = self.register(Node::LinearMatch {
                            units: units[last_unit_index..last_unit_index + MAX_LINEAR_MATCH_LENGTH]
                                .to_vec(),
                            next,
                            value: None,
                        });
                    }
                    slots[slot] = self.register(Node::LinearMatch {
                        units: units[unit_index..unit_index + length].to_vec(),
                        next,
                        value,
                    });
                }
                Step::Head {
                    length,
                    value,
                    next,
                    slot,
                } => {
                    slots[slot] = self.register(Node::BranchHead {
                        length,
                        next: slots[next],
                        value,
                    });
                }
                Step::SubNode {
                    start,
                    limit,
                    unit_index,
                    length,
                    slot,
                } => self.make_branch_sub_node(
                    start,
                    limit,
                    unit_index,
                    length,
                    slot,
                    &mut slots,
                    &mut steps,
                ),
                Step::List {
                    mut middle_units,
                    mut less_than,
                    units,
                    mut edges,
                    slot,
                } => {
                    for edge in &mut edges {
                        if let Edge::Node(child) = edge {
                            *child = slots[*child];
                        }
                    }
                    let mut node = self.register(Node::ListBranch { units, edges });
                    while let (Some(unit), Some(less)) = (middle_units.pop(), less_than.pop()) {
                        node = self.register(Node::SplitBranch {
                            unit,
                            less_than: slots[less],
                            greater_or_equal: node,
                        });
                    }
                    slots[slot] = node;
                }
            }
        }
        slots[0]
    }

    /// Serialize the sub-trie at `root` into `buffer`.
    pub(crate) fn write(&self, root: NodeId, buffer: &mut BackwardBuffer) {
        let mut writer = Writer {
            nodes: &self.nodes,
            offsets: vec![0; self.nodes.len()],
            first_edges: vec![0; self.nodes.len()],
            buffer,
        };
        writer.mark_right_edges_first(root);
        writer.write(root);
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn register(&mut self, node: Node) -> NodeId {
        let shared = self.mode == BuildMode::Small || matches!(node, Node::FinalValue(_));
        if shared {
            if let Some(&id) = self.registry.get(&node) {
                return id;
            }
            self.registry.insert(node.clone(), self.nodes.len());
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[inline]
    fn units_of(&self, i: usize) -> &'a [u16] {
        self.entries[i].0
    }

    #[inline]
    fn unit_at(&self, i: usize, unit_index: usize) -> u16 {
        self.entries[i].0[unit_index]
    }

    /// Index after the shared run of units starting at `unit_index`.
    fn limit_of_linear_match(&self, first: usize, last: usize, unit_index: usize) -> usize {
        let first = self.units_of(first);
        let last = self.units_of(last);
        let mut i = unit_index + 1;
        while i < first.len() && last.get(i) == Some(&first[i]) {
            i += 1;
        }
        i
    }

    /// Number of distinct units at `unit_index` in `[start, limit)`.
    fn count_units(&self, start: usize, limit: usize, unit_index: usize) -> usize {
        let mut length = 0;
        let mut i = start;
        while i < limit {
            let unit = self.unit_at(i, unit_index);
            i = self.index_of_next_unit(i + 1, limit, unit_index, unit);
            length += 1;
        }
        length
    }

    /// Start of the group that follows `count` unit groups from `i`.
    fn skip_unit_groups(&self, mut i: usize, limit: usize, unit_index: usize, count: usize) -> usize {
        for _ in 0..count {
            let unit = self.unit_at(i, unit_index);
            i = self.index_of_next_unit(i + 1, limit, unit_index, unit);
        }
        i
    }

    fn index_of_next_unit(&self, mut i: usize, limit: usize, unit_index: usize, unit: u16) -> usize {
        while i < limit && self.unit_at(i, unit_index) == unit {
            i += 1;
        }
        i
    }

    fn make_node(
        &mut self,
        mut start: usize,
        limit: usize,
        unit_index: usize,
        slot: usize,
        slots: &mut Vec<NodeId>,
        steps: &mut Vec<Step>,
    ) {
        let mut value = None;
        if unit_index == self.units_of(start).len() {
            let entry_value = self.entries[start].1;
            start += 1;
            if start == limit {
                slots[slot] = self.register(Node::FinalValue(entry_value));
                return;
            }
            value = Some(entry_value);
        }
        // Every sequence in [start, limit) is longer than unit_index now.
        let next = slots.len();
        slots.push(0);
        let min_unit = self.unit_at(start, unit_index);
        let max_unit = self.unit_at(limit - 1, unit_index);
        if min_unit == max_unit {
            let last_unit_index = self.limit_of_linear_match(start, limit - 1, unit_index);
            steps.push(Step::Linear {
                start,
                unit_index,
                last_unit_index,
                value,
                next,
                slot,
            });
            steps.push(Step::Node {
                start,
                limit,
                unit_index: last_unit_index,
                slot: next,
            });
        } else {
            let length = self.count_units(start, limit, unit_index);
            steps.push(Step::Head {
                length,
                value,
                next,
                slot,
            });
            steps.push(Step::SubNode {
                start,
                limit,
                unit_index,
                length,
                slot: next,
            });
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn make_branch_sub_node(
        &mut self,
        mut start: usize,
        limit: usize,
        unit_index: usize,
        mut length: usize,
        slot: usize,
        slots: &mut Vec<NodeId>,
        steps: &mut Vec<Step>,
    ) {
        let mut children = Vec::new();
        let mut middle_units = Vec::new();
        let mut less_than = Vec::new();
        while length > MAX_BRANCH_LINEAR_SUB_NODE_LENGTH {
            // Branch on the middle unit: less-than half is reached by a jump.
            let i = self.skip_unit_groups(start, limit, unit_index, length / 2);
            middle_units.push(self.unit_at(i, unit_index));
            less_than.push(slots.len());
            children.push(Step::SubNode {
                start,
                limit: i,
                unit_index,
                length: length / 2,
                slot: slots.len(),
            });
            slots.push(0);
            start = i;
            length -= length / 2;
        }
        let mut units = Vec::with_capacity(length);
        let mut edges = Vec::with_capacity(length);
        while start < limit {
            let unit = self.unit_at(start, unit_index);
            let i = self.index_of_next_unit(start + 1, limit, unit_index, unit);
            units.push(unit);
            if start + 1 == i && unit_index + 1 == self.units_of(start).len() {
                edges.push(Edge::Final(self.entries[start].1));
            } else {
                edges.push(Edge::Node(slots.len()));
                children.push(Step::Node {
                    start,
                    limit: i,
                    unit_index: unit_index + 1,
                    slot: slots.len(),
                });
                slots.push(0);
            }
            start = i;
        }
        steps.push(Step::List {
            middle_units,
            less_than,
            units,
            edges,
            slot,
        });
        // Children run in order, lowest unit first.
        steps.extend(children.into_iter().rev());
    }
}

/// Pending step of right-edge numbering.
enum Mark {
    Enter { id: NodeId, edge_number: i64 },
    /// Record the current edge number as the node's offset
    Exit(NodeId),
    /// Edges `[0, remaining)` of a list branch are still unnumbered
    ListEdges {
        id: NodeId,
        remaining: usize,
        step: i64,
    },
    LessThan(NodeId),
}

/// Pending step of serialization.
enum Emit {
    Node(NodeId),
    /// Write `id` unless it is on the right edge `last_right..=first_right`
    UnlessInsideRightEdge {
        id: NodeId,
        first_right: i64,
        last_right: i64,
    },
    /// Children are written; write the node itself
    Finish(NodeId),
}

/// Serialization state for one build pass.
///
/// `offsets` holds 0 for untouched nodes, a negative right-edge number for
/// nodes that will be written inline after their parent's other children,
/// and the buffer length right after the node once it was written.
struct Writer<'g, 'b> {
    nodes: &'g [Node],
    offsets: Vec<i64>,
    first_edges: Vec<i64>,
    buffer: &'b mut BackwardBuffer,
}

impl Writer<'_, '_> {
    fn mark_right_edges_first(&mut self, root: NodeId) {
        let nodes = self.nodes;
        // Edge number returned by the last finished step.
        let mut current = -1;
        let mut steps = vec![Mark::Enter {
            id: root,
            edge_number: -1,
        }];
        while let Some(step) = steps.pop() {
            match step {
                Mark::Enter { id, edge_number } => {
                    current = edge_number;
                    if self.offsets[id] != 0 {
                        continue;
                    }
                    match &nodes[id] {
                        Node::FinalValue(_) => self.offsets[id] = edge_number,
                        Node::LinearMatch { next, .. } | Node::BranchHead { next, .. } => {
                            steps.push(Mark::Exit(id));
                            steps.push(Mark::Enter {
                                id: *next,
                                edge_number,
                            });
                        }
                        Node::ListBranch { edges, .. } => {
                            self.first_edges[id] = edge_number;
                            steps.push(Mark::Exit(id));
                            steps.push(Mark::ListEdges {
                                id,
                                remaining: edges.len(),
                                step: 0,
                            });
                        }
                        Node::SplitBranch {
                            less_than,
                            greater_or_equal,
                            ..
                        } => {
                            self.first_edges[id] = edge_number;
                            steps.push(Mark::Exit(id));
                            steps.push(Mark::LessThan(*less_than));
                            steps.push(Mark::Enter {
                                id: *greater_or_equal,
                                edge_number,
                            });
                        }
                    }
                }
                Mark::Exit(id) => self.offsets[id] = current,
                Mark::ListEdges {
                    id,
                    remaining,
                    step,
                } => {
                    let Node::ListBranch { edges, .. } = &nodes[id] else {
                        continue;
                    };
                    if remaining == 0 {
                        continue;
                    }
                    // Only the rightmost edge keeps the parent's number.
                    steps.push(Mark::ListEdges {
                        id,
                        remaining: remaining - 1,
                        step: 1,
                    });
                    if let Edge::Node(child) = edges[remaining - 1] {
                        steps.push(Mark::Enter {
                            id: child,
                            edge_number: current - step,
                        });
                    }
                }
                Mark::LessThan(less_than) => steps.push(Mark::Enter {
                    id: less_than,
                    edge_number: current - 1,
                }),
            }
        }
    }

    fn written_offset(&self, id: NodeId) -> usize {
        debug_assert!(self.offsets[id] > 0, "jump target written before its parent");
        self.offsets[id] as usize
    }

    fn write(&mut self, root: NodeId) {
        let nodes = self.nodes;
        let mut steps = vec![Emit::Node(root)];
        while let Some(step) = steps.pop() {
            let id = match step {
                Emit::Node(id) => id,
                Emit::UnlessInsideRightEdge {
                    id,
                    first_right,
                    last_right,
                } => {
                    let offset = self.offsets[id];
                    if offset < 0 && (offset < last_right || first_right < offset) {
                        steps.push(Emit::Node(id));
                    }
                    continue;
                }
                Emit::Finish(id) => {
                    let offset = self.finish(id);
                    self.offsets[id] = offset as i64;
                    continue;
                }
            };
            match &nodes[id] {
                Node::FinalValue(value) => {
                    let offset = self.buffer.write_value_and_final(*value, true);
                    self.offsets[id] = offset as i64;
                }
                Node::LinearMatch { next, .. } | Node::BranchHead { next, .. } => {
                    steps.push(Emit::Finish(id));
                    steps.push(Emit::Node(*next));
                }
                Node::ListBranch { edges, .. } => {
                    let last = edges.len() - 1;
                    let first_right = self.first_edges[id];
                    let last_right = match edges[last] {
                        Edge::Node(child) => self.offsets[child],
                        Edge::Final(_) => first_right,
                    };
                    steps.push(Emit::Finish(id));
                    // The max unit's sub-node directly follows the list: no jump.
                    if let Edge::Node(child) = edges[last] {
                        steps.push(Emit::Node(child));
                    }
                    // Lower units are written later so their jumps stay short.
                    for edge in &edges[..last] {
                        if let Edge::Node(child) = edge {
                            steps.push(Emit::UnlessInsideRightEdge {
                                id: *child,
                                first_right,
                                last_right,
                            });
                        }
                    }
                }
                Node::SplitBranch {
                    less_than,
                    greater_or_equal,
                    ..
                } => {
                    let first_right = self.first_edges[id];
                    let last_right = self.offsets[*greater_or_equal];
                    steps.push(Emit::Finish(id));
                    steps.push(Emit::Node(*greater_or_equal));
                    steps.push(Emit::UnlessInsideRightEdge {
                        id: *less_than,
                        first_right,
                        last_right,
                    });
                }
            }
        }
    }

    /// Write a node whose children are all written; returns its offset.
    fn finish(&mut self, id: NodeId) -> usize {
        let nodes = self.nodes;
        match &nodes[id] {
            Node::FinalValue(value) => self.buffer.write_value_and_final(*value, true),
            Node::LinearMatch { units, value, .. } => {
                self.buffer.write_all(units);
                let node_type = MIN_LINEAR_MATCH + units.len() as u16 - 1;
                self.buffer.write_value_and_type(*value, node_type)
            }
            Node::BranchHead { length, value, .. } => {
                if *length <= usize::from(MIN_LINEAR_MATCH) {
                    self.buffer.write_value_and_type(*value, (*length - 1) as u16)
                } else {
                    self.buffer.write((*length - 1) as u16);
                    self.buffer.write_value_and_type(*value, 0)
                }
            }
            Node::ListBranch { units, edges } => {
                let last = units.len() - 1;
                if let Edge::Final(value) = edges[last] {
                    self.buffer.write_value_and_final(value, true);
                }
                let mut offset = self.buffer.write(units[last]);
                for (unit, edge) in units[..last].iter().zip(&edges[..last]).rev() {
                    match edge {
                        Edge::Final(value) => self.buffer.write_value_and_final(*value, true),
                        Edge::Node(child) => {
                            let delta = offset - self.written_offset(*child);
                            self.buffer.write_value_and_final(delta as i32, false)
                        }
                    };
                    offset = self.buffer.write(*unit);
                }
                offset
            }
            Node::SplitBranch {
                unit, less_than, ..
            } => {
                let target = self.written_offset(*less_than);
                self.buffer.write_delta_to(target);
                self.buffer.write(*unit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_size(keys: &[&str], mode: BuildMode) -> usize {
        let owned: Vec<Vec<u16>> = keys.iter().map(|k| k.encode_utf16().collect()).collect();
        let entries: Vec<(&[u16], i32)> = owned.iter().map(|k| (k.as_slice(), 1)).collect();
        let mut graph = NodeGraph::new(&entries, mode);
        graph.build();
        graph.node_count()
    }

    #[test]
    fn test_small_mode_shares_suffixes() {
        // "ax" and "bx" end in identical sub-tries.
        let keys = ["ax", "bx", "cx", "dx", "ex", "fx", "gx"];
        assert!(graph_size(&keys, BuildMode::Small) < graph_size(&keys, BuildMode::Fast));
    }

    #[test]
    fn test_long_linear_match_is_chunked() {
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        let owned: Vec<u16> = long.encode_utf16().collect();
        let entries = [(owned.as_slice(), 7)];
        let mut graph = NodeGraph::new(&entries, BuildMode::Fast);
        graph.build();
        // 36 units -> 16 + 16 + 4, plus the final value.
        assert_eq!(graph.node_count(), 4);
    }
}
