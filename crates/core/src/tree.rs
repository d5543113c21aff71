//! Huffman tree construction.
//!
//! The tree is rebuilt from the serialized table on decode, so the build has
//! to be bit-for-bit reproducible. It uses a greedy merge over units that are
//! already sorted ascending by composite key:
//!
//! 1. Lay out one leaf per unit, in table order.
//! 2. On step `i`, merge the entries at positions `i` and `i + 1` into an
//!    internal node (left = position `i`) and put it back at `i + 1`.
//! 3. Bubble the new node rightward while it is strictly heavier than its
//!    neighbour. A merged node therefore sorts before existing entries of
//!    equal weight.
//!
//! After `size - 1` steps the last position holds the root.
//!
//! # Storage
//!
//! All `2 * size - 1` nodes live in one arena and refer to their children by
//! index. The tree is dropped in one step when the encode or decode that
//! built it finishes.

use std::fmt::Write as _;

use crate::error::{Error, FormatError, Result};
use crate::frequency::{TableUnit, MIN_TABLE_SIZE, SYMBOLS};

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// Indentation per level in [`HuffmanTree::render`].
const RENDER_INDENT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf { value: u8, weight: u64 },
    Internal { weight: u64, left: NodeId, right: NodeId },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A strict binary tree over `size` leaves, stored in an arena.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree from units sorted ascending by composite key.
    ///
    /// # Errors
    /// - `FormatError::TableSizeOutOfRange` if fewer than 2 or more than 256
    ///   units are given
    /// - `Error::AllocationFailure` if the arena cannot be reserved
    pub fn build(units: &[TableUnit]) -> Result<Self> {
        let size = units.len();
        if !(MIN_TABLE_SIZE..=SYMBOLS).contains(&size) {
            return Err(FormatError::TableSizeOutOfRange { size: size as u32 }.into());
        }

        let node_count = 2 * size - 1;
        let mut nodes: Vec<Node> = Vec::new();
        nodes
            .try_reserve_exact(node_count)
            .map_err(|_| Error::AllocationFailure { nodes: node_count })?;
        let mut working: Vec<NodeId> = Vec::new();
        working
            .try_reserve_exact(size)
            .map_err(|_| Error::AllocationFailure { nodes: node_count })?;

        for unit in units {
            working.push(nodes.len());
            nodes.push(Node::Leaf {
                value: unit.value(),
                weight: unit.weight(),
            });
        }

        for i in 0..size - 1 {
            let left = working[i];
            let right = working[i + 1];
            // At most 256 weights below 2^56 each, so the sum fits in u64
            let weight = nodes[left].weight() + nodes[right].weight();

            working[i + 1] = nodes.len();
            nodes.push(Node::Internal {
                weight,
                left,
                right,
            });

            // Local insertion: move right past strictly lighter entries
            for j in i + 1..size - 1 {
                if nodes[working[j]].weight() > nodes[working[j + 1]].weight() {
                    working.swap(j, j + 1);
                } else {
                    break;
                }
            }
        }

        let root = working[size - 1];
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Weight of the root: the number of symbols the table describes.
    pub fn root_weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        (self.nodes.len() + 1) / 2
    }

    /// Child reached by following one bit from `id` (false = left).
    ///
    /// Returns `None` for a leaf.
    pub fn step(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes[id] {
            Node::Internal { left, right, .. } => Some(if bit { right } else { left }),
            Node::Leaf { .. } => None,
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        deepest
    }

    /// Sideways dump of the tree: right subtrees above, left below.
    ///
    /// Leaves print as `[value:weight]`, internal nodes as `R:weight`.
    pub fn render(&self) -> String {
        enum Visit {
            Enter(NodeId, usize),
            Emit(NodeId, usize),
        }

        let mut out = String::new();
        let mut stack = vec![Visit::Enter(self.root, 0)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id, indent) => match self.nodes[id] {
                    Node::Leaf { .. } => stack.push(Visit::Emit(id, indent)),
                    Node::Internal { left, right, .. } => {
                        // Popped in reverse: right, self, left
                        stack.push(Visit::Enter(left, indent + RENDER_INDENT));
                        stack.push(Visit::Emit(id, indent));
                        stack.push(Visit::Enter(right, indent + RENDER_INDENT));
                    }
                },
                Visit::Emit(id, indent) => {
                    let _ = match self.nodes[id] {
                        Node::Leaf { value, weight } => {
                            writeln!(out, "{:indent$}[{}:{}]", "", value, weight)
                        }
                        Node::Internal { weight, .. } => {
                            writeln!(out, "{:indent$}R:{}", "", weight)
                        }
                    };
                }
            }
        }
        out
    }
}
