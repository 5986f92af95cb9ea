//! Arena-backed Huffman code tree.
//!
//! The same [`CodeTree`] type serves both directions:
//!
//! - **Encode**: built bottom-up from a [`FrequencyTable`] by repeatedly
//!   merging the two lightest nodes of a min-priority queue.
//! - **Decode**: grown top-down from dictionary entries with
//!   [`CodeTree::insert`], then walked one bit at a time.
//!
//! Nodes live in a flat `Vec` and refer to their children by [`NodeId`], so
//! dropping or cloning a tree is a plain `Vec` operation.
//!
//! # Tie-break
//!
//! The queue orders by `(weight, NodeId)`. Leaves are allocated in ascending
//! symbol order before any merged node, and merged nodes are allocated in
//! merge order, so equal weights resolve identically on every platform. The
//! first node popped becomes the left child (bit `0`).

use crate::dictionary::Codeword;
use crate::frequency::FrequencyTable;
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::traits::Symbol;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

/// Index of a node inside a [`CodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shape of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<S> {
    /// Terminal node carrying a symbol.
    Leaf(S),
    /// Internal node. Trees built from frequencies always have both
    /// children; trees grown from a dictionary may be incomplete.
    Branch {
        /// Child reached by a `0` bit.
        left: Option<NodeId>,
        /// Child reached by a `1` bit.
        right: Option<NodeId>,
    },
}

/// A tree node with its weight (symbol frequency, or the sum of the
/// children's weights). Nodes grown from a dictionary have weight 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<S> {
    /// Leaf or branch.
    pub kind: NodeKind<S>,
    /// Frequency weight.
    pub weight: u64,
}

impl<S> Node<S> {
    const EMPTY_BRANCH: NodeKind<S> = NodeKind::Branch {
        left: None,
        right: None,
    };

    /// True iff the node has no children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// A binary prefix-code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree<S: Symbol> {
    nodes: Vec<Node<S>>,
    root: NodeId,
}

impl<S: Symbol> CodeTree<S> {
    /// Create a tree holding only an empty root branch, ready for
    /// [`insert`](Self::insert).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: Node::<S>::EMPTY_BRANCH,
                weight: 0,
            }],
            root: NodeId(0),
        }
    }

    /// Build a tree by frequency merging.
    ///
    /// Returns `None` for an empty table. A single used symbol gets a root
    /// branch with only a left child, i.e. the one-bit codeword `0`.
    pub fn from_frequencies(freqs: &FrequencyTable<S>) -> Option<Self> {
        let mut nodes = Vec::with_capacity(freqs.distinct() * 2);
        let mut heap = BinaryHeap::with_capacity(freqs.distinct());

        for (symbol, count) in freqs.iter() {
            let id = Self::alloc(
                &mut nodes,
                Node {
                    kind: NodeKind::Leaf(symbol),
                    weight: count,
                },
            );
            heap.push(Reverse((count, id)));
        }

        while heap.len() > 1 {
            let Reverse((left_weight, left)) = heap.pop()?;
            let Reverse((right_weight, right)) = heap.pop()?;
            let weight = left_weight + right_weight;
            let id = Self::alloc(
                &mut nodes,
                Node {
                    kind: NodeKind::Branch {
                        left: Some(left),
                        right: Some(right),
                    },
                    weight,
                },
            );
            heap.push(Reverse((weight, id)));
        }

        let Reverse((weight, top)) = heap.pop()?;
        let root = if nodes[top.index()].is_leaf() {
            Self::alloc(
                &mut nodes,
                Node {
                    kind: NodeKind::Branch {
                        left: Some(top),
                        right: None,
                    },
                    weight,
                },
            )
        } else {
            top
        };

        Some(Self { nodes, root })
    }

    /// Build a tree whose codewords are at most `max_length` bits.
    ///
    /// Deep trees are rebuilt from [`FrequencyTable::scaled`] counts until
    /// they fit. Fails with [`OxiHuffError::CodeLengthOverflow`] when the
    /// alphabet has more than `2^max_length` used symbols.
    pub fn with_max_length(freqs: &FrequencyTable<S>, max_length: u8) -> Result<Option<Self>> {
        if max_length < 32 && freqs.distinct() as u64 > 1u64 << max_length {
            return Err(OxiHuffError::code_length_overflow(
                freqs.distinct(),
                max_length,
            ));
        }

        let mut scaled = freqs.clone();
        let mut rounds = 0u32;
        loop {
            let Some(tree) = Self::from_frequencies(&scaled) else {
                return Ok(None);
            };
            let depth = tree.max_depth();
            if depth <= usize::from(max_length) {
                if rounds > 0 {
                    tracing::debug!(rounds, depth, max_length, "limited code lengths");
                }
                return Ok(Some(tree));
            }
            let next = scaled.scaled();
            if scaled.is_flat() || next == scaled {
                return Err(OxiHuffError::code_length_overflow(
                    freqs.distinct(),
                    max_length,
                ));
            }
            scaled = next;
            rounds += 1;
        }
    }

    /// Attach a leaf for `symbol` at the path described by `codeword`,
    /// creating branches along the way.
    ///
    /// A zero-length codeword turns an empty tree into a single leaf root.
    pub fn insert(&mut self, symbol: S, codeword: Codeword) -> Result<()> {
        if codeword.length == 0 {
            if !self.is_empty() {
                return Err(OxiHuffError::invalid_dictionary(format!(
                    "zero-length codeword for {symbol:?} alongside other entries"
                )));
            }
            self.nodes[self.root.index()].kind = NodeKind::Leaf(symbol);
            return Ok(());
        }

        let mut current = self.root;
        for shift in (0..codeword.length).rev() {
            let bit = (codeword.bits >> shift) & 1 == 1;
            let last = shift == 0;

            if self.is_leaf(current) {
                return Err(OxiHuffError::invalid_dictionary(format!(
                    "codeword {codeword} for {symbol:?} passes through a leaf"
                )));
            }

            match (self.child(current, bit), last) {
                (Some(next), false) => current = next,
                (Some(_), true) => {
                    return Err(OxiHuffError::invalid_dictionary(format!(
                        "codeword {codeword} for {symbol:?} is already taken"
                    )));
                }
                (None, false) => {
                    let branch = Self::alloc(
                        &mut self.nodes,
                        Node {
                            kind: Node::<S>::EMPTY_BRANCH,
                            weight: 0,
                        },
                    );
                    self.attach(current, bit, branch);
                    current = branch;
                }
                (None, true) => {
                    let leaf = Self::alloc(
                        &mut self.nodes,
                        Node {
                            kind: NodeKind::Leaf(symbol),
                            weight: 0,
                        },
                    );
                    self.attach(current, bit, leaf);
                }
            }
        }
        Ok(())
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no symbol at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[self.root.index()].kind == Node::<S>::EMPTY_BRANCH
    }

    /// True iff `id` has no children.
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.index()].is_leaf()
    }

    /// Check if the root itself is a leaf (one-symbol alphabet, no codeword).
    pub fn is_degenerate(&self) -> bool {
        self.is_leaf(self.root)
    }

    /// Symbol of a leaf.
    #[inline]
    pub fn symbol(&self, id: NodeId) -> Option<S> {
        match self.nodes[id.index()].kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Branch { .. } => None,
        }
    }

    /// Child reached from `id` by `bit` (`false` = left, `true` = right).
    #[inline]
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes[id.index()].kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Branch { left, right } => {
                if bit {
                    right
                } else {
                    left
                }
            }
        }
    }

    /// Total weight of the tree.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root.index()].weight
    }

    /// Length of the longest root-to-leaf path.
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id.index()].kind {
                NodeKind::Leaf(_) => deepest = deepest.max(depth),
                NodeKind::Branch { left, right } => {
                    stack.extend(left.map(|child| (child, depth + 1)));
                    stack.extend(right.map(|child| (child, depth + 1)));
                }
            }
        }
        deepest
    }

    /// Every leaf with its path from the root, in path order (left first).
    ///
    /// Paths are accumulated MSB-first: `0` for a left edge, `1` for a
    /// right edge.
    pub fn codewords(&self) -> Vec<(S, Codeword)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Codeword::default())];
        while let Some((id, path)) = stack.pop() {
            match self.nodes[id.index()].kind {
                NodeKind::Leaf(symbol) => out.push((symbol, path)),
                NodeKind::Branch { left, right } => {
                    // Right pushed first so the left subtree is visited first
                    stack.extend(right.map(|child| (child, path.extended(true))));
                    stack.extend(left.map(|child| (child, path.extended(false))));
                }
            }
        }
        out
    }

    fn alloc(nodes: &mut Vec<Node<S>>, node: Node<S>) -> NodeId {
        let id = NodeId(nodes.len() as u32);
        nodes.push(node);
        id
    }

    fn attach(&mut self, parent: NodeId, bit: bool, child: NodeId) {
        if let NodeKind::Branch { left, right } = &mut self.nodes[parent.index()].kind {
            if bit {
                *right = Some(child);
            } else {
                *left = Some(child);
            }
        }
    }
}

impl<S: Symbol> Default for CodeTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> fmt::Display for CodeTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_width = usize::from(S::BITS.div_ceil(4));
        for (symbol, codeword) in self.codewords() {
            writeln!(
                f,
                "{codeword} => 0x{:0width$x}",
                symbol.to_bits(),
                width = hex_width
            )?;
        }
        Ok(())
    }
}
