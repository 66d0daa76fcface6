//! Huffman tree nodes and the tree builder.
//!
//! The tree is built from a table of byte counts with a min-weight priority queue. A leaf for
//! the PSEUDO_EOF terminator (weight 1) is always added, so the alphabet is never empty and the
//! tree always has at least one leaf.
//!
//! Equal weights are broken by insertion order: leaves are queued in ascending symbol order
//! (terminator last), and each merged node takes the next sequence number. The same counts always
//! produce the same tree.

use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A raw byte value (0-255) or the terminator (256).
pub type Symbol = u16;

/// Out-of-band symbol marking the logical end of the payload.
pub const PSEUDO_EOF: Symbol = 256;

/// Number of raw byte values.
pub const ALPH_SIZE: usize = 256;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(Symbol),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new leaf
    pub fn leaf(symbol: Symbol, weight: u64) -> Node {
        Node {
            weight,
            node_data: NodeData::Leaf(symbol),
        }
    }

    /// Create a new internal node owning both children. Weight is the sum of the children.
    pub fn join(left: Node, right: Node) -> Node {
        Node {
            weight: left.weight + right.weight,
            node_data: NodeData::Kids(Box::new(left), Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_data, NodeData::Leaf(_))
    }

    /// Symbol of a leaf, None for internal nodes.
    #[cfg(test)]
    fn symbol(&self) -> Option<Symbol> {
        match self.node_data {
            NodeData::Leaf(sym) => Some(sym),
            NodeData::Kids(..) => None,
        }
    }

    /// Number of leaves under (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match &self.node_data {
            NodeData::Leaf(_) => 1,
            NodeData::Kids(left, right) => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Longest path from this node to a leaf.
    pub fn depth(&self) -> usize {
        match &self.node_data {
            NodeData::Leaf(_) => 0,
            NodeData::Kids(left, right) => 1 + left.depth().max(right.depth()),
        }
    }

    /// True if both trees have the same shape with the same symbols at the same leaves.
    /// Weights are ignored, since a tree read back from a header only knows its topology.
    #[cfg(test)]
    pub(crate) fn same_shape(&self, other: &Node) -> bool {
        match (&self.node_data, &other.node_data) {
            (NodeData::Leaf(a), NodeData::Leaf(b)) => a == b,
            (NodeData::Kids(al, ar), NodeData::Kids(bl, br)) => {
                al.same_shape(bl) && ar.same_shape(br)
            }
            _ => false,
        }
    }
}

/// Priority queue entry. Carries the insertion sequence used to break weight ties.
#[derive(Debug)]
struct Queued {
    seq: usize,
    node: Node,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    /// Reversed so the BinaryHeap pops the lightest node first, then the earliest queued.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .weight
            .cmp(&self.node.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Build the huffman tree for a table of byte counts. The first node popped from the queue
/// becomes the left child of each merge, the second the right.
pub fn tree_from_counts(counts: &[u64; ALPH_SIZE]) -> Node {
    let mut pq = BinaryHeap::with_capacity(ALPH_SIZE + 1);
    let mut seq = 0;

    for (sym, &count) in counts.iter().enumerate() {
        if count > 0 {
            pq.push(Queued {
                seq,
                node: Node::leaf(sym as Symbol, count),
            });
            seq += 1;
        }
    }
    pq.push(Queued {
        seq,
        node: Node::leaf(PSEUDO_EOF, 1),
    });
    seq += 1;
    debug!("Building huffman tree from {} symbols.", pq.len());

    while pq.len() > 1 {
        if let (Some(left), Some(right)) = (pq.pop(), pq.pop()) {
            pq.push(Queued {
                seq,
                node: Node::join(left.node, right.node),
            });
            seq += 1;
        }
    }

    // The terminator leaf is always queued, so there is always a root.
    let root = pq
        .pop()
        .map_or_else(|| Node::leaf(PSEUDO_EOF, 1), |q| q.node);
    debug!(
        "Tree built: {} leaves, depth {}, weight {}.",
        root.leaf_count(),
        root.depth(),
        root.weight
    );
    root
}

#[cfg(test)]
mod test {
    use super::*;

    fn counts_of(data: &[u8]) -> [u64; ALPH_SIZE] {
        let mut counts = [0_u64; ALPH_SIZE];
        data.iter().for_each(|&b| counts[b as usize] += 1);
        counts
    }

    #[test]
    fn empty_counts_test() {
        let root = tree_from_counts(&[0; ALPH_SIZE]);
        assert!(root.is_leaf());
        assert_eq!(root.symbol(), Some(PSEUDO_EOF));
        assert_eq!(root.weight, 1);
    }

    #[test]
    fn scenario_a_shape_test() {
        // 66 and EOF tie at weight 1; 66 was queued first so it is popped first (left).
        let root = tree_from_counts(&counts_of(&[65, 65, 65, 66]));
        let expected = Node::join(
            Node::join(Node::leaf(66, 1), Node::leaf(PSEUDO_EOF, 1)),
            Node::leaf(65, 3),
        );
        assert_eq!(root, expected);
        assert_eq!(root.weight, 5);
    }

    #[test]
    fn strict_binary_test() {
        fn check(node: &Node) -> u64 {
            match &node.node_data {
                NodeData::Leaf(_) => node.weight,
                NodeData::Kids(l, r) => {
                    let sum = check(l) + check(r);
                    assert_eq!(sum, node.weight);
                    sum
                }
            }
        }
        let data: Vec<u8> = (0..5000_u32).map(|i| ((i * i) % 97) as u8).collect();
        let root = tree_from_counts(&counts_of(&data));
        assert_eq!(check(&root), data.len() as u64 + 1);
    }

    #[test]
    fn all_symbols_test() {
        let counts = [7_u64; ALPH_SIZE];
        let root = tree_from_counts(&counts);
        assert_eq!(root.leaf_count(), ALPH_SIZE + 1);
    }

    #[test]
    fn deterministic_test() {
        let data = b"abracadabra, the quick brown fox";
        let a = tree_from_counts(&counts_of(data));
        let b = tree_from_counts(&counts_of(data));
        assert_eq!(a, b);
    }

    #[test]
    fn same_shape_ignores_weights_test() {
        let a = Node::join(Node::leaf(1, 10), Node::leaf(PSEUDO_EOF, 1));
        let b = Node::join(Node::leaf(1, 1), Node::leaf(PSEUDO_EOF, 1));
        let c = Node::join(Node::leaf(PSEUDO_EOF, 1), Node::leaf(1, 1));
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
