use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, Symbol};
use crate::min_heap::MinHeap;

/// A Huffman tree built once per input and read-only afterwards.
///
/// Construction repeatedly extracts the two lowest forest roots and merges
/// them, the first extracted becoming the left child (bit 0) and the second
/// the right child (bit 1).
///
/// Ties are broken by insertion sequence: leaves are numbered in ascending
/// symbol order, and each merged node is numbered after every node created
/// before it. Among equal weights the lower sequence number is extracted
/// first, so leaves precede merged nodes, smaller symbols precede larger
/// ones, and older merged nodes precede newer ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Fails with `EmptyInput` when no symbol is counted and with
    /// `WeightOverflow` when the counts sum past `u64::MAX`.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        // every internal weight is bounded by the total
        if frequencies.checked_total().is_none() {
            return Err(HuffmanError::weight_overflow(format!(
                "{} symbol counts sum past u64::MAX",
                frequencies.len()
            )));
        }

        let leaves: Vec<ForestEntry> = frequencies
            .iter()
            .enumerate()
            .map(|(order, entry)| ForestEntry {
                order: order as u64,
                node: HuffNode::new(entry.symbol, entry.count),
            })
            .collect();

        if leaves.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let next_order = leaves.len() as u64;
        let tree = HuffmanTree::build_from_heap(MinHeap::build(leaves), next_order)?;
        debug!(
            leaves = tree.leaf_count(),
            weight = tree.weight(),
            height = tree.height(),
            "built huffman tree"
        );
        Ok(tree)
    }

    fn build_from_heap(mut heap: MinHeap<ForestEntry>, mut next_order: u64) -> Result<Self> {
        loop {
            let first = heap.extract_min().ok_or(HuffmanError::EmptyInput)?;
            let Some(second) = heap.extract_min() else {
                return Ok(HuffmanTree { root: first.node });
            };

            let merged = HuffNode::merge(first.node, second.node);
            heap.insert(ForestEntry {
                order: next_order,
                node: merged,
            });
            next_order += 1;
        }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Total weight, equal to the number of symbols in the counted input.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// True when the input had a single distinct symbol.
    pub fn is_single_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Longest root-to-leaf path in edges. A single leaf has height 0.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Recovers the symbol counts stored in the leaves.
    pub fn frequencies(&self) -> FrequencyTable {
        let mut frequencies = FrequencyTable::new();
        self.root.collect_frequencies(&mut frequencies);
        frequencies
    }
}

impl TryFrom<&[u8]> for HuffmanTree {
    type Error = HuffmanError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_bytes(bytes)
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        self.root.fmt_node(f, 0, "root")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: Symbol,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    /// Follows one edge: `false` goes left, `true` goes right.
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    /// `a` is the first-extracted (smaller) node and becomes the left child.
    pub fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn height(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    fn collect_frequencies(&self, frequencies: &mut FrequencyTable) {
        match self {
            HuffNode::Leaf { symbol, weight } => frequencies.insert(*symbol, *weight),
            HuffNode::Internal { left, right, .. } => {
                left.collect_frequencies(frequencies);
                right.collect_frequencies(frequencies);
            }
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            HuffNode::Leaf { symbol, weight } => writeln!(
                f,
                "{}{}-> Leaf: '{}' ({}) [weight: {}]",
                indent,
                label,
                (*symbol as char).escape_default(),
                symbol,
                weight
            ),
            HuffNode::Internal {
                weight,
                left,
                right,
            } => {
                writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                left.fmt_node(f, depth + 1, "L")?;
                right.fmt_node(f, depth + 1, "R")
            }
        }
    }
}

/// A forest root during construction, ordered by `(weight, order)`.
#[derive(Debug)]
struct ForestEntry {
    order: u64,
    node: HuffNode,
}

impl ForestEntry {
    fn key(&self) -> (u64, u64) {
        (self.node.weight(), self.order)
    }
}

impl PartialEq for ForestEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ForestEntry {}

impl PartialOrd for ForestEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ForestEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(symbol: u8, weight: u64) -> HuffNode {
        HuffNode::new(symbol, weight)
    }

    fn assert_weights_consistent(node: &HuffNode) {
        if let HuffNode::Internal {
            weight,
            left,
            right,
        } = node
        {
            assert_eq!(*weight, left.weight() + right.weight());
            assert_weights_consistent(left);
            assert_weights_consistent(right);
        }
    }

    #[test]
    fn test_abracadabra_shape() {
        let tree = HuffmanTree::from_bytes(b"abracadabra").unwrap();

        let expected = HuffNode::merge(
            leaf(b'a', 5),
            HuffNode::merge(
                HuffNode::merge(leaf(b'c', 1), leaf(b'd', 1)),
                HuffNode::merge(leaf(b'b', 2), leaf(b'r', 2)),
            ),
        );
        assert_eq!(tree.root(), &expected);
        assert_eq!(tree.weight(), 11);
        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.height(), 3);
        assert_weights_consistent(tree.root());
    }

    #[test]
    fn test_equal_weights_pop_in_symbol_order() {
        let tree = HuffmanTree::from_bytes(b"dcba").unwrap();
        let expected = HuffNode::merge(
            HuffNode::merge(leaf(b'a', 1), leaf(b'b', 1)),
            HuffNode::merge(leaf(b'c', 1), leaf(b'd', 1)),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_leaf_precedes_merged_node_of_equal_weight() {
        let tree = HuffmanTree::from_bytes(b"aabc").unwrap();
        let expected = HuffNode::merge(
            leaf(b'a', 2),
            HuffNode::merge(leaf(b'b', 1), leaf(b'c', 1)),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_older_merged_node_precedes_newer() {
        // a+b and c+d both weigh 2; e weighs 4.
        // e then ties with (a+b)+(c+d) and, being a leaf, goes left.
        let tree = HuffmanTree::from_bytes(b"abcdeeee").unwrap();
        let expected = HuffNode::merge(
            leaf(b'e', 4),
            HuffNode::merge(
                HuffNode::merge(leaf(b'a', 1), leaf(b'b', 1)),
                HuffNode::merge(leaf(b'c', 1), leaf(b'd', 1)),
            ),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_single_symbol_is_single_leaf() {
        let tree = HuffmanTree::from_bytes(b"aaaa").unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.root(), &leaf(b'a', 4));
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = HuffmanTree::from_bytes(b"").unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyInput));
        assert!(HuffmanTree::try_from(&b""[..]).is_err());
    }

    #[test]
    fn test_overflowing_weights_fail() {
        let frequencies: FrequencyTable = [(b'a', u64::MAX), (b'b', 1)].into_iter().collect();
        let err = HuffmanTree::from_frequencies(&frequencies).unwrap_err();
        assert!(matches!(err, HuffmanError::WeightOverflow { .. }));

        // a total of exactly u64::MAX still builds
        let frequencies: FrequencyTable = [(b'a', u64::MAX - 1), (b'b', 1)].into_iter().collect();
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();
        assert_eq!(tree.weight(), u64::MAX);
        assert_eq!(tree.root().child(false).and_then(HuffNode::symbol), Some(b'b'));
    }

    #[test]
    fn test_frequencies_recovered_from_leaves() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffmanTree::from_bytes(data).unwrap();
        assert_eq!(tree.frequencies(), FrequencyTable::from_bytes(data));
        assert_weights_consistent(tree.root());
    }

    #[test]
    fn test_child_navigation() {
        let tree = HuffmanTree::from_bytes(b"aabc").unwrap();
        let root = tree.root();
        assert_eq!(root.child(false).and_then(HuffNode::symbol), Some(b'a'));
        let right = root.child(true).unwrap();
        assert_eq!(right.child(true).and_then(HuffNode::symbol), Some(b'c'));
        assert!(leaf(b'x', 1).child(false).is_none());
    }

    #[test]
    fn test_display_structure() {
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        let rendered = tree.to_string();
        let expected = "Huffman Tree Structure:\n\
                        root-> Internal [weight: 3]\n  \
                        L-> Leaf: 'b' (98) [weight: 1]\n  \
                        R-> Leaf: 'a' (97) [weight: 2]\n";
        assert_eq!(rendered, expected);
    }
}
