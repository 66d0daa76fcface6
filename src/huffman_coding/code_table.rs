//! Derive the prefix-free code for every leaf of a huffman tree.
//!
//! Codes are the path from the root: '0' for each step left, '1' for each step right. A tree that
//! is a single leaf (empty input, only the terminator) gives that leaf the empty code.

use log::trace;
use rustc_hash::FxHashMap;

use super::tree::{Node, NodeData, Symbol};

/// A bit string, most significant bit first, exactly `len` bits long. Leading zeros are part of
/// the code. A tree built from u64 counts is never deep enough to overflow the u128.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Code {
    pub bits: u128,
    pub len: u8,
}

impl Code {
    /// Extend the path by one step.
    fn push(self, bit: bool) -> Code {
        Code {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        }
    }

    /// True if self is a prefix of (or equal to) other.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len
            && other.bits.checked_shr((other.len - self.len) as u32).unwrap_or(0) == self.bits
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", (self.bits >> i) & 1)?;
        }
        Ok(())
    }
}

/// Symbol to code map for one tree.
#[derive(Debug, Default)]
pub struct CodeTable {
    codes: FxHashMap<Symbol, Code>,
}

impl CodeTable {
    /// Walk the tree and record the code for each leaf.
    pub fn from_tree(root: &Node) -> CodeTable {
        let mut table = CodeTable::default();
        // A lone root leaf keeps the empty code
        table.walk(root, Code::default());
        trace!("Code table holds {} codes.", table.codes.len());
        table
    }

    fn walk(&mut self, node: &Node, path: Code) {
        match &node.node_data {
            NodeData::Leaf(sym) => {
                self.codes.insert(*sym, path);
            }
            NodeData::Kids(left, right) => {
                self.walk(left, path.push(false));
                self.walk(right, path.push(true));
            }
        }
    }

    pub fn get(&self, sym: Symbol) -> Option<&Code> {
        self.codes.get(&sym)
    }

    pub(crate) fn len(&self) -> usize {
        self.codes.len()
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = (&Symbol, &Code)> {
        self.codes.iter()
    }
}
