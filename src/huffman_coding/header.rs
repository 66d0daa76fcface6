//! The tree header: a pre-order encoding of the huffman tree topology.
//!
//! Each internal node is a 0 bit followed by its left then right subtree. Each leaf is a 1 bit
//! followed by its symbol in 9 bits (enough for 0-255 plus the terminator, 256).
//!
//! The decoder only needs the shape of the tree, so weights are not transmitted. Leaves read back
//! from a header get weight 1.

use std::io::{Read, Write};

use log::trace;

use super::tree::{Node, NodeData, Symbol, ALPH_SIZE, PSEUDO_EOF};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{HuffError, Result};

/// Width of a leaf symbol in the header.
pub const BITS_PER_SYMBOL: u8 = 9;

/// No valid tree over 257 leaves is deeper than this.
const MAX_DEPTH: usize = ALPH_SIZE;

/// Write the tree topology to the stream.
pub fn write_header<W: Write>(root: &Node, bw: &mut BitWriter<W>) -> Result<()> {
    let start = bw.bits_written();
    write_node(root, bw)?;
    trace!("Wrote a {} bit tree header.", bw.bits_written() - start);
    Ok(())
}

fn write_node<W: Write>(node: &Node, bw: &mut BitWriter<W>) -> Result<()> {
    match &node.node_data {
        NodeData::Kids(left, right) => {
            bw.put_bit(false)?;
            write_node(left, bw)?;
            write_node(right, bw)?;
        }
        NodeData::Leaf(sym) => {
            bw.put_bit(true)?;
            bw.put_bits(BITS_PER_SYMBOL, *sym as u32)?;
        }
    }
    Ok(())
}

/// Tracks what has been seen while rebuilding a tree, so a malformed header is rejected.
struct HeaderCheck {
    seen: [bool; ALPH_SIZE + 1],
    leaves: usize,
}

/// Read a tree topology from the stream. Any header that does not describe a strict binary tree
/// with distinct symbols and exactly one terminator leaf is reported as InvalidFormat.
pub fn read_header<R: Read>(br: &mut BitReader<R>) -> Result<Node> {
    let mut check = HeaderCheck {
        seen: [false; ALPH_SIZE + 1],
        leaves: 0,
    };
    let root = read_node(br, 0, &mut check)?;
    if !check.seen[PSEUDO_EOF as usize] {
        return Err(HuffError::format("tree header has no PSEUDO_EOF leaf"));
    }
    trace!("Read a tree header with {} leaves at {}.", check.leaves, br.loc());
    Ok(root)
}

fn read_node<R: Read>(
    br: &mut BitReader<R>,
    depth: usize,
    check: &mut HeaderCheck,
) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(HuffError::format("tree header is nested too deeply"));
    }
    let tree_bit = br
        .bit()?
        .ok_or_else(|| HuffError::format("end of stream inside the tree header"))?;

    if tree_bit == 1 {
        let value = br
            .bint(BITS_PER_SYMBOL as usize)?
            .ok_or_else(|| HuffError::format("end of stream inside a tree header symbol"))?;
        if value > PSEUDO_EOF as u32 {
            return Err(HuffError::format(format!(
                "tree header symbol {} is out of range",
                value
            )));
        }
        if check.seen[value as usize] {
            return Err(HuffError::format(format!(
                "tree header repeats symbol {}",
                value
            )));
        }
        check.seen[value as usize] = true;
        check.leaves += 1;
        return Ok(Node::leaf(value as Symbol, 1));
    }

    let left = read_node(br, depth + 1, check)?;
    let right = read_node(br, depth + 1, check)?;
    Ok(Node::join(left, right))
}
