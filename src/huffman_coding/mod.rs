//! The huffman module builds the coding model for the huff compressor: the tree, the code table
//! derived from it, and the header that carries the tree to the decoder.
//!
//! One static tree is built per file from the byte counts of the whole file. The alphabet is the
//! 256 byte values plus a PSEUDO_EOF terminator that marks the end of the payload, so the decoder
//! never needs to know the original length.
//!
//! - tree: tree nodes and the priority-queue tree builder.
//! - code_table: symbol to bit-string codes, from the leaf paths.
//! - header: pre-order serialization of the tree topology.
//!

pub mod code_table;
pub mod header;
pub mod tree;
