//! Huffman file compression with a tree header.
//!
//! Provides lossless compression and decompression of whole files using a static Huffman code.
//! Each file gets its own code, built from that file's byte counts. The code tree is written at
//! the front of the output as a compact pre-order header, and a PSEUDO_EOF symbol marks the end of
//! the payload, so a compressed file describes itself completely.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huff -z test.txt`
//!
//! This will compress the file and create the file test.txt.hf.
//! The original file will be deleted unless -k is given.
//!
//! From code:
//!
//! ```
//! let packed = huff::compress_bytes(b"abracadabra").unwrap();
//! assert_eq!(huff::decompress_bytes(&packed).unwrap(), b"abracadabra");
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, CompressStats};
pub use compression::decompress::decompress;
pub use compression::{compress_bytes, decompress_bytes};
pub use error::{HuffError, Result};
