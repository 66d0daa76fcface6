//! The bitstream module forms the I/O subsystem for the huff compressor.
//!
//! Huffman codes are not byte aligned, so both directions work at bit granularity. Bits are
//! packed most significant bit first. The writer pads the final partial byte with zero bits when
//! it is flushed, and the reader reports the end of its source as `None` so the decoder can tell a
//! truncated stream from a read failure.
//!
//! This I/O subsystem is designed to serve the other modules within huff. It is not intended for
//! more general use.
//!
pub mod bitreader;
pub mod bitwriter;
