//! The tools module provides helper functions for the huff compressor.
//!
//! The tools are:
//! - cli: Command line interface for huff.
//! - freq_count: Frequency count of the input bytes, the first compression pass.
//!
pub mod cli;
pub mod freq_count;
